//! Scoring how well a mask fits a piece of text.

use crate::caret_string::CaretString;
use crate::mask::Mask;

/// How a picker ranks candidate masks against the current text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AffinityCalculationStrategy {
    /// The affinity reported by [`Mask::apply`].
    #[default]
    WholeString,
    /// Length of the common prefix of the input and the formatted text.
    Prefix,
    /// How much room the mask leaves: `text length - total text length`.
    /// A mask too short for the text scores [`i32::MIN`].
    Capacity,
}

impl AffinityCalculationStrategy {
    pub fn calculate_affinity_of_mask(
        self,
        mask: &Mask,
        text: &CaretString,
        autocomplete: bool,
    ) -> i32 {
        // Scores always use forward gravity.
        let forward = CaretString::new(text.string.as_str(), text.caret_position);
        match self {
            Self::WholeString => mask.apply(&forward, autocomplete).affinity,
            Self::Prefix => {
                let formatted = mask.apply(&forward, autocomplete).formatted_text.string;
                saturating_i32(common_prefix_len(&formatted, &text.string))
            }
            Self::Capacity => {
                let length = text.char_len();
                let capacity = mask.total_text_length();
                if length > capacity {
                    i32::MIN
                } else {
                    -saturating_i32(capacity - length)
                }
            }
        }
    }
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affinity(strategy: AffinityCalculationStrategy, format: &str, text: &str) -> i32 {
        let mask = Mask::new(format).expect("compiles");
        strategy.calculate_affinity_of_mask(&mask, &CaretString::at_end(text), false)
    }

    #[test]
    fn test_whole_string_matches_apply() {
        use AffinityCalculationStrategy::WholeString;
        assert_eq!(affinity(WholeString, "+7 ([000]) [000] [00] [00]", "89991234567"), 1);
        assert_eq!(affinity(WholeString, "8 ([000]) [000]-[00]-[00]", "89991234567"), 5);
    }

    #[test]
    fn test_prefix() {
        use AffinityCalculationStrategy::Prefix;
        assert_eq!(affinity(Prefix, "+7 [000] [000]", "+7 12 345"), 5);
        assert_eq!(affinity(Prefix, "8 [000] [000]", "+7 12 345"), 0);
        assert_eq!(affinity(Prefix, "8 [000] [000]", "8 12 345"), 4);
        assert_eq!(affinity(Prefix, "+7 [000] [000]", "8 12 345"), 0);
    }

    #[test]
    fn test_capacity() {
        use AffinityCalculationStrategy::Capacity;
        assert_eq!(affinity(Capacity, "[000]", "1"), -2);
        assert_eq!(affinity(Capacity, "[00000]", "1"), -4);
        assert_eq!(affinity(Capacity, "[0000000]", "1"), -6);
        assert_eq!(affinity(Capacity, "[000]", "1234"), i32::MIN);
        assert_eq!(affinity(Capacity, "[00000]", "1234"), -1);
        assert_eq!(affinity(Capacity, "[0000000]", "1234"), -3);
        assert_eq!(affinity(Capacity, "[000]", "123"), 0);
    }

    #[test]
    fn test_common_prefix_counts_chars() {
        assert_eq!(common_prefix_len("ёжик", "ёжи"), 3);
        assert_eq!(common_prefix_len("", "abc"), 0);
    }
}
