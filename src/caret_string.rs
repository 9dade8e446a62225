//! Text paired with a caret position.
//!
//! Caret positions are **character** (not byte) offsets.

/// Which way the caret leans when the mask inserts characters at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaretGravity {
    /// Typing: fillers inserted at the caret push it forward.
    #[default]
    Forward,
    /// Deleting: fillers inserted at the caret stay after it.
    Backward,
}

/// A string with a caret offset into it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaretString {
    pub string: String,
    pub caret_position: usize,
    pub caret_gravity: CaretGravity,
}

impl CaretString {
    /// Create a caret string with forward gravity.
    ///
    /// The caret is clamped to the character length of `string`.
    pub fn new(string: impl Into<String>, caret_position: usize) -> Self {
        Self::with_gravity(string, caret_position, CaretGravity::Forward)
    }

    pub fn with_gravity(
        string: impl Into<String>,
        caret_position: usize,
        caret_gravity: CaretGravity,
    ) -> Self {
        let string = string.into();
        let caret_position = caret_position.min(string.chars().count());
        Self {
            string,
            caret_position,
            caret_gravity,
        }
    }

    /// Create a caret string with the caret after the last character.
    pub fn at_end(string: impl Into<String>) -> Self {
        let string = string.into();
        let caret_position = string.chars().count();
        Self {
            string,
            caret_position,
            caret_gravity: CaretGravity::Forward,
        }
    }

    /// Number of characters in the string.
    pub fn char_len(&self) -> usize {
        self.string.chars().count()
    }

    /// Mirror the string; the caret keeps pointing between the same characters.
    pub fn reversed(&self) -> Self {
        Self {
            string: self.string.chars().rev().collect(),
            caret_position: self.char_len().saturating_sub(self.caret_position),
            caret_gravity: self.caret_gravity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_is_clamped() {
        let text = CaretString::new("abc", 10);
        assert_eq!(text.caret_position, 3);
    }

    #[test]
    fn test_caret_counts_chars_not_bytes() {
        let text = CaretString::at_end("ёж");
        assert_eq!(text.caret_position, 2);
        assert_eq!(text.char_len(), 2);
    }

    #[test]
    fn test_reversed_mirrors_caret() {
        let text = CaretString::with_gravity("abcd", 1, CaretGravity::Backward);
        let reversed = text.reversed();
        assert_eq!(reversed.string, "dcba");
        assert_eq!(reversed.caret_position, 3);
        assert_eq!(reversed.caret_gravity, CaretGravity::Backward);
        assert_eq!(reversed.reversed(), text);
    }

    #[test]
    fn test_reversed_clamps_caret_past_end() {
        let text = CaretString {
            string: "ab".into(),
            caret_position: 5,
            caret_gravity: CaretGravity::Forward,
        };
        assert_eq!(text.reversed().caret_position, 0);
    }
}
