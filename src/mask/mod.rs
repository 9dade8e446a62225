//! Applying compiled masks to user input.
//!
//! [`Mask::apply`] walks the input one character at a time through the
//! compiled [`StateChain`]. Every step either consumes the character, inserts
//! decoration in front of it, or drops it. Along the way the mask tracks:
//!
//! - the formatted text and the caret's new position in it,
//! - the extracted value (the characters the user actually entered plus fixed
//!   decoration),
//! - an *affinity* score: `+1` per consumed character, `-1` per insertion or
//!   dropped character. Pickers compare affinities to choose between masks.

mod cache;

use std::sync::Arc;

use itertools::Itertools;

pub use cache::MaskCache;

use crate::caret_iter::{CaretStringIterator, Direction};
use crate::caret_string::CaretString;
use crate::format::{ESCAPE, FormatError, compile};
use crate::notation::Notation;
use crate::state::{State, StateChain, StateId};

/// Outcome of applying a mask to a caret string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskResult {
    /// Formatted text with the adjusted caret.
    pub formatted_text: CaretString,
    /// Value characters, without free decoration.
    pub extracted_value: String,
    /// How well the input fit the mask.
    pub affinity: i32,
    /// Whether every mandatory character has been entered.
    pub complete: bool,
}

impl MaskResult {
    fn reversed(self) -> Self {
        Self {
            formatted_text: self.formatted_text.reversed(),
            extracted_value: self.extracted_value.chars().rev().collect(),
            ..self
        }
    }
}

/// A compiled mask format.
#[derive(Debug, Clone)]
pub struct Mask {
    format: String,
    notations: Vec<Notation>,
    direction: Direction,
    chain: StateChain,
}

// ─── Construction ────────────────────────────────────────────────────────────

impl Mask {
    /// Compile `format` with the built-in symbols only.
    pub fn new(format: &str) -> Result<Self, FormatError> {
        Self::with_notations(format, &[])
    }

    pub fn with_notations(format: &str, notations: &[Notation]) -> Result<Self, FormatError> {
        Self::with_direction(format, notations, Direction::LeftToRight)
    }

    /// Compile a mask that fills from the end of the input.
    pub fn right_to_left(format: &str, notations: &[Notation]) -> Result<Self, FormatError> {
        Self::with_direction(format, notations, Direction::RightToLeft)
    }

    pub fn with_direction(
        format: &str,
        notations: &[Notation],
        direction: Direction,
    ) -> Result<Self, FormatError> {
        let chain = match direction {
            Direction::LeftToRight => compile(format, notations)?,
            Direction::RightToLeft => compile(&reversed_format(format), notations)?,
        };
        Ok(Self {
            format: format.to_string(),
            notations: notations.to_vec(),
            direction,
            chain,
        })
    }

    /// Fetch a left-to-right mask from the process-wide cache, compiling it on first use.
    pub fn get_or_create(format: &str, notations: &[Notation]) -> Result<Arc<Self>, FormatError> {
        MaskCache::global().get_or_create(format, notations)
    }

    /// Fetch a right-to-left mask from the process-wide cache.
    pub fn get_or_create_right_to_left(
        format: &str,
        notations: &[Notation],
    ) -> Result<Arc<Self>, FormatError> {
        MaskCache::global().get_or_create_right_to_left(format, notations)
    }

    /// Whether `format` compiles.
    pub fn is_valid(format: &str, notations: &[Notation]) -> bool {
        compile(format, notations).is_ok()
    }

    /// The format this mask was compiled from, as given.
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn notations(&self) -> &[Notation] {
        &self.notations
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Compiled states. Right-to-left masks hold the mirrored format.
    pub fn chain(&self) -> &StateChain {
        &self.chain
    }
}

/// Mirror a format: reverse its tokens and swap bracket orientation.
/// Escape pairs are kept intact.
fn reversed_format(format: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        let token = match ch {
            ESCAPE => {
                let mut pair = String::from(ESCAPE);
                pair.extend(chars.next());
                pair
            }
            '[' => "]".to_string(),
            ']' => "[".to_string(),
            '{' => "}".to_string(),
            '}' => "{".to_string(),
            _ => ch.to_string(),
        };
        tokens.push(token);
    }
    tokens.iter().rev().join("")
}

// ─── Application ─────────────────────────────────────────────────────────────

impl Mask {
    /// Format `text`, tracking the caret and extracting the value.
    ///
    /// With `autocomplete`, trailing decoration is appended while the caret is
    /// at the end of what was processed.
    pub fn apply(&self, text: &CaretString, autocomplete: bool) -> MaskResult {
        match self.direction {
            Direction::LeftToRight => self.transduce(text, autocomplete),
            Direction::RightToLeft => {
                let text = CaretString::with_gravity(
                    text.string.as_str(),
                    text.caret_position,
                    text.caret_gravity,
                );
                self.transduce(&text.reversed(), autocomplete).reversed()
            }
        }
    }

    fn transduce(&self, text: &CaretString, autocomplete: bool) -> MaskResult {
        let mut iterator = CaretStringIterator::new(text, self.direction);
        let mut formatted = String::new();
        let mut extracted_value = String::new();
        let mut affinity: i32 = 0;
        let mut inserted_before_caret = 0usize;
        let mut dropped_before_caret = 0usize;

        let mut state = self.chain.initial();
        let mut before_caret = iterator.before_caret();
        let mut character = iterator.next();

        while let Some(ch) = character {
            match self.chain.accept(state, ch) {
                Some(next) => {
                    state = next.state;
                    formatted.extend(next.insert);
                    extracted_value.extend(next.value);
                    if next.pass {
                        before_caret = iterator.before_caret();
                        character = iterator.next();
                        affinity += 1;
                    } else {
                        if before_caret && next.insert.is_some() {
                            inserted_before_caret += 1;
                        }
                        affinity -= 1;
                    }
                }
                None => {
                    if iterator.deletion_affects_caret() {
                        dropped_before_caret += 1;
                    }
                    before_caret = iterator.before_caret();
                    character = iterator.next();
                    affinity -= 1;
                }
            }
        }

        while autocomplete && before_caret {
            let Some(next) = self.chain.autocomplete(state) else {
                break;
            };
            state = next.state;
            formatted.extend(next.insert);
            extracted_value.extend(next.value);
            if next.insert.is_some() {
                inserted_before_caret += 1;
            }
        }

        let length = formatted.chars().count();
        let caret_position = (text.caret_position + inserted_before_caret)
            .saturating_sub(dropped_before_caret)
            .min(length);

        MaskResult {
            formatted_text: CaretString {
                string: formatted,
                caret_position,
                caret_gravity: text.caret_gravity,
            },
            extracted_value,
            affinity,
            complete: self.no_mandatory_characters_left_after(state),
        }
    }

    fn no_mandatory_characters_left_after(&self, mut state: StateId) -> bool {
        loop {
            match self.chain.state(state) {
                State::Eol => return true,
                State::Value { elliptical, .. } => return *elliptical,
                State::Fixed(_) => return false,
                State::Free(_) | State::OptionalValue(_) => state = self.chain.next_state(state),
            }
        }
    }
}

// ─── Structure queries ───────────────────────────────────────────────────────

impl Mask {
    /// Sample text showing the mask's shape; stops at an ellipsis.
    pub fn placeholder(&self) -> String {
        let placeholder = self.chain.states().iter().map_while(|state| match state {
            State::Free(ch) | State::Fixed(ch) => Some(*ch),
            State::Value {
                elliptical: true, ..
            }
            | State::Eol => None,
            State::Value { kind, .. } | State::OptionalValue(kind) => Some(kind.placeholder()),
        });
        match self.direction {
            Direction::LeftToRight => placeholder.collect(),
            Direction::RightToLeft => placeholder.collect::<Vec<_>>().into_iter().rev().collect(),
        }
    }

    /// Minimal formatted length of a complete input.
    pub fn acceptable_text_length(&self) -> usize {
        self.count_states(|state| {
            matches!(state, State::Free(_) | State::Fixed(_) | State::Value { .. })
        })
    }

    /// Formatted length with every optional symbol filled.
    pub fn total_text_length(&self) -> usize {
        self.count_states(|state| !matches!(state, State::Eol))
    }

    /// Minimal extracted value length of a complete input.
    pub fn acceptable_value_length(&self) -> usize {
        self.count_states(|state| matches!(state, State::Fixed(_) | State::Value { .. }))
    }

    /// Extracted value length with every optional symbol filled.
    pub fn total_value_length(&self) -> usize {
        self.count_states(|state| {
            matches!(
                state,
                State::Fixed(_) | State::Value { .. } | State::OptionalValue(_)
            )
        })
    }

    fn count_states(&self, predicate: impl Fn(&State) -> bool) -> usize {
        self.chain.states().iter().filter(|state| predicate(state)).count()
    }
}
