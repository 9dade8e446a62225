//! Compiled mask states.
//!
//! A mask compiles to a linear chain of states. The successor of state `i` is
//! `i + 1` and the last state is always [`State::Eol`]. An elliptical value
//! state is its own successor.

use std::fmt;

use itertools::Itertools;

use crate::format::ValueKind;

/// Index of a state inside its [`StateChain`].
pub type StateId = usize;

static EOL: State = State::Eol;

/// One step of a compiled mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Decoration that is inserted but never extracted.
    Free(char),
    /// Decoration that is inserted and extracted.
    Fixed(char),
    /// A mandatory input character.
    Value { kind: ValueKind, elliptical: bool },
    /// An input character that may be skipped.
    OptionalValue(ValueKind),
    /// End of the mask.
    Eol,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free(ch) => write!(f, "{ch:?}"),
            Self::Fixed(ch) => write!(f, "{{{ch}}}"),
            Self::Value { kind, elliptical } => {
                let ellipsis = if *elliptical { "…" } else { "" };
                write!(f, "[{}{ellipsis}]", kind.symbol(false))
            }
            Self::OptionalValue(kind) => write!(f, "[{}]", kind.symbol(true)),
            Self::Eol => f.write_str("EOL"),
        }
    }
}

/// Outcome of feeding one character to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Next {
    /// State to continue from.
    pub state: StateId,
    /// Character appended to the formatted text.
    pub insert: Option<char>,
    /// Whether the input character was consumed.
    pub pass: bool,
    /// Character appended to the extracted value.
    pub value: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChain {
    states: Vec<State>,
}

impl StateChain {
    /// Build a chain from `states`, terminated with [`State::Eol`].
    pub(crate) fn new(mut states: Vec<State>) -> Self {
        states.push(State::Eol);
        Self { states }
    }

    pub fn initial(&self) -> StateId {
        0
    }

    /// States of the chain without the terminating [`State::Eol`].
    pub fn states(&self) -> &[State] {
        &self.states[..self.states.len() - 1]
    }

    /// Look up a state. Ids outside the chain read as [`State::Eol`].
    pub fn state(&self, id: StateId) -> &State {
        self.states.get(id).unwrap_or(&EOL)
    }

    fn child(&self, id: StateId) -> StateId {
        (id + 1).min(self.states.len() - 1)
    }

    /// State following `id`.
    pub fn next_state(&self, id: StateId) -> StateId {
        match self.state(id) {
            State::Value {
                elliptical: true, ..
            } => id,
            _ => self.child(id),
        }
    }

    /// Feed `ch` to state `id`. `None` means the character is rejected.
    pub fn accept(&self, id: StateId, ch: char) -> Option<Next> {
        let next = self.next_state(id);
        match self.state(id) {
            State::Free(own) | State::Fixed(own) if *own == ch => Some(Next {
                state: next,
                insert: Some(ch),
                pass: true,
                value: self.is_fixed(id).then_some(ch),
            }),
            State::Free(own) | State::Fixed(own) => Some(Next {
                state: next,
                insert: Some(*own),
                pass: false,
                value: self.is_fixed(id).then_some(*own),
            }),
            State::Value { kind, .. } | State::OptionalValue(kind) if kind.accepts(ch) => {
                Some(Next {
                    state: next,
                    insert: Some(ch),
                    pass: true,
                    value: Some(ch),
                })
            }
            State::OptionalValue(_) => Some(Next {
                state: next,
                insert: None,
                pass: false,
                value: None,
            }),
            State::Value { .. } | State::Eol => None,
        }
    }

    /// Insert without input; only decoration can be autocompleted.
    pub fn autocomplete(&self, id: StateId) -> Option<Next> {
        let (own, value) = match self.state(id) {
            State::Free(own) => (*own, None),
            State::Fixed(own) => (*own, Some(*own)),
            _ => return None,
        };
        Some(Next {
            state: self.next_state(id),
            insert: Some(own),
            pass: false,
            value,
        })
    }

    fn is_fixed(&self, id: StateId) -> bool {
        matches!(self.state(id), State::Fixed(_))
    }
}

impl fmt::Display for StateChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.states.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(states: Vec<State>) -> StateChain {
        StateChain::new(states)
    }

    fn numeric() -> State {
        State::Value {
            kind: ValueKind::Numeric,
            elliptical: false,
        }
    }

    #[test]
    fn test_free_accepts_and_inserts() {
        let chain = chain(vec![State::Free('+')]);
        assert_eq!(
            chain.accept(0, '+'),
            Some(Next {
                state: 1,
                insert: Some('+'),
                pass: true,
                value: None,
            })
        );
        assert_eq!(
            chain.accept(0, '7'),
            Some(Next {
                state: 1,
                insert: Some('+'),
                pass: false,
                value: None,
            })
        );
    }

    #[test]
    fn test_fixed_extracts_its_character() {
        let chain = chain(vec![State::Fixed('.')]);
        assert_eq!(chain.accept(0, '.').and_then(|n| n.value), Some('.'));
        let mismatch = chain.accept(0, '1').expect("fixed never rejects");
        assert!(!mismatch.pass);
        assert_eq!(mismatch.insert, Some('.'));
        assert_eq!(mismatch.value, Some('.'));
    }

    #[test]
    fn test_value_rejects_foreign_characters() {
        let chain = chain(vec![numeric()]);
        assert_eq!(chain.accept(0, 'x'), None);
        let next = chain.accept(0, '5').expect("digit accepted");
        assert_eq!(next.state, 1);
        assert_eq!(next.value, Some('5'));
    }

    #[test]
    fn test_optional_value_skips_on_mismatch() {
        let chain = chain(vec![State::OptionalValue(ValueKind::Numeric)]);
        assert_eq!(
            chain.accept(0, 'x'),
            Some(Next {
                state: 1,
                insert: None,
                pass: false,
                value: None,
            })
        );
        assert!(chain.accept(0, '1').is_some_and(|n| n.pass));
    }

    #[test]
    fn test_elliptical_value_loops() {
        let chain = chain(vec![State::Value {
            kind: ValueKind::Numeric,
            elliptical: true,
        }]);
        assert_eq!(chain.next_state(0), 0);
        assert_eq!(chain.accept(0, '3').map(|n| n.state), Some(0));
    }

    #[test]
    fn test_eol_rejects_everything() {
        let chain = chain(vec![]);
        assert_eq!(chain.accept(0, 'a'), None);
        assert_eq!(chain.autocomplete(0), None);
        assert_eq!(chain.next_state(0), 0);
    }

    #[test]
    fn test_autocomplete_only_decoration() {
        let chain = chain(vec![State::Free(' '), State::Fixed('-'), numeric()]);
        assert_eq!(chain.autocomplete(0).and_then(|n| n.value), None);
        assert_eq!(chain.autocomplete(0).and_then(|n| n.insert), Some(' '));
        assert_eq!(chain.autocomplete(1).and_then(|n| n.value), Some('-'));
        assert_eq!(chain.autocomplete(2), None);
    }

    #[test]
    fn test_display() {
        let chain = chain(vec![
            State::Free('x'),
            State::Fixed('.'),
            numeric(),
            State::OptionalValue(ValueKind::Literal),
            State::Value {
                kind: ValueKind::AlphaNumeric,
                elliptical: true,
            },
        ]);
        assert_eq!(chain.to_string(), "'x' {.} [0] [a] [_…] EOL");
    }
}
