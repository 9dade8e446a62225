//! Format compiler: turns a mask format into a [`StateChain`].

use std::ops::ControlFlow;
use std::str::Chars;

use super::symbol::{ELLIPSIS, ESCAPE, ValueKind, resolve_symbol};
use super::{FormatError, sanitize};
use crate::notation::Notation;
use crate::state::{State, StateChain};

/// Sanitize and compile `format` into a chain of states.
///
/// Compilation ends at the first `…`; anything after it can never be reached.
pub fn compile(format: &str, notations: &[Notation]) -> Result<StateChain, FormatError> {
    let sanitized = sanitize(format, notations)?;
    let mut compiler = Compiler {
        notations,
        chars: sanitized.chars(),
        context: Context::Free,
        escaped: false,
        previous: None,
        states: Vec::new(),
    };
    compiler.compile_states()?;
    Ok(StateChain::new(compiler.states))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Free,
    Value,
    Fixed,
}

struct Compiler<'a> {
    notations: &'a [Notation],
    chars: Chars<'a>,
    context: Context,
    escaped: bool,
    /// Class of the last symbol in the current `[]` group.
    previous: Option<ValueKind>,
    states: Vec<State>,
}

impl Compiler<'_> {
    fn compile_states(&mut self) -> Result<(), FormatError> {
        while let Some(ch) = self.chars.next() {
            if self.escaped {
                self.escaped = false;
                if self.compile_char(ch)?.is_break() {
                    break;
                }
                continue;
            }
            match ch {
                ESCAPE => self.escaped = true,
                '[' => {
                    self.context = Context::Value;
                    self.previous = None;
                }
                '{' => self.context = Context::Fixed,
                ']' | '}' => {
                    self.context = Context::Free;
                    self.previous = None;
                }
                _ => {
                    if self.compile_char(ch)?.is_break() {
                        break;
                    }
                }
            }
        }

        let rest: String = self.chars.by_ref().collect();
        let rest = rest.trim_start_matches(']');
        if !rest.is_empty() {
            tracing::debug!(ignored = rest, "format text after ellipsis is unreachable");
        }
        Ok(())
    }

    fn compile_char(&mut self, ch: char) -> Result<ControlFlow<()>, FormatError> {
        let state = match self.context {
            Context::Free => State::Free(ch),
            Context::Fixed => State::Fixed(ch),
            Context::Value if ch == ELLIPSIS => {
                let kind = self.previous.take().ok_or(FormatError::OrphanEllipsis)?;
                self.states.push(State::Value {
                    kind,
                    elliptical: true,
                });
                return Ok(ControlFlow::Break(()));
            }
            Context::Value => {
                let symbol =
                    resolve_symbol(ch, self.notations).ok_or(FormatError::UnknownSymbol(ch))?;
                self.previous = Some(symbol.kind.clone());
                if symbol.optional {
                    State::OptionalValue(symbol.kind)
                } else {
                    State::Value {
                        kind: symbol.kind,
                        elliptical: false,
                    }
                }
            }
        };
        self.states.push(state);
        Ok(ControlFlow::Continue(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(format: &str) -> Vec<State> {
        compile(format, &[])
            .expect("format should compile")
            .states()
            .to_vec()
    }

    fn value(kind: ValueKind) -> State {
        State::Value {
            kind,
            elliptical: false,
        }
    }

    #[test]
    fn test_phone_format() {
        let chain = compile("+7 ([000]) [000]", &[]).expect("compiles");
        assert_eq!(
            chain.to_string(),
            "'+' '7' ' ' '(' [0] [0] [0] ')' ' ' [0] [0] [0] EOL"
        );
    }

    #[test]
    fn test_fixed_and_optional() {
        assert_eq!(
            states("[09]{.}"),
            vec![
                value(ValueKind::Numeric),
                State::OptionalValue(ValueKind::Numeric),
                State::Fixed('.'),
            ]
        );
    }

    #[test]
    fn test_all_builtin_classes() {
        assert_eq!(
            states("[Aa][_-]"),
            vec![
                value(ValueKind::Literal),
                State::OptionalValue(ValueKind::Literal),
                value(ValueKind::AlphaNumeric),
                State::OptionalValue(ValueKind::AlphaNumeric),
            ]
        );
    }

    #[test]
    fn test_compiles_sanitized_form() {
        assert_eq!(states("[9990] AC"), states("[0999] AC"));
    }

    #[test]
    fn test_ellipsis_inherits_previous_class() {
        assert_eq!(
            states("[A0…]"),
            vec![
                value(ValueKind::Literal),
                value(ValueKind::Numeric),
                State::Value {
                    kind: ValueKind::Numeric,
                    elliptical: true,
                },
            ]
        );
    }

    #[test]
    fn test_ellipsis_ends_compilation() {
        assert_eq!(
            states("[0…]-[00]"),
            vec![
                value(ValueKind::Numeric),
                State::Value {
                    kind: ValueKind::Numeric,
                    elliptical: true,
                },
            ]
        );
    }

    #[test]
    fn test_orphan_ellipsis() {
        assert_eq!(compile("[…]", &[]), Err(FormatError::OrphanEllipsis));
        assert_eq!(compile("[0]-[…]", &[]), Err(FormatError::OrphanEllipsis));
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(compile("[0x]", &[]), Err(FormatError::UnknownSymbol('x')));
    }

    #[test]
    fn test_custom_notation() {
        let notations = [Notation::new('b', "abc", true)];
        let chain = compile("[b]", &notations).expect("compiles");
        assert_eq!(
            chain.states(),
            &[State::OptionalValue(ValueKind::Custom {
                character: 'b',
                character_set: "abc".to_string(),
            })]
        );
    }

    #[test]
    fn test_escaped_brackets_become_free() {
        assert_eq!(
            states(r"\[[0]\]"),
            vec![State::Free('['), value(ValueKind::Numeric), State::Free(']')]
        );
    }

    #[test]
    fn test_bracket_errors_propagate() {
        assert!(matches!(
            compile("[00[9]9]", &[]),
            Err(FormatError::NestedBracket { .. })
        ));
        assert!(matches!(
            compile("[00", &[]),
            Err(FormatError::UnclosedBracket { .. })
        ));
    }

    #[test]
    fn test_mixed_bracket_kinds_rejected() {
        assert_eq!(
            compile("[9{.}0]", &[]).map(|chain| chain.to_string()),
            Err(FormatError::NestedBracket {
                bracket: '{',
                position: 2,
            })
        );
        assert!(matches!(
            compile("{-[0]}", &[]),
            Err(FormatError::NestedBracket { bracket: '[', .. })
        ));
    }

    #[test]
    fn test_empty_format() {
        let chain = compile("", &[]).expect("compiles");
        assert!(chain.states().is_empty());
        assert_eq!(chain.to_string(), "EOL");
    }
}
