//! Mask format language.
//!
//! A mask format mixes literal decoration with bracketed placeholder groups.
//!
//! # Format syntax
//!
//! | Token      | Meaning                                                    |
//! |------------|------------------------------------------------------------|
//! | `x`        | Free character: decoration, never extracted               |
//! | `{x}`      | Fixed character: decoration that is also extracted        |
//! | `[0]`      | Mandatory digit                                            |
//! | `[9]`      | Optional digit                                             |
//! | `[A]`      | Mandatory letter                                           |
//! | `[a]`      | Optional letter                                            |
//! | `[_]`      | Mandatory letter or digit                                  |
//! | `[-]`      | Optional letter or digit                                   |
//! | `[0…]`     | Any number of symbols of the preceding class               |
//! | `[c]`      | Custom symbol, see [`Notation`](crate::Notation)           |
//! | `\[`       | Escaped bracket, taken literally                           |
//!
//! Groups are flat: no bracket may be opened or closed inside another group,
//! so `[` and `{` never nest in either order.
//! A `[]` group mixing built-in classes (`[09Aa]`) is split into one group per
//! class before compilation.

pub mod compiler;
pub mod sanitizer;
mod symbol;

pub use compiler::compile;
pub use sanitizer::sanitize;
pub use symbol::{ELLIPSIS, ESCAPE, ValueKind};

/// Errors raised while sanitizing or compiling a mask format.
///
/// Positions are character offsets into the format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A bracket was opened while another group was still open.
    NestedBracket { bracket: char, position: usize },
    /// A bracket was never closed.
    UnclosedBracket { bracket: char, position: usize },
    /// A closing bracket without a matching opener.
    UnexpectedClosingBracket { bracket: char, position: usize },
    /// A character inside `[]` that is neither built in nor a custom notation.
    UnknownSymbol(char),
    /// `…` with no preceding symbol in its group to inherit a class from.
    OrphanEllipsis,
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NestedBracket { bracket, position } => {
                write!(f, "Nested '{bracket}' at position {position} in mask format")
            }
            Self::UnclosedBracket { bracket, position } => {
                write!(f, "Unclosed '{bracket}' opened at position {position} in mask format")
            }
            Self::UnexpectedClosingBracket { bracket, position } => {
                write!(f, "Unexpected '{bracket}' at position {position} in mask format")
            }
            Self::UnknownSymbol(c) => write!(f, "Unknown symbol {c:?} inside [] in mask format"),
            Self::OrphanEllipsis => {
                write!(f, "Ellipsis '{ELLIPSIS}' has no preceding symbol to inherit from")
            }
        }
    }
}

impl std::error::Error for FormatError {}
