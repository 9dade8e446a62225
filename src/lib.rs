//! Declarative input masks for text fields.
//!
//! A mask format such as `+7 ([000]) [000]-[00]-[00]` is compiled once into a
//! chain of states. Applying it to raw input formats the text, keeps the caret
//! where the user expects it, extracts the entered value and reports whether
//! every mandatory character has been typed.
//!
//! # Example
//!
//! ```rust
//! use inputmask::{CaretString, Mask};
//!
//! let mask = Mask::new("+7 ([000]) [000]-[00]-[00]").unwrap();
//! let result = mask.apply(&CaretString::at_end("9991234567"), true);
//!
//! assert_eq!(result.formatted_text.string, "+7 (999) 123-45-67");
//! assert_eq!(result.extracted_value, "9991234567");
//! assert!(result.complete);
//! ```
//!
//! Several formats can share one field through a [`MaskPicker`], which scores
//! each candidate with an [`AffinityCalculationStrategy`] and applies the best.

mod affinity;
mod caret_iter;
mod caret_string;
pub mod format;
mod mask;
mod notation;
mod picker;
pub mod state;

pub use affinity::AffinityCalculationStrategy;
pub use caret_iter::{CaretStringIterator, Direction};
pub use caret_string::{CaretGravity, CaretString};
pub use format::{FormatError, ValueKind};
pub use mask::{Mask, MaskCache, MaskResult};
pub use notation::Notation;
pub use picker::{MaskPicker, TextEdit};
