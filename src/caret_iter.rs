//! Character iteration over a [`CaretString`] that knows where the caret is.

use crate::caret_string::{CaretGravity, CaretString};

/// Writing direction of a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    /// Input is processed from its end; the caret string is mirrored first.
    RightToLeft,
}

/// Yields the characters of a caret string and reports, for the character
/// about to be read, whether it sits before the caret.
#[derive(Debug, Clone)]
pub struct CaretStringIterator {
    chars: Vec<char>,
    caret_position: usize,
    caret_gravity: CaretGravity,
    direction: Direction,
    current_index: usize,
}

impl CaretStringIterator {
    pub fn new(text: &CaretString, direction: Direction) -> Self {
        Self {
            chars: text.string.chars().collect(),
            caret_position: text.caret_position,
            caret_gravity: text.caret_gravity,
            direction,
            current_index: 0,
        }
    }

    /// Whether insertions made now land before the caret.
    pub fn before_caret(&self) -> bool {
        let (index, caret) = (self.current_index, self.caret_position);
        match (self.direction, self.caret_gravity) {
            (Direction::RightToLeft, _) | (Direction::LeftToRight, CaretGravity::Forward) => {
                index <= caret
            }
            (Direction::LeftToRight, CaretGravity::Backward) => {
                index < caret || (index == 0 && caret == 0)
            }
        }
    }

    /// Whether dropping the character just read moves the caret back.
    pub fn deletion_affects_caret(&self) -> bool {
        self.current_index <= self.caret_position
    }
}

impl Iterator for CaretStringIterator {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let ch = *self.chars.get(self.current_index)?;
        self.current_index += 1;
        Some(ch)
    }
}
