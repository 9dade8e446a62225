/// A user-defined symbol for `[]` groups.
///
/// `Notation::new('b', "abc", false)` makes `[b]` accept one of `a`, `b` or `c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Notation {
    /// Symbol used inside the mask format.
    pub character: char,
    /// Characters the symbol accepts.
    pub character_set: String,
    /// Optional symbols never gate completeness.
    pub is_optional: bool,
}

impl Notation {
    pub fn new(character: char, character_set: impl Into<String>, is_optional: bool) -> Self {
        Self {
            character,
            character_set: character_set.into(),
            is_optional,
        }
    }

    pub fn accepts(&self, ch: char) -> bool {
        self.character_set.contains(ch)
    }
}

/// Look up the notation for `ch`, if one was registered.
pub(crate) fn find_notation(notations: &[Notation], ch: char) -> Option<&Notation> {
    notations.iter().find(|n| n.character == ch)
}
