//! Symbol vocabulary for `[]` groups and character class membership tests.

use phf::{Map, phf_map};

use crate::notation::{Notation, find_notation};

/// Inside `[]`, repeats the class of the preceding symbol indefinitely.
pub const ELLIPSIS: char = '…';

/// Makes the following bracket character literal.
pub const ESCAPE: char = '\\';

/// The set of characters a value state accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// ASCII digits.
    Numeric,
    /// Alphabetic characters.
    Literal,
    /// Alphabetic characters and ASCII digits.
    AlphaNumeric,
    /// Characters of a user-defined notation.
    Custom {
        character: char,
        character_set: String,
    },
}

impl ValueKind {
    /// Test whether `ch` belongs to this class.
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            Self::Numeric => ch.is_ascii_digit(),
            Self::Literal => ch.is_alphabetic(),
            Self::AlphaNumeric => ch.is_alphabetic() || ch.is_ascii_digit(),
            Self::Custom { character_set, .. } => character_set.contains(ch),
        }
    }

    /// Character shown for this class in a placeholder.
    pub fn placeholder(&self) -> char {
        match self {
            Self::Numeric => '0',
            Self::Literal => 'a',
            Self::AlphaNumeric => '-',
            Self::Custom { character, .. } => *character,
        }
    }

    /// Format symbol that compiles to this class.
    pub fn symbol(&self, optional: bool) -> char {
        match (self, optional) {
            (Self::Numeric, false) => '0',
            (Self::Numeric, true) => '9',
            (Self::Literal, false) => 'A',
            (Self::Literal, true) => 'a',
            (Self::AlphaNumeric, false) => '_',
            (Self::AlphaNumeric, true) => '-',
            (Self::Custom { character, .. }, _) => *character,
        }
    }
}

impl From<&Notation> for ValueKind {
    fn from(notation: &Notation) -> Self {
        Self::Custom {
            character: notation.character,
            character_set: notation.character_set.clone(),
        }
    }
}

/// Built-in symbol families; a `[]` group may only hold one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SymbolClass {
    Numeric,
    Literal,
    AlphaNumeric,
}

impl SymbolClass {
    fn value_kind(self) -> ValueKind {
        match self {
            Self::Numeric => ValueKind::Numeric,
            Self::Literal => ValueKind::Literal,
            Self::AlphaNumeric => ValueKind::AlphaNumeric,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BuiltinSymbol {
    pub class: SymbolClass,
    pub optional: bool,
}

static BUILTIN_SYMBOLS: Map<char, BuiltinSymbol> = phf_map! {
    '0' => BuiltinSymbol { class: SymbolClass::Numeric, optional: false },
    '9' => BuiltinSymbol { class: SymbolClass::Numeric, optional: true },
    'A' => BuiltinSymbol { class: SymbolClass::Literal, optional: false },
    'a' => BuiltinSymbol { class: SymbolClass::Literal, optional: true },
    '_' => BuiltinSymbol { class: SymbolClass::AlphaNumeric, optional: false },
    '-' => BuiltinSymbol { class: SymbolClass::AlphaNumeric, optional: true },
};

pub(crate) fn builtin_symbol(ch: char) -> Option<BuiltinSymbol> {
    BUILTIN_SYMBOLS.get(&ch).copied()
}

/// A `[]` symbol resolved to the state it compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Symbol {
    pub kind: ValueKind,
    pub optional: bool,
}

/// Resolve `ch` against the built-in symbols first, then the custom notations.
pub(crate) fn resolve_symbol(ch: char, notations: &[Notation]) -> Option<Symbol> {
    if let Some(builtin) = builtin_symbol(ch) {
        return Some(Symbol {
            kind: builtin.class.value_kind(),
            optional: builtin.optional,
        });
    }
    find_notation(notations, ch).map(|notation| Symbol {
        kind: ValueKind::from(notation),
        optional: notation.is_optional,
    })
}
