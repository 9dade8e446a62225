//! Format normalisation ahead of compilation.
//!
//! Sanitizing checks bracket balance, splits `[]` groups that mix built-in
//! classes and orders symbols inside every group: mandatory, then optional,
//! then `…`. The result is equivalent to the input for any input text.

use std::mem;

use itertools::Itertools;

use super::symbol::{ELLIPSIS, ESCAPE, SymbolClass, builtin_symbol};
use super::FormatError;
use crate::notation::{Notation, find_notation};

/// Normalise `format`, treating the characters of `notations` as `[]` symbols.
pub fn sanitize(format: &str, notations: &[Notation]) -> Result<String, FormatError> {
    check_brackets(format)?;
    let sanitized = split_blocks(format)
        .into_iter()
        .flat_map(divide_mixed_block)
        .map(|block| sort_block(block, notations))
        .map(|block| block.render())
        .join("");
    Ok(sanitized)
}

// ─── Bracket balance ─────────────────────────────────────────────────────────

fn check_brackets(format: &str) -> Result<(), FormatError> {
    let mut square: Option<usize> = None;
    let mut curly: Option<usize> = None;
    let mut escaped = false;

    for (position, ch) in format.chars().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            ESCAPE => escaped = true,
            '{' | '[' if square.is_some() || curly.is_some() => {
                return Err(FormatError::NestedBracket {
                    bracket: ch,
                    position,
                });
            }
            '}' if square.is_some() => {
                return Err(FormatError::UnexpectedClosingBracket {
                    bracket: ch,
                    position,
                });
            }
            ']' if curly.is_some() => {
                return Err(FormatError::UnexpectedClosingBracket {
                    bracket: ch,
                    position,
                });
            }
            '[' | '{' => {
                let open = if ch == '[' { &mut square } else { &mut curly };
                if open.is_some() {
                    return Err(FormatError::NestedBracket {
                        bracket: ch,
                        position,
                    });
                }
                *open = Some(position);
            }
            ']' | '}' => {
                let open = if ch == ']' { &mut square } else { &mut curly };
                if open.take().is_none() {
                    return Err(FormatError::UnexpectedClosingBracket {
                        bracket: ch,
                        position,
                    });
                }
            }
            _ => {}
        }
    }

    if let Some(position) = square {
        return Err(FormatError::UnclosedBracket {
            bracket: '[',
            position,
        });
    }
    if let Some(position) = curly {
        return Err(FormatError::UnclosedBracket {
            bracket: '{',
            position,
        });
    }
    Ok(())
}

// ─── Blocks ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    /// Text outside any bracket, escapes included.
    Free(String),
    /// A `{...}` group, braces included.
    Fixed(String),
    /// Symbols of a `[...]` group. An escape and its target form one symbol.
    Value(Vec<String>),
}

impl Block {
    fn render(&self) -> String {
        match self {
            Self::Free(text) | Self::Fixed(text) => text.clone(),
            Self::Value(symbols) => format!("[{}]", symbols.concat()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Free,
    Value,
    Fixed,
}

fn split_blocks(format: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut symbols: Vec<String> = Vec::new();
    let mut context = Context::Free;
    let mut chars = format.chars();

    while let Some(ch) = chars.next() {
        if ch == ESCAPE {
            let mut pair = String::from(ESCAPE);
            pair.extend(chars.next());
            match context {
                Context::Value => symbols.push(pair),
                Context::Free | Context::Fixed => text.push_str(&pair),
            }
            continue;
        }
        match (context, ch) {
            (Context::Free, '[') => {
                if !text.is_empty() {
                    blocks.push(Block::Free(mem::take(&mut text)));
                }
                context = Context::Value;
            }
            (Context::Free, '{') => {
                if !text.is_empty() {
                    blocks.push(Block::Free(mem::take(&mut text)));
                }
                text.push(ch);
                context = Context::Fixed;
            }
            (Context::Value, ']') => {
                blocks.push(Block::Value(mem::take(&mut symbols)));
                context = Context::Free;
            }
            (Context::Fixed, '}') => {
                text.push(ch);
                blocks.push(Block::Fixed(mem::take(&mut text)));
                context = Context::Free;
            }
            (Context::Value, _) => symbols.push(ch.to_string()),
            (Context::Free | Context::Fixed, _) => text.push(ch),
        }
    }

    if !text.is_empty() {
        blocks.push(Block::Free(text));
    }
    blocks
}

/// The single character of a symbol, or `None` for an escape pair.
fn single_char(symbol: &str) -> Option<char> {
    let mut chars = symbol.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

fn symbol_class(symbol: &str) -> Option<SymbolClass> {
    single_char(symbol)
        .and_then(builtin_symbol)
        .map(|builtin| builtin.class)
}

/// Split a `[]` group wherever the built-in class changes.
///
/// Symbols without a built-in class stay in the current group.
fn divide_mixed_block(block: Block) -> Vec<Block> {
    let Block::Value(symbols) = block else {
        return vec![block];
    };

    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_class: Option<SymbolClass> = None;

    for symbol in symbols {
        if let Some(class) = symbol_class(&symbol) {
            if current_class.is_some_and(|c| c != class) {
                groups.push(mem::take(&mut current));
            }
            current_class = Some(class);
        }
        current.push(symbol);
    }
    if !current.is_empty() || groups.is_empty() {
        groups.push(current);
    }

    groups.into_iter().map(Block::Value).collect()
}

fn symbol_rank(symbol: &str, notations: &[Notation]) -> u8 {
    match single_char(symbol) {
        Some(ELLIPSIS) => 2,
        Some(ch) => match builtin_symbol(ch) {
            Some(builtin) => u8::from(builtin.optional),
            None => find_notation(notations, ch).map_or(0, |n| u8::from(n.is_optional)),
        },
        None => 0,
    }
}

fn sort_block(block: Block, notations: &[Notation]) -> Block {
    match block {
        Block::Value(symbols) => Block::Value(
            symbols
                .into_iter()
                .sorted_by_key(|symbol| symbol_rank(symbol, notations))
                .collect(),
        ),
        other => other,
    }
}
