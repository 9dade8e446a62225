//! Choosing between several masks for the same field.
//!
//! A [`MaskPicker`] holds a primary format and any number of affine formats.
//! Each time the text changes, every mask is scored with the configured
//! [`AffinityCalculationStrategy`] and the best one formats the text. The
//! primary mask wins ties.

use std::cmp::Reverse;
use std::sync::Arc;

use crate::affinity::AffinityCalculationStrategy;
use crate::caret_iter::Direction;
use crate::caret_string::{CaretGravity, CaretString};
use crate::format::FormatError;
use crate::mask::{Mask, MaskCache, MaskResult};
use crate::notation::Notation;

/// A text field edit: the whole new text plus what changed in it.
///
/// `start` is the character offset of the change, `removed` the number of
/// characters replaced there and `inserted` the number of characters added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub text: String,
    pub start: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl TextEdit {
    pub fn new(text: impl Into<String>, start: usize, removed: usize, inserted: usize) -> Self {
        Self {
            text: text.into(),
            start,
            removed,
            inserted,
        }
    }

    /// Pure deletions; replacements count as typing.
    pub fn is_deletion(&self) -> bool {
        self.removed > 0 && self.inserted == 0
    }

    fn caret_string(&self) -> CaretString {
        if self.is_deletion() {
            CaretString::with_gravity(self.text.as_str(), self.start, CaretGravity::Backward)
        } else {
            CaretString::new(self.text.as_str(), self.start + self.inserted)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPicker {
    pub primary_format: String,
    pub affine_formats: Vec<String>,
    pub custom_notations: Vec<Notation>,
    pub affinity_strategy: AffinityCalculationStrategy,
    pub autocomplete: bool,
    pub right_to_left: bool,
}

impl MaskPicker {
    /// Picker with no affine formats, autocomplete on.
    pub fn new(primary_format: impl Into<String>) -> Self {
        Self {
            primary_format: primary_format.into(),
            affine_formats: Vec::new(),
            custom_notations: Vec::new(),
            affinity_strategy: AffinityCalculationStrategy::default(),
            autocomplete: true,
            right_to_left: false,
        }
    }

    pub fn with_affine_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affine_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_custom_notations(mut self, notations: Vec<Notation>) -> Self {
        self.custom_notations = notations;
        self
    }

    pub fn with_affinity_strategy(mut self, strategy: AffinityCalculationStrategy) -> Self {
        self.affinity_strategy = strategy;
        self
    }

    pub fn with_autocomplete(mut self, autocomplete: bool) -> Self {
        self.autocomplete = autocomplete;
        self
    }

    pub fn with_right_to_left(mut self, right_to_left: bool) -> Self {
        self.right_to_left = right_to_left;
        self
    }

    fn direction(&self) -> Direction {
        if self.right_to_left {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        }
    }

    fn mask(&self, cache: &MaskCache, format: &str) -> Result<Arc<Mask>, FormatError> {
        cache.get_or_create_with_direction(format, &self.custom_notations, self.direction())
    }

    pub fn primary_mask(&self, cache: &MaskCache) -> Result<Arc<Mask>, FormatError> {
        self.mask(cache, &self.primary_format)
    }

    // ─── Selection ───────────────────────────────────────────────────────────

    /// The mask with the highest affinity for `text`.
    pub fn pick_mask(
        &self,
        cache: &MaskCache,
        text: &CaretString,
        autocomplete: bool,
    ) -> Result<Arc<Mask>, FormatError> {
        let primary = self.primary_mask(cache)?;
        if self.affine_formats.is_empty() {
            return Ok(primary);
        }

        let strategy = self.affinity_strategy;
        let primary_affinity = strategy.calculate_affinity_of_mask(&primary, text, autocomplete);

        let mut candidates = self
            .affine_formats
            .iter()
            .map(|format| {
                let mask = self.mask(cache, format)?;
                let affinity = strategy.calculate_affinity_of_mask(&mask, text, autocomplete);
                Ok((mask, affinity))
            })
            .collect::<Result<Vec<_>, FormatError>>()?;
        candidates.sort_by_key(|(_, affinity)| Reverse(*affinity));

        let insert_index = candidates
            .iter()
            .position(|(_, affinity)| primary_affinity >= *affinity)
            .unwrap_or(candidates.len());
        candidates.insert(insert_index, (primary, primary_affinity));

        let (mask, affinity) = candidates.swap_remove(0);
        tracing::trace!(
            text = text.string.as_str(),
            primary_affinity,
            picked = mask.format(),
            affinity,
            "picked mask"
        );
        Ok(mask)
    }

    // ─── Text changes ────────────────────────────────────────────────────────

    /// Pick a mask for `text` and apply it.
    pub fn apply(&self, cache: &MaskCache, text: &CaretString) -> Result<MaskResult, FormatError> {
        self.apply_with(cache, text, self.autocomplete)
    }

    fn apply_with(
        &self,
        cache: &MaskCache,
        text: &CaretString,
        autocomplete: bool,
    ) -> Result<MaskResult, FormatError> {
        let mask = self.pick_mask(cache, text, autocomplete)?;
        Ok(mask.apply(text, autocomplete))
    }

    /// Replace the whole text, caret at the end.
    pub fn set_text(&self, cache: &MaskCache, text: &str) -> Result<MaskResult, FormatError> {
        self.apply(cache, &CaretString::at_end(text))
    }

    /// Reformat after an edit. Deletions keep the caret before decoration and
    /// never autocomplete.
    pub fn handle_edit(
        &self,
        cache: &MaskCache,
        edit: &TextEdit,
    ) -> Result<MaskResult, FormatError> {
        let autocomplete = self.autocomplete && !edit.is_deletion();
        self.apply_with(cache, &edit.caret_string(), autocomplete)
    }

    /// Reformat when the field gains focus. Only autocompleting pickers
    /// change the text then.
    pub fn focus(&self, cache: &MaskCache, text: &str) -> Result<Option<MaskResult>, FormatError> {
        if !self.autocomplete {
            return Ok(None);
        }
        self.set_text(cache, text).map(Some)
    }

    // ─── Primary mask queries ────────────────────────────────────────────────

    pub fn placeholder(&self, cache: &MaskCache) -> Result<String, FormatError> {
        Ok(self.primary_mask(cache)?.placeholder())
    }

    pub fn acceptable_text_length(&self, cache: &MaskCache) -> Result<usize, FormatError> {
        Ok(self.primary_mask(cache)?.acceptable_text_length())
    }

    pub fn total_text_length(&self, cache: &MaskCache) -> Result<usize, FormatError> {
        Ok(self.primary_mask(cache)?.total_text_length())
    }

    pub fn acceptable_value_length(&self, cache: &MaskCache) -> Result<usize, FormatError> {
        Ok(self.primary_mask(cache)?.acceptable_value_length())
    }

    pub fn total_value_length(&self, cache: &MaskCache) -> Result<usize, FormatError> {
        Ok(self.primary_mask(cache)?.total_value_length())
    }
}
