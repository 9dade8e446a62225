//! Shared cache of compiled masks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use super::Mask;
use crate::caret_iter::Direction;
use crate::format::FormatError;
use crate::notation::Notation;

static GLOBAL: Lazy<MaskCache> = Lazy::new(MaskCache::new);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    format: String,
    notations: Vec<Notation>,
    direction: Direction,
}

/// Compiled masks keyed by format, notations and direction.
///
/// Safe to share between threads. A format that fails to compile is not
/// cached; its error is returned on every lookup.
#[derive(Debug, Default)]
pub struct MaskCache {
    masks: Mutex<HashMap<CacheKey, Arc<Mask>>>,
}

impl MaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static MaskCache {
        &GLOBAL
    }

    pub fn get_or_create(
        &self,
        format: &str,
        notations: &[Notation],
    ) -> Result<Arc<Mask>, FormatError> {
        self.get_or_create_with_direction(format, notations, Direction::LeftToRight)
    }

    pub fn get_or_create_right_to_left(
        &self,
        format: &str,
        notations: &[Notation],
    ) -> Result<Arc<Mask>, FormatError> {
        self.get_or_create_with_direction(format, notations, Direction::RightToLeft)
    }

    pub fn get_or_create_with_direction(
        &self,
        format: &str,
        notations: &[Notation],
        direction: Direction,
    ) -> Result<Arc<Mask>, FormatError> {
        let key = CacheKey {
            format: format.to_string(),
            notations: notations.to_vec(),
            direction,
        };
        if let Some(mask) = self.lock().get(&key) {
            return Ok(Arc::clone(mask));
        }

        // Compile unlocked; a concurrent compile of the same key keeps the first entry.
        let mask = Arc::new(Mask::with_direction(format, notations, direction)?);
        tracing::debug!(format, ?direction, states = %mask.chain(), "compiled mask");
        Ok(Arc::clone(self.lock().entry(key).or_insert(mask)))
    }

    /// Number of cached masks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<Mask>>> {
        self.masks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
