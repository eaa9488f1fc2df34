//! Run-scoped key uniqueness.

use std::collections::HashSet;
use std::hash::Hash;

use crate::db::SeedError;

/// Remembers every key handed out during a run and rejects repeats.
///
/// Keys are resampled until an unused one turns up. The number of
/// consecutive rejections is capped; hitting the cap means the key space is
/// too small for the requested volume and the run fails instead of spinning.
#[derive(Debug, Clone)]
pub struct KeyRegistry<K> {
    claimed: HashSet<K>,
    max_attempts: usize,
}

impl<K: Eq + Hash + Clone> KeyRegistry<K> {
    pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

    /// Creates an empty registry with the default attempt cap.
    pub fn new() -> Self {
        Self::with_max_attempts(Self::DEFAULT_MAX_ATTEMPTS)
    }

    /// Creates an empty registry that gives up after `max_attempts`
    /// consecutive collisions.
    pub fn with_max_attempts(max_attempts: usize) -> Self {
        Self {
            claimed: HashSet::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Draws keys from `sample` until one has not been claimed yet, records
    /// it, and returns it.
    pub fn claim_with(&mut self, mut sample: impl FnMut() -> K) -> Result<K, SeedError> {
        for _ in 0..self.max_attempts {
            let key = sample();
            if self.claimed.insert(key.clone()) {
                return Ok(key);
            }
        }

        Err(SeedError::KeySpaceExhausted {
            claimed: self.claimed.len(),
            attempts: self.max_attempts,
        })
    }

    pub fn contains(&self, key: &K) -> bool {
        self.claimed.contains(key)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for KeyRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}
