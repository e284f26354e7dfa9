//! Randomness for board sampling and deduction-order shuffling.
//!
//! Wraps the `rand` crate's `SmallRng`, which is fast and seedable for
//! deterministic replay in tests. There is no process-wide generator:
//! every caller (and every generator worker) owns its own instance, so
//! concurrent generation needs no locking.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// A seedable RNG owned by one caller or worker.
pub struct GameRng {
    inner: SmallRng,
}

impl GameRng {
    /// Create from OS entropy.
    pub fn new() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Create with a specific seed for deterministic behavior.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Generate a random usize in [0, bound).
    #[inline(always)]
    pub fn random_below(&mut self, bound: usize) -> usize {
        assert!(bound > 0);
        self.inner.random_range(0..bound)
    }

    /// Generate a random f64 in [low, high).
    #[inline(always)]
    pub fn random_float(&mut self, low: f64, high: f64) -> f64 {
        assert!(low < high);
        self.inner.random_range(low..high)
    }

    /// Fisher-Yates shuffle in place.
    #[inline]
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Draw a seed for a derived generator (one per worker thread).
    #[inline]
    pub fn derive_seed(&mut self) -> u64 {
        self.inner.random()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new()
    }
}
