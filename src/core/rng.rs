//! Deterministic random number generation for engines.
//!
//! Every engine owns a `GameRng` seeded from configuration, so two sessions
//! started with the same seed evolve identically given identical input.
//!
//! ```
//! use arcade_session::core::GameRng;
//!
//! let rng = GameRng::new(42);
//! let mut spawns = rng.for_context("shooter/spawn");
//! let mut again = GameRng::new(42).for_context("shooter/spawn");
//! assert_eq!(spawns.gen_range_f32(0.0..480.0), again.gen_range_f32(0.0..480.0));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Seeded ChaCha8 generator with independent per-context streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Random `f32` in the given range.
    pub fn gen_range_f32(&mut self, range: std::ops::Range<f32>) -> f32 {
        if range.start >= range.end {
            return range.start;
        }
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
