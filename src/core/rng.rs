//! Deterministic random number generation for puzzle generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same maze, dot layout, or sequence
//! - **Forkable**: Derive an independent stream per regenerated puzzle
//!
//! ## Usage
//!
//! ```
//! use cognitive_games::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut layout_rng = rng.fork();
//!
//! // Forks are deterministic: same parent seed, same fork counter, same stream
//! let mut rng2 = GameRng::new(42);
//! let mut layout_rng2 = rng2.fork();
//! assert_eq!(layout_rng.gen_range_usize(0..1000), layout_rng2.gen_range_usize(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used by every engine.
///
/// Uses ChaCha8 for speed while keeping good statistical quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG from a fresh, non-deterministic seed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random f64 in the given range.
    pub fn gen_range_f64(&mut self, range: std::ops::Range<f64>) -> f64 {
        self.inner.gen_range(range)
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Sample `amount` distinct indices from `0..length`, in random order.
    ///
    /// `amount` is clamped to `length`.
    pub fn sample_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.inner, length, amount.min(length)).into_vec()
    }
}
