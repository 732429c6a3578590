//! Seedable random source for deck shuffles.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same sequence of coin flips
//! - **Serializable**: O(1) state capture and restore for snapshots
//!
//! ```
//! use sylladex::core::ModusRng;
//!
//! let mut a = ModusRng::new(42);
//! let mut b = ModusRng::new(42);
//! let flips_a: Vec<bool> = (0..16).map(|_| a.coin_flip()).collect();
//! let flips_b: Vec<bool> = (0..16).map(|_| b.coin_flip()).collect();
//! assert_eq!(flips_a, flips_b);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Random source used by the riffle shuffle.
///
/// Uses ChaCha8 so a seed fully determines every shuffle, which keeps tests
/// and saved sessions reproducible.
#[derive(Clone, Debug)]
pub struct ModusRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl ModusRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from the OS entropy source.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fair coin flip.
    pub fn coin_flip(&mut self) -> bool {
        self.inner.gen_bool(0.5)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> ModusRngState {
        ModusRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &ModusRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position, so restoring is O(1) regardless of how
/// many flips were drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModusRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
