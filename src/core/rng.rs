//! Deterministic random number generation for bot participants.
//!
//! Same seed, same match: every bot draws from its own fork of one
//! seeded generator, so a simulated match replays exactly.
//!
//! ```
//! use limb_arena::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut bot_a = rng.fork();
//! let mut bot_b = rng.fork();
//! assert_ne!(bot_a.seed(), bot_b.seed());
//!
//! let mut again = GameRng::new(42);
//! assert_eq!(again.fork().seed(), bot_a.seed());
//! assert!(bot_a.choose(&["tap", "disthands"]).is_some());
//! # let _ = bot_b.choose(&[1, 2, 3]);
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG with forking.
///
/// Uses ChaCha8 for speed while keeping a stable, seedable sequence.
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

    /// Seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork an independent stream.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
