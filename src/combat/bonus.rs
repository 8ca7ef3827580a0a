//! Injectable randomness for the pierce bonus
//!
//! Resolution draws from a `BonusSource` so that matches are reproducible
//! under a fixed seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Exclusive upper bound of the pierce bonus
pub const PIERCE_BONUS_MAX: i32 = 20;

/// Source of the random bonus added by piercing attacks
pub trait BonusSource: Send {
    /// Draw a bonus in `[0, PIERCE_BONUS_MAX)`
    fn pierce_bonus(&mut self) -> i32;
}

/// ChaCha8-backed bonus source
#[derive(Debug, Clone)]
pub struct SeededBonus {
    rng: ChaCha8Rng,
}

impl SeededBonus {
    /// Deterministic source for a given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }
}

impl BonusSource for SeededBonus {
    fn pierce_bonus(&mut self) -> i32 {
        self.rng.random_range(0..PIERCE_BONUS_MAX)
    }
}

/// Always returns the same bonus, clamped into range
#[derive(Debug, Clone, Copy)]
pub struct FixedBonus(pub i32);

impl BonusSource for FixedBonus {
    fn pierce_bonus(&mut self) -> i32 {
        self.0.clamp(0, PIERCE_BONUS_MAX - 1)
    }
}
