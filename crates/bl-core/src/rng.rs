//! Deterministic random streams for simulation runs and optimizer workers.
//!
//! # Determinism strategy
//!
//! A simulation run draws every random number from one `SimRng` it is
//! handed by the caller.  Given the same seed and inputs, a run therefore
//! produces bit-identical statistics.
//!
//! The optimizer owns a master `SimRng` and derives one child stream per
//! fitness evaluation with [`SimRng::child`] *before* fanning the evaluations
//! out to worker threads:
//!
//!   child_seed = parent.next_u64() XOR (offset * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive offsets uniformly across the seed space.
//! Workers never share RNG state (no contention, no ordering dependency), and
//! results do not depend on how many threads the pool happens to have.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp1;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A single logical random stream.
///
/// Deliberately not `Clone`: two copies of one stream would silently repeat
/// draws.  Use [`child`][Self::child] to fork an independent stream.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed from OS entropy.  Runs are not reproducible.
    pub fn from_entropy() -> Self {
        SimRng(SmallRng::from_entropy())
    }

    /// Derive a child `SimRng` with a different seed offset: used to give
    /// every fitness evaluation its own stream.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen()
    }

    /// Uniform integer in `[low, high)`.  Returns `low` for an empty range.
    #[inline]
    pub fn integers(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.0.gen_range(low..high)
    }

    /// Uniform index into a collection of `len` elements.
    ///
    /// # Panics
    /// Panics if `len == 0`.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    /// Exponentially distributed draw with the given mean (`1 / λ`).
    #[inline]
    pub fn exponential(&mut self, mean: f64) -> f64 {
        let unit: f64 = self.0.sample(Exp1);
        unit * mean
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
