//! Random sources for generators and engines.
//!
//! Every stochastic step in drift (particle seeding, shape sampling, morph
//! turbulence, attractor depth jitter) draws from a [`RandomSource`], so the
//! deterministic math stays testable on its own. [`Xorshift64`] is the
//! seedable implementation; [`Fixed`] returns a constant and is handy for
//! pinning jitter to zero.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed values in [0, 1).
///
/// Object-safe so engines can hold a `Box<dyn RandomSource>`.
pub trait RandomSource {
    /// Returns a uniformly distributed f64 in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a uniformly distributed f64 in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed usize in [0, max).
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0.
    fn next_usize(&mut self, max: usize) -> usize {
        assert!(max > 0, "next_usize requires max > 0");
        ((self.next_f64() * max as f64) as usize).min(max - 1)
    }

    /// Returns a centred offset `(u - 0.5) * amplitude`, i.e. in
    /// [-amplitude/2, amplitude/2).
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() - 0.5) * amplitude
    }

    /// Returns `true` with probability `p` (`u < p`).
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// A random source that always returns the same value.
///
/// `Fixed(0.5)` turns every [`RandomSource::jitter`] call into exactly zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(pub f64);

impl RandomSource for Fixed {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Uses the standard shift parameters (13, 7, 17) for good statistical
/// properties across the full 64-bit state space. Seed of 0 is automatically
/// replaced with a non-zero fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Fallback seed used when the caller provides 0, which is a fixed point
    /// of the xorshift algorithm.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
    ///
    /// If `seed` is 0, uses `0x5EED_DEAD_BEEF_CAFE` as a fallback to avoid
    /// the xorshift all-zeros fixed point.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    ///
    /// Implements xorshift64 with shifts (13, 7, 17).
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RandomSource for Xorshift64 {
    /// Uses the upper 53 bits of `next_u64()` divided by 2^53 for
    /// full mantissa precision.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uses simple modulo reduction. For non-power-of-two `max` values,
    /// this introduces negligible bias at 64-bit state width.
    fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }
}
