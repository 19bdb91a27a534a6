//! Linear congruential generator
//!
//! # Algorithm
//!
//! `state ← (a·state + c) mod M`, output `state / M`.
//!
//! The default constants (`a = 1664525`, `c = 1013904223`, `M = 2^32`) are
//! the classic Numerical Recipes parameters. Intermediate products are
//! computed in 128-bit integers, so any `u64` parameters are exact.
//!
//! # Determinism
//!
//! Same seed → same sequence of random numbers. This is CRITICAL for:
//! - Paired comparisons (same arrival stream across server counts)
//! - Testing (verify exact event sequences)
//! - Checkpoint/resume (restore state + draw count)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RandomSource;

/// Errors raised when configuring the generator
#[derive(Debug, Error, PartialEq)]
pub enum RngError {
    #[error("LCG modulus must be non-zero")]
    ZeroModulus,
}

/// Multiplier, increment and modulus of the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcgParams {
    pub multiplier: u64,
    pub increment: u64,
    pub modulus: u64,
}

impl Default for LcgParams {
    fn default() -> Self {
        Self {
            multiplier: 1_664_525,
            increment: 1_013_904_223,
            modulus: 1 << 32,
        }
    }
}

/// Deterministic random variate source
///
/// # Example
/// ```
/// use queue_simulator_core_rs::rng::{Lcg, RandomSource};
///
/// let mut rng = Lcg::new(123);
/// let u = rng.next_uniform();
/// assert!((0.0..1.0).contains(&u));
/// assert_eq!(rng.draws(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lcg {
    state: u64,
    params: LcgParams,
    draws: u64,
}

impl Lcg {
    /// Create a generator with the default constants
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed,
            params: LcgParams::default(),
            draws: 0,
        }
    }

    /// Create a generator with explicit constants
    ///
    /// # Errors
    /// Returns `RngError::ZeroModulus` if `params.modulus == 0`.
    ///
    /// # Example
    /// ```
    /// use queue_simulator_core_rs::rng::{Lcg, LcgParams, RngError};
    ///
    /// let params = LcgParams { multiplier: 5, increment: 3, modulus: 0 };
    /// assert_eq!(Lcg::with_params(1, params), Err(RngError::ZeroModulus));
    /// ```
    pub fn with_params(seed: u64, params: LcgParams) -> Result<Self, RngError> {
        Self::from_state(seed, 0, params)
    }

    /// Rebuild a generator mid-stream (for checkpoint restore)
    ///
    /// # Errors
    /// Returns `RngError::ZeroModulus` if `params.modulus == 0`.
    pub fn from_state(state: u64, draws: u64, params: LcgParams) -> Result<Self, RngError> {
        if params.modulus == 0 {
            return Err(RngError::ZeroModulus);
        }
        Ok(Self {
            state,
            params,
            draws,
        })
    }

    /// Current internal state
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generator constants
    pub fn params(&self) -> LcgParams {
        self.params
    }

    /// Advance the state and return the raw integer in `[0, M)`
    pub fn next_raw(&mut self) -> u64 {
        let LcgParams {
            multiplier,
            increment,
            modulus,
        } = self.params;
        let next = (multiplier as u128 * self.state as u128 + increment as u128) % modulus as u128;
        // next < modulus <= u64::MAX
        self.state = next as u64;
        self.draws += 1;
        self.state
    }
}

impl RandomSource for Lcg {
    fn next_uniform(&mut self) -> f64 {
        let raw = self.next_raw();
        let value = raw as f64 / self.params.modulus as f64;
        // Rounding can reach 1.0 only for moduli above 2^53.
        if value < 1.0 {
            value
        } else {
            1.0 - f64::EPSILON / 2.0
        }
    }

    fn draws(&self) -> u64 {
        self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_values_for_seed_123() {
        let mut rng = Lcg::new(123);

        // (1664525 * 123 + 1013904223) mod 2^32
        assert_eq!(rng.next_raw(), 1_218_640_798);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let params = LcgParams {
            modulus: 0,
            ..LcgParams::default()
        };
        assert_eq!(Lcg::with_params(7, params), Err(RngError::ZeroModulus));
        assert_eq!(Lcg::from_state(7, 3, params), Err(RngError::ZeroModulus));
    }

    #[test]
    fn test_next_uniform_in_range() {
        let mut rng = Lcg::new(12345);

        for _ in 0..1000 {
            let val = rng.next_uniform();
            assert!(
                (0.0..1.0).contains(&val),
                "next_uniform() produced value {} outside [0.0, 1.0)",
                val
            );
        }
        assert_eq!(rng.draws(), 1000);
    }

    #[test]
    fn test_huge_modulus_stays_below_one() {
        let params = LcgParams {
            multiplier: 1,
            increment: u64::MAX - 1,
            modulus: u64::MAX,
        };
        let mut rng = Lcg::with_params(0, params).unwrap();

        assert!(rng.next_uniform() < 1.0);
    }

    #[test]
    fn test_small_modulus_cycles() {
        let params = LcgParams {
            multiplier: 1,
            increment: 1,
            modulus: 4,
        };
        let mut rng = Lcg::with_params(0, params).unwrap();
        let values: Vec<f64> = (0..5).map(|_| rng.next_uniform()).collect();

        assert_eq!(values, vec![0.25, 0.5, 0.75, 0.0, 0.25]);
    }
}
