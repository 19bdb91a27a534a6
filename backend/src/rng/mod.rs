//! Deterministic random variate generation
//!
//! Uses a linear congruential generator with fixed constants so the same
//! seed yields the same stream on every platform.
//! CRITICAL: All randomness in the simulator MUST go through this module.

mod lcg;

pub use lcg::{Lcg, LcgParams, RngError};

/// Source of uniform random variates consumed by the simulation engine.
///
/// The engine only needs two things from a source: the next uniform value
/// and how many values have been drawn so far (the run's stopping budget).
pub trait RandomSource {
    /// Next value in `[0, 1)`. Never returns 1.0.
    fn next_uniform(&mut self) -> f64;

    /// Total number of values drawn since construction.
    fn draws(&self) -> u64;

    /// Uniform value in `[low, high)`.
    ///
    /// # Example
    /// ```
    /// use queue_simulator_core_rs::rng::{Lcg, RandomSource};
    ///
    /// let mut rng = Lcg::new(123);
    /// let gap = rng.uniform_in_range(2.0, 5.0);
    /// assert!(gap >= 2.0 && gap < 5.0);
    /// assert_eq!(rng.draws(), 1);
    /// ```
    fn uniform_in_range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_uniform()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }

    fn draws(&self) -> u64 {
        (**self).draws()
    }
}
