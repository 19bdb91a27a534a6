//! Simulation clock
//!
//! Time is continuous and moves only forward. Every advance reports the
//! elapsed time since the previous state change so callers can charge it to
//! the occupancy level that was held during that interval.

use serde::{Deserialize, Serialize};

use crate::orchestrator::SimulationError;

/// Continuous simulation clock
///
/// # Example
/// ```
/// use queue_simulator_core_rs::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0.0);
///
/// let elapsed = clock.advance_to(2.5).unwrap();
/// assert_eq!(elapsed, 2.5);
/// assert_eq!(clock.now(), 2.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Time of the last state change; the clock only moves on events
    now: f64,
}

impl SimClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a clock from a checkpointed time
    pub(crate) fn at(now: f64) -> Self {
        Self { now }
    }

    /// Advance to `target` and return the time elapsed since the last change
    ///
    /// # Errors
    /// `SimulationError::NegativeElapsedTime` if `target` lies before the
    /// last state change. The clock is left untouched in that case.
    ///
    /// # Example
    /// ```
    /// use queue_simulator_core_rs::{SimClock, SimulationError};
    ///
    /// let mut clock = SimClock::new();
    /// clock.advance_to(4.0).unwrap();
    /// assert!(matches!(
    ///     clock.advance_to(3.0),
    ///     Err(SimulationError::NegativeElapsedTime { .. })
    /// ));
    /// assert_eq!(clock.now(), 4.0);
    /// ```
    pub fn advance_to(&mut self, target: f64) -> Result<f64, SimulationError> {
        let elapsed = target - self.now;
        if elapsed < 0.0 {
            return Err(SimulationError::NegativeElapsedTime {
                from: self.now,
                to: target,
            });
        }
        self.now = target;
        Ok(elapsed)
    }

    /// Current simulation time
    pub fn now(&self) -> f64 {
        self.now
    }
}
