//! Simulation State
//!
//! Mutable bookkeeping for a single run, owned exclusively by the engine.
//!
//! # Critical Invariants
//!
//! 1. **Bounded occupancy**: `0 <= in_system <= capacity`
//! 2. **Time accounting**: the occupancy accumulators sum to the time of the
//!    last state change
//! 3. **Conservation**: `arrivals == served + losses + in_system`
//! 4. **Busy slots**: exactly `min(in_system, servers)` slots hold a
//!    departure time

use crate::core::time::SimClock;
use crate::orchestrator::SimulationError;

/// Relative tolerance when comparing accumulated time against the clock
const TIME_TOLERANCE: f64 = 1e-9;

/// Complete state of a running queue simulation
///
/// # Example
///
/// ```rust
/// use queue_simulator_core_rs::SimulationState;
///
/// let state = SimulationState::new(2, 5);
/// assert_eq!(state.in_system(), 0);
/// assert_eq!(state.next_departure(), None);
/// assert_eq!(state.free_slot(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub(crate) clock: SimClock,

    /// Customers in service or waiting
    pub(crate) in_system: usize,

    /// Next departure per server slot; `None` means the slot is idle
    pub(crate) slots: Vec<Option<f64>>,

    /// Total time spent at each occupancy level `0..=capacity`
    pub(crate) occupancy_time: Vec<f64>,

    pub(crate) losses: u64,
    pub(crate) served: u64,
    pub(crate) arrivals: u64,

    /// Time of the pending arrival
    pub(crate) next_arrival: f64,
}

impl SimulationState {
    /// Empty system at time zero with all slots idle
    pub fn new(servers: usize, capacity: usize) -> Self {
        Self {
            clock: SimClock::new(),
            in_system: 0,
            slots: vec![None; servers],
            occupancy_time: vec![0.0; capacity + 1],
            losses: 0,
            served: 0,
            arrivals: 0,
            next_arrival: 0.0,
        }
    }

    /// Earliest scheduled departure as `(slot, time)`
    ///
    /// Ties resolve to the lowest slot index.
    pub fn next_departure(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some(time) = *slot {
                match best {
                    Some((_, best_time)) if best_time <= time => {}
                    _ => best = Some((idx, time)),
                }
            }
        }
        best
    }

    /// First idle slot, if any
    pub fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Advance the clock to `time`, charging the elapsed time to the current
    /// occupancy level
    pub(crate) fn advance_to(&mut self, time: f64) -> Result<(), SimulationError> {
        let elapsed = self.clock.advance_to(time)?;
        self.occupancy_time[self.in_system] += elapsed;
        Ok(())
    }

    /// Number of slots currently serving a customer
    pub fn busy_servers(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn in_system(&self) -> usize {
        self.in_system
    }

    pub fn slots(&self) -> &[Option<f64>] {
        &self.slots
    }

    pub fn occupancy_time(&self) -> &[f64] {
        &self.occupancy_time
    }

    pub fn losses(&self) -> u64 {
        self.losses
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn next_arrival(&self) -> f64 {
        self.next_arrival
    }

    /// Capacity this state was sized for
    pub fn capacity(&self) -> usize {
        self.occupancy_time.len() - 1
    }

    /// Verify the state invariants
    ///
    /// # Errors
    /// `SimulationError::StateValidationError` describing the first
    /// violated invariant.
    pub fn check_invariants(&self) -> Result<(), SimulationError> {
        let capacity = self.capacity();
        if self.in_system > capacity {
            return Err(SimulationError::StateValidationError(format!(
                "in_system {} exceeds capacity {}",
                self.in_system, capacity
            )));
        }

        if self.arrivals != self.served + self.losses + self.in_system as u64 {
            return Err(SimulationError::StateValidationError(format!(
                "conservation violated: arrivals {} != served {} + losses {} + in_system {}",
                self.arrivals, self.served, self.losses, self.in_system
            )));
        }

        let expected_busy = self.in_system.min(self.slots.len());
        if self.busy_servers() != expected_busy {
            return Err(SimulationError::StateValidationError(format!(
                "{} busy slots but {} customers should be in service",
                self.busy_servers(),
                expected_busy
            )));
        }

        let accounted: f64 = self.occupancy_time.iter().sum();
        let now = self.clock.now();
        if (accounted - now).abs() > TIME_TOLERANCE * now.max(1.0) {
            return Err(SimulationError::StateValidationError(format!(
                "occupancy time {} does not match elapsed time {}",
                accounted, now
            )));
        }

        if let Some(t) = self.slots.iter().flatten().find(|t| **t < now) {
            return Err(SimulationError::StateValidationError(format!(
                "departure at {} is before the clock ({})",
                t, now
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_departure_picks_first_of_equal_minimums() {
        let mut state = SimulationState::new(3, 5);
        state.slots = vec![Some(7.0), Some(4.0), Some(4.0)];

        assert_eq!(state.next_departure(), Some((1, 4.0)));
    }

    #[test]
    fn test_next_departure_skips_idle_slots() {
        let mut state = SimulationState::new(3, 5);
        state.slots = vec![None, Some(9.0), None];

        assert_eq!(state.next_departure(), Some((1, 9.0)));
        assert_eq!(state.free_slot(), Some(0));
    }

    #[test]
    fn test_zero_servers_has_no_slots() {
        let state = SimulationState::new(0, 3);

        assert_eq!(state.next_departure(), None);
        assert_eq!(state.free_slot(), None);
        assert_eq!(state.capacity(), 3);
    }

    #[test]
    fn test_advance_charges_level_before_change() {
        let mut state = SimulationState::new(1, 2);
        state.advance_to(1.5).unwrap();
        state.in_system = 1;
        state.advance_to(4.0).unwrap();

        assert_eq!(state.occupancy_time(), &[1.5, 2.5, 0.0]);
    }

    #[test]
    fn test_invariant_detects_conservation_break() {
        let mut state = SimulationState::new(1, 2);
        state.arrivals = 1;

        assert!(matches!(
            state.check_invariants(),
            Err(SimulationError::StateValidationError(_))
        ));
    }
}
