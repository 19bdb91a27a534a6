//! Orchestrator Engine
//!
//! Event-driven loop for a G/G/c/K queue. Unlike a fixed-horizon simulation,
//! a run is bounded by the number of random variates it may draw.
//!
//! # Architecture
//!
//! ```text
//! While draws < draw_budget:
//! 1. Find the earliest scheduled departure (lowest slot on ties)
//! 2. If next_arrival <= next_departure → arrival, else departure
//! 3. Advance the clock, charging elapsed time to the occupancy level
//!    held before the event
//! 4. Arrival: admit (start service if a slot is idle) or lose the
//!    customer, then draw the next inter-arrival gap
//! 5. Departure: free the slot or hand it to the next waiting customer
//! ```
//!
//! # Example
//!
//! ```rust
//! use queue_simulator_core_rs::{run, Lcg, Scenario};
//!
//! let scenario = Scenario::new(1, 5, 10_000);
//! let mut rng = Lcg::new(123);
//!
//! let result = run(&scenario, &mut rng).unwrap();
//! assert!(result.total_time > 0.0);
//! assert!(result.utilization <= 1.0);
//! assert!(result.draws_used >= 10_000);
//! ```

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::models::event::{Event, EventLog};
use crate::models::result::SimulationResult;
use crate::models::scenario::Scenario;
use crate::models::state::SimulationState;
use crate::rng::{RandomSource, RngError};

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by the simulation engine
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    /// Scenario validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Event ordering broke and time would run backwards
    #[error("Negative elapsed time: clock at {from} cannot move back to {to}")]
    NegativeElapsedTime { from: f64, to: f64 },

    /// A state invariant does not hold
    #[error("State validation failed: {0}")]
    StateValidationError(String),

    /// Checkpoint belongs to a different scenario
    #[error("Config mismatch: checkpoint hash {expected}, scenario hash {actual}")]
    ConfigMismatch { expected: String, actual: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("RNG error: {0}")]
    Rng(#[from] RngError),
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Step-wise simulation engine for one run
///
/// The orchestrator exclusively owns the random source and the simulation
/// state for the duration of the run.
///
/// # Determinism
///
/// Same scenario + source in the same state = identical event sequence.
pub struct Orchestrator<R: RandomSource> {
    scenario: Scenario,
    source: R,
    state: SimulationState,

    /// Recorded events, when tracing was requested
    event_log: Option<EventLog>,
}

impl<R: RandomSource> Orchestrator<R> {
    /// Validate the scenario and draw the first arrival time
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidConfig` if the scenario fails validation.
    pub fn new(scenario: Scenario, mut source: R) -> Result<Self, SimulationError> {
        scenario.validate()?;

        let mut state = SimulationState::new(scenario.servers, scenario.capacity);
        state.next_arrival = source.uniform_in_range(scenario.arrival.low, scenario.arrival.high);

        debug!(
            scenario = %scenario.label(),
            draw_budget = scenario.draw_budget,
            first_arrival = state.next_arrival,
            "simulation initialized"
        );

        Ok(Self {
            scenario,
            source,
            state,
            event_log: None,
        })
    }

    /// Rebuild an orchestrator from already validated parts
    pub(crate) fn from_parts(scenario: Scenario, source: R, state: SimulationState) -> Self {
        Self {
            scenario,
            source,
            state,
            event_log: None,
        }
    }

    /// Record every processed event in an `EventLog`
    pub fn with_event_log(mut self) -> Self {
        self.event_log = Some(EventLog::new());
        self
    }

    /// True once the draw budget is spent
    pub fn is_finished(&self) -> bool {
        self.source.draws() >= self.scenario.draw_budget
    }

    /// Process the next event
    ///
    /// Returns `Ok(None)` without touching the state once the draw budget
    /// is spent.
    ///
    /// # Errors
    ///
    /// `SimulationError::NegativeElapsedTime` if the selected event lies in
    /// the past. The run cannot continue after that.
    pub fn step(&mut self) -> Result<Option<Event>, SimulationError> {
        if self.is_finished() {
            return Ok(None);
        }

        let event = match self.state.next_departure() {
            // Arrivals win ties
            Some((server, departure)) if departure < self.state.next_arrival => {
                self.process_departure(server, departure)?
            }
            _ => self.process_arrival()?,
        };

        trace!(
            kind = event.event_type(),
            time = event.time(),
            in_system = self.state.in_system,
            draws = self.source.draws(),
            "event processed"
        );

        if let Some(log) = self.event_log.as_mut() {
            log.log(event.clone());
        }
        Ok(Some(event))
    }

    /// Step until the draw budget is spent
    pub fn run_to_completion(&mut self) -> Result<(), SimulationError> {
        while self.step()?.is_some() {}
        Ok(())
    }

    fn process_arrival(&mut self) -> Result<Event, SimulationError> {
        let time = self.state.next_arrival;
        let in_system_before = self.state.in_system;
        self.state.advance_to(time)?;
        self.state.arrivals += 1;

        let (admitted, server) = if in_system_before < self.scenario.capacity {
            self.state.in_system += 1;
            let server = self.state.free_slot();
            if let Some(idx) = server {
                let service = self.draw_service();
                self.state.slots[idx] = Some(time + service);
            }
            (true, server)
        } else {
            self.state.losses += 1;
            (false, None)
        };

        let gap = self
            .source
            .uniform_in_range(self.scenario.arrival.low, self.scenario.arrival.high);
        self.state.next_arrival = time + gap;

        Ok(Event::Arrival {
            time,
            in_system_before,
            admitted,
            server,
        })
    }

    fn process_departure(&mut self, server: usize, time: f64) -> Result<Event, SimulationError> {
        let in_system_before = self.state.in_system;
        self.state.advance_to(time)?;
        self.state.in_system -= 1;
        self.state.served += 1;

        // A waiting customer takes over the freed slot
        let next_service_started = self.state.in_system >= self.scenario.servers;
        let next_departure = if next_service_started {
            Some(time + self.draw_service())
        } else {
            None
        };
        self.state.slots[server] = next_departure;

        Ok(Event::Departure {
            time,
            server,
            in_system_before,
            next_service_started,
        })
    }

    fn draw_service(&mut self) -> f64 {
        self.source
            .uniform_in_range(self.scenario.service.low, self.scenario.service.high)
    }

    /// Compute the result record from the current state
    pub fn result(&self) -> SimulationResult {
        SimulationResult::from_state(&self.scenario, &self.state, self.source.draws())
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn event_log(&self) -> Option<&EventLog> {
        self.event_log.as_ref()
    }

    /// Give back the random source, e.g. to continue a shared stream
    pub fn into_source(self) -> R {
        self.source
    }
}

/// Run a whole simulation and return its statistics
///
/// # Errors
///
/// - `SimulationError::InvalidConfig` for an invalid scenario
/// - `SimulationError::NegativeElapsedTime` if event ordering breaks
pub fn run<R: RandomSource>(
    scenario: &Scenario,
    source: R,
) -> Result<SimulationResult, SimulationError> {
    let mut orchestrator = Orchestrator::new(scenario.clone(), source)?;
    orchestrator.run_to_completion()?;

    let result = orchestrator.result();
    if result.total_time > 0.0 {
        debug!(
            scenario = %scenario.label(),
            total_time = result.total_time,
            served = result.served,
            losses = result.losses,
            blocking = result.blocking_probability,
            utilization = result.utilization,
            "simulation finished"
        );
    } else {
        warn!(
            scenario = %scenario.label(),
            draw_budget = scenario.draw_budget,
            "simulation ended without simulated time elapsing"
        );
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Lcg;

    #[test]
    fn test_invalid_scenario_rejected() {
        let scenario = Scenario::new(3, 2, 100);
        let result = Orchestrator::new(scenario, Lcg::new(1));
        assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
    }

    #[test]
    fn test_first_arrival_consumes_one_draw() {
        let orchestrator = Orchestrator::new(Scenario::new(1, 5, 100), Lcg::new(123)).unwrap();

        assert_eq!(orchestrator.source().draws(), 1);
        let first = orchestrator.state().next_arrival();
        assert!((2.0..5.0).contains(&first));
    }

    #[test]
    fn test_step_after_budget_is_noop() {
        let mut orchestrator = Orchestrator::new(Scenario::new(1, 5, 1), Lcg::new(123)).unwrap();

        assert!(orchestrator.is_finished());
        assert_eq!(orchestrator.step().unwrap(), None);
        assert_eq!(orchestrator.state().arrivals(), 0);
    }

    #[test]
    fn test_departure_cannot_run_clock_backwards() {
        let mut orchestrator = Orchestrator::new(Scenario::new(1, 5, 100), Lcg::new(123)).unwrap();
        orchestrator.state.advance_to(10.0).unwrap();
        orchestrator.state.in_system = 1;
        orchestrator.state.arrivals = 1;
        orchestrator.state.slots[0] = Some(4.0);
        orchestrator.state.next_arrival = 20.0;

        assert_eq!(
            orchestrator.step(),
            Err(SimulationError::NegativeElapsedTime { from: 10.0, to: 4.0 })
        );
    }
}
