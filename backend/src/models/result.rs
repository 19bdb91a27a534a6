//! Final statistics of a run

use serde::{Deserialize, Serialize};

use crate::models::scenario::Scenario;
use crate::models::state::SimulationState;

/// Immutable summary produced once at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario: Scenario,

    /// Arrivals rejected because the system was full
    pub losses: u64,

    /// Completed departures
    pub served: u64,

    /// Arrival attempts processed
    pub arrivals: u64,

    /// Customers still in the system when the budget ran out
    pub in_system_at_end: usize,

    pub draws_used: u64,

    /// Simulated time at the last processed event
    pub total_time: f64,

    /// losses / (losses + served)
    pub blocking_probability: f64,

    /// Average fraction of time each server is busy
    pub utilization: f64,

    /// Time-averaged number of customers in the system
    pub mean_in_system: f64,

    /// Completed departures per unit of simulated time
    pub throughput: f64,

    /// Raw time spent at each occupancy level `0..=capacity`
    pub state_times: Vec<f64>,

    /// `state_times` normalized by `total_time`
    pub state_probabilities: Vec<f64>,
}

impl SimulationResult {
    /// Derive the statistics from the final state of a run
    pub fn from_state(scenario: &Scenario, state: &SimulationState, draws_used: u64) -> Self {
        let total_time = state.now();
        let state_times = state.occupancy_time().to_vec();

        let state_probabilities: Vec<f64> = if total_time > 0.0 {
            state_times.iter().map(|t| t / total_time).collect()
        } else {
            vec![0.0; state_times.len()]
        };

        let attempts = state.losses() + state.served();
        let blocking_probability = if attempts > 0 {
            state.losses() as f64 / attempts as f64
        } else {
            0.0
        };

        let avg_busy_servers: f64 = state_probabilities
            .iter()
            .enumerate()
            .map(|(k, p)| k.min(scenario.servers) as f64 * p)
            .sum();
        let utilization = if scenario.servers > 0 {
            avg_busy_servers / scenario.servers as f64
        } else {
            0.0
        };

        let mean_in_system: f64 = state_probabilities
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum();

        let throughput = if total_time > 0.0 {
            state.served() as f64 / total_time
        } else {
            0.0
        };

        Self {
            scenario: scenario.clone(),
            losses: state.losses(),
            served: state.served(),
            arrivals: state.arrivals(),
            in_system_at_end: state.in_system(),
            draws_used,
            total_time,
            blocking_probability,
            utilization,
            mean_in_system,
            throughput,
            state_times,
            state_probabilities,
        }
    }

    /// Probability of finding exactly `k` customers in the system
    pub fn probability_of(&self, k: usize) -> f64 {
        self.state_probabilities.get(k).copied().unwrap_or(0.0)
    }

    /// Probability that the system is full
    pub fn full_probability(&self) -> f64 {
        self.probability_of(self.scenario.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_state_gives_zero_statistics() {
        let scenario = Scenario::new(2, 3, 0);
        let state = SimulationState::new(2, 3);

        let result = SimulationResult::from_state(&scenario, &state, 1);

        assert_eq!(result.total_time, 0.0);
        assert_eq!(result.state_probabilities, vec![0.0; 4]);
        assert_eq!(result.blocking_probability, 0.0);
        assert_eq!(result.utilization, 0.0);
        assert_eq!(result.throughput, 0.0);
        assert_eq!(result.probability_of(10), 0.0);
    }

    #[test]
    fn test_utilization_caps_busy_servers_at_server_count() {
        let scenario = Scenario::new(1, 2, 10);
        let mut state = SimulationState::new(1, 2);
        // 2 time units empty, 2 with one customer, 4 with two
        state.advance_to(2.0).unwrap();
        state.in_system = 1;
        state.advance_to(4.0).unwrap();
        state.in_system = 2;
        state.advance_to(8.0).unwrap();

        let result = SimulationResult::from_state(&scenario, &state, 10);

        assert_eq!(result.state_probabilities, vec![0.25, 0.25, 0.5]);
        assert_eq!(result.utilization, 0.75);
        assert_eq!(result.mean_in_system, 1.25);
        assert_eq!(result.full_probability(), 0.5);
    }

    #[test]
    fn test_zero_servers_zero_utilization() {
        let scenario = Scenario::new(0, 1, 10);
        let mut state = SimulationState::new(0, 1);
        state.in_system = 1;
        state.advance_to(3.0).unwrap();

        let result = SimulationResult::from_state(&scenario, &state, 10);

        assert_eq!(result.utilization, 0.0);
        assert_eq!(result.state_probabilities, vec![0.0, 1.0]);
    }
}
