//! Simulation scenario
//!
//! A scenario fixes everything a run needs apart from the random source:
//! server count, buffer capacity, the two uniform time distributions and
//! the draw budget. It is immutable for the duration of a run.

use serde::{Deserialize, Serialize};

use crate::orchestrator::SimulationError;

/// Continuous uniform distribution over `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub low: f64,
    pub high: f64,
}

impl UniformRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Mean of the distribution
    pub fn mean(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    fn validate(&self, name: &str) -> Result<(), SimulationError> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "{} range must be finite, got [{}, {}]",
                name, self.low, self.high
            )));
        }
        if self.low < 0.0 {
            return Err(SimulationError::InvalidConfig(format!(
                "{} range must not be negative, got low = {}",
                name, self.low
            )));
        }
        if self.low > self.high {
            return Err(SimulationError::InvalidConfig(format!(
                "{} range is inverted: low {} > high {}",
                name, self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Parameters of one G/G/c/K run
///
/// # Example
/// ```
/// use queue_simulator_core_rs::Scenario;
///
/// let scenario = Scenario::new(2, 5, 100_000)
///     .with_arrival(2.0, 5.0)
///     .with_service(3.0, 5.0);
/// assert!(scenario.validate().is_ok());
/// assert_eq!(scenario.label(), "G/G/2/5");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Number of servers (c)
    pub servers: usize,

    /// Maximum number of customers in the system, in service or waiting (K)
    pub capacity: usize,

    /// Inter-arrival time distribution
    #[serde(default = "default_arrival")]
    pub arrival: UniformRange,

    /// Service time distribution
    #[serde(default = "default_service")]
    pub service: UniformRange,

    /// Maximum number of random variates the run may consume
    pub draw_budget: u64,
}

fn default_arrival() -> UniformRange {
    UniformRange::new(2.0, 5.0)
}

fn default_service() -> UniformRange {
    UniformRange::new(3.0, 5.0)
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new(1, 5, 100_000)
    }
}

impl Scenario {
    /// Scenario with the default arrival U(2, 5) and service U(3, 5) ranges
    pub fn new(servers: usize, capacity: usize, draw_budget: u64) -> Self {
        Self {
            servers,
            capacity,
            arrival: default_arrival(),
            service: default_service(),
            draw_budget,
        }
    }

    pub fn with_arrival(mut self, low: f64, high: f64) -> Self {
        self.arrival = UniformRange::new(low, high);
        self
    }

    pub fn with_service(mut self, low: f64, high: f64) -> Self {
        self.service = UniformRange::new(low, high);
        self
    }

    /// Same scenario with a different server count
    pub fn with_servers(mut self, servers: usize) -> Self {
        self.servers = servers;
        self
    }

    /// Kendall-style label, e.g. `G/G/1/5`
    pub fn label(&self) -> String {
        format!("G/G/{}/{}", self.servers, self.capacity)
    }

    /// Check the scenario before a run
    ///
    /// # Errors
    /// `SimulationError::InvalidConfig` if capacity is below the server
    /// count, or a range is non-finite, negative or inverted.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.capacity < self.servers {
            return Err(SimulationError::InvalidConfig(format!(
                "capacity ({}) must be at least the number of servers ({})",
                self.capacity, self.servers
            )));
        }
        self.arrival.validate("arrival")?;
        self.service.validate("service")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_scenario() {
        let scenario = Scenario::default();
        assert_eq!(scenario.servers, 1);
        assert_eq!(scenario.capacity, 5);
        assert_eq!(scenario.draw_budget, 100_000);
        assert_eq!(scenario.arrival, UniformRange::new(2.0, 5.0));
        assert_eq!(scenario.service, UniformRange::new(3.0, 5.0));
    }

    #[test]
    fn test_missing_ranges_use_defaults() {
        let scenario: Scenario =
            serde_json::from_str(r#"{"servers": 2, "capacity": 4, "draw_budget": 10}"#).unwrap();
        assert_eq!(scenario.arrival, UniformRange::new(2.0, 5.0));
        assert_eq!(scenario.service.mean(), 4.0);
    }

    #[test]
    fn test_nan_range_rejected() {
        let scenario = Scenario::default().with_service(f64::NAN, 5.0);
        assert!(matches!(
            scenario.validate(),
            Err(SimulationError::InvalidConfig(_))
        ));
    }
}
