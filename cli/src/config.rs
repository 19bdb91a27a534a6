//! Experiment configuration

use anyhow::{Context, Result};
use queue_simulator_core_rs::{Scenario, UniformRange};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_seed() -> u64 {
    123
}

/// A set of scenarios run over identically seeded generators
///
/// ```json
/// {
///   "seed": 123,
///   "scenarios": [
///     { "servers": 1, "capacity": 5, "draw_budget": 100000 },
///     { "servers": 2, "capacity": 5, "draw_budget": 100000,
///       "arrival": { "low": 2.0, "high": 5.0 } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub scenarios: Vec<Scenario>,
}

impl ExperimentConfig {
    /// Read and validate an experiment file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        for scenario in &config.scenarios {
            scenario
                .validate()
                .with_context(|| format!("invalid scenario {}", scenario.label()))?;
        }
        Ok(config)
    }

    /// One scenario per server count, everything else shared
    pub fn from_parts(
        seed: u64,
        servers: &[usize],
        capacity: usize,
        arrival: UniformRange,
        service: UniformRange,
        draw_budget: u64,
    ) -> Self {
        let scenarios = servers
            .iter()
            .map(|&c| Scenario {
                servers: c,
                capacity,
                arrival,
                service,
                draw_budget,
            })
            .collect();
        Self { seed, scenarios }
    }
}

/// Parse `LOW,HIGH` into a range
pub fn parse_range(value: &str) -> Result<UniformRange, String> {
    let (low, high) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LOW,HIGH, got '{}'", value))?;
    let low: f64 = low
        .trim()
        .parse()
        .map_err(|e| format!("invalid lower bound '{}': {}", low, e))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|e| format!("invalid upper bound '{}': {}", high, e))?;
    Ok(UniformRange::new(low, high))
}
