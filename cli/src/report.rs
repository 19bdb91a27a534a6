//! Plain-text result tables

use queue_simulator_core_rs::SimulationResult;
use std::fmt;

/// One run rendered in the same layout for every scenario
pub struct Report<'a>(pub &'a SimulationResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let scenario = &result.scenario;
        writeln!(f)?;
        writeln!(f, "=== {} ===", scenario.label())?;
        writeln!(
            f,
            "Servers = {} | Capacity = {}",
            scenario.servers, scenario.capacity
        )?;
        writeln!(f, "Total time: {:.4}", result.total_time)?;
        writeln!(f, "Served clients: {}", result.served)?;
        writeln!(f, "Losses: {}", result.losses)?;
        writeln!(f, "Blocking probability: {:.6}", result.blocking_probability)?;
        writeln!(f, "Average utilization per server: {:.6}", result.utilization)?;
        writeln!(f, "Mean number in system: {:.6}", result.mean_in_system)?;
        writeln!(f)?;
        writeln!(f, "State probabilities (0..K):")?;
        for (k, p) in result.state_probabilities.iter().enumerate() {
            writeln!(f, "  P(N={}) = {:.6}", k, p)?;
        }
        Ok(())
    }
}
