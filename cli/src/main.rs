//! Queue simulator CLI
//!
//! Runs one G/G/c/K simulation per server count over freshly seeded
//! generators (so every run sees the same random stream) and prints the
//! result tables.

mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use queue_simulator_core_rs::{run, Lcg, UniformRange};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{parse_range, ExperimentConfig};

#[derive(Parser)]
#[command(name = "queue-sim")]
#[command(about = "Simulate a finite-capacity multi-server queue (G/G/c/K)")]
struct Cli {
    /// Seed for the linear congruential generator
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// System capacity K (customers in service plus waiting)
    #[arg(short = 'k', long, default_value_t = 5)]
    capacity: usize,

    /// Number of random variates each run may draw
    #[arg(short, long, default_value_t = 100_000)]
    budget: u64,

    /// Server counts to simulate, comma separated
    #[arg(short, long, value_delimiter = ',', default_values_t = [1, 2])]
    servers: Vec<usize>,

    /// Inter-arrival time range as LOW,HIGH
    #[arg(long, value_parser = parse_range, default_value = "2,5")]
    arrival: UniformRange,

    /// Service time range as LOW,HIGH
    #[arg(long, value_parser = parse_range, default_value = "3,5")]
    service: UniformRange,

    /// JSON experiment file; overrides the scenario flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn experiment(&self) -> Result<ExperimentConfig> {
        match &self.config {
            Some(path) => ExperimentConfig::load(path),
            None => Ok(ExperimentConfig::from_parts(
                self.seed,
                &self.servers,
                self.capacity,
                self.arrival,
                self.service,
                self.budget,
            )),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let experiment = cli.experiment()?;

    let mut results = Vec::with_capacity(experiment.scenarios.len());
    for scenario in &experiment.scenarios {
        info!(scenario = %scenario.label(), seed = experiment.seed, "running scenario");
        let result = run(scenario, Lcg::new(experiment.seed))
            .with_context(|| format!("simulation of {} failed", scenario.label()))?;
        results.push(result);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&results).context("failed to encode results")?;
        println!("{}", json);
    } else {
        for result in &results {
            print!("{}", report::Report(result));
        }
    }

    Ok(())
}
