//! Queue Simulator Core - Rust Engine
//!
//! Discrete-event simulator for a finite-capacity multi-server queue
//! (G/G/c/K) with deterministic execution.
//!
//! # Architecture
//!
//! - **core**: Simulation clock
//! - **models**: Domain types (Scenario, SimulationState, Event, SimulationResult)
//! - **orchestrator**: Event loop, statistics and checkpointing
//! - **rng**: Deterministic random variate generation
//!
//! # Critical Invariants
//!
//! 1. All randomness is deterministic (seeded LCG)
//! 2. The clock never moves backwards
//! 3. Elapsed time is charged to the occupancy level held before each event
//!
//! # Example
//!
//! ```rust
//! use queue_simulator_core_rs::{run, Lcg, Scenario};
//!
//! let one = run(&Scenario::new(1, 5, 20_000), Lcg::new(123)).unwrap();
//! let two = run(&Scenario::new(2, 5, 20_000), Lcg::new(123)).unwrap();
//!
//! assert!(two.blocking_probability <= one.blocking_probability);
//! ```

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod rng;

// Re-exports for convenience
pub use crate::core::time::SimClock;
pub use models::{
    event::{Event, EventLog},
    result::SimulationResult,
    scenario::{Scenario, UniformRange},
    state::SimulationState,
};
pub use orchestrator::{run, Orchestrator, SimulationError};
pub use rng::{Lcg, LcgParams, RandomSource, RngError};
