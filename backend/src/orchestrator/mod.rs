//! Orchestrator - main simulation loop
//!
//! See `engine.rs` for the event loop and `checkpoint.rs` for save/resume.

pub mod checkpoint;
pub mod engine;

// Re-export main types for convenience
pub use engine::{run, Orchestrator, SimulationError};

// Re-export checkpoint types
pub use checkpoint::{QueueSnapshot, RngSnapshot, StateSnapshot};
