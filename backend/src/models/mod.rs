//! Domain models for the queue simulator

pub mod event;
pub mod result;
pub mod scenario;
pub mod state;

// Re-exports
pub use event::{Event, EventLog};
pub use result::SimulationResult;
pub use scenario::{Scenario, UniformRange};
pub use state::SimulationState;
