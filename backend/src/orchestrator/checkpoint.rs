//! Checkpoint - Save/Load Simulation State
//!
//! Enables serialization and deserialization of a running simulation for
//! pause/resume of long runs.
//!
//! # Critical Invariants
//!
//! - **Determinism**: a resumed run produces the same result as an
//!   uninterrupted one (generator state and draw count are restored)
//! - **Config Matching**: state can only be loaded with the scenario it was
//!   taken from
//! - **State Validity**: snapshots violating state invariants are rejected

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::time::SimClock;
use crate::models::scenario::Scenario;
use crate::models::state::SimulationState;
use crate::orchestrator::engine::{Orchestrator, SimulationError};
use crate::rng::{Lcg, LcgParams, RandomSource};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete orchestrator state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Generator position (CRITICAL for determinism)
    pub rng: RngSnapshot,

    pub queue: QueueSnapshot,

    /// SHA256 hash of the scenario (for validation)
    pub config_hash: String,
}

/// Generator snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RngSnapshot {
    pub state: u64,
    pub draws: u64,
    pub params: LcgParams,
}

impl From<&Lcg> for RngSnapshot {
    fn from(rng: &Lcg) -> Self {
        RngSnapshot {
            state: rng.state(),
            draws: rng.draws(),
            params: rng.params(),
        }
    }
}

/// Queue state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Time of the last processed event
    pub now: f64,
    pub in_system: usize,
    /// `None` for idle slots
    pub slots: Vec<Option<f64>>,
    pub occupancy_time: Vec<f64>,
    pub losses: u64,
    pub served: u64,
    pub arrivals: u64,
    pub next_arrival: f64,
}

impl From<&SimulationState> for QueueSnapshot {
    fn from(state: &SimulationState) -> Self {
        QueueSnapshot {
            now: state.clock().now(),
            in_system: state.in_system(),
            slots: state.slots().to_vec(),
            occupancy_time: state.occupancy_time().to_vec(),
            losses: state.losses(),
            served: state.served(),
            arrivals: state.arrivals(),
            next_arrival: state.next_arrival(),
        }
    }
}

impl From<QueueSnapshot> for SimulationState {
    fn from(snapshot: QueueSnapshot) -> Self {
        SimulationState {
            clock: SimClock::at(snapshot.now),
            in_system: snapshot.in_system,
            slots: snapshot.slots,
            occupancy_time: snapshot.occupancy_time,
            losses: snapshot.losses,
            served: snapshot.served,
            arrivals: snapshot.arrivals,
            next_arrival: snapshot.next_arrival,
        }
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute deterministic SHA256 hash of config
///
/// Hashes the compact JSON form. Struct fields serialize in declaration
/// order, so equal configs always give equal hashes.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    let json = serde_json::to_string(config).map_err(|e| {
        SimulationError::SerializationError(format!("Config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a queue snapshot against the scenario it claims to belong to
///
/// Checks shape (slot and accumulator counts), finiteness, and the state
/// invariants of `SimulationState`.
pub fn validate_snapshot(
    snapshot: &QueueSnapshot,
    scenario: &Scenario,
) -> Result<(), SimulationError> {
    if snapshot.slots.len() != scenario.servers {
        return Err(SimulationError::StateValidationError(format!(
            "snapshot has {} server slots, scenario has {} servers",
            snapshot.slots.len(),
            scenario.servers
        )));
    }

    if snapshot.occupancy_time.len() != scenario.capacity + 1 {
        return Err(SimulationError::StateValidationError(format!(
            "snapshot has {} occupancy levels, scenario capacity {} needs {}",
            snapshot.occupancy_time.len(),
            scenario.capacity,
            scenario.capacity + 1
        )));
    }

    let times = [snapshot.now, snapshot.next_arrival];
    let all_finite = times
        .iter()
        .chain(snapshot.occupancy_time.iter())
        .chain(snapshot.slots.iter().flatten())
        .all(|t| t.is_finite() && *t >= 0.0);
    if !all_finite {
        return Err(SimulationError::StateValidationError(
            "snapshot contains negative or non-finite times".to_string(),
        ));
    }

    if snapshot.next_arrival < snapshot.now {
        return Err(SimulationError::StateValidationError(format!(
            "pending arrival at {} is before the clock ({})",
            snapshot.next_arrival, snapshot.now
        )));
    }

    SimulationState::from(snapshot.clone()).check_invariants()
}

// ============================================================================
// Orchestrator save/load
// ============================================================================

impl Orchestrator<Lcg> {
    /// Serialize the current run to JSON
    ///
    /// The event log, if any, is not part of the snapshot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use queue_simulator_core_rs::{Lcg, Orchestrator, Scenario};
    ///
    /// let scenario = Scenario::new(2, 5, 1_000);
    /// let mut orch = Orchestrator::new(scenario.clone(), Lcg::new(7)).unwrap();
    /// for _ in 0..50 {
    ///     orch.step().unwrap();
    /// }
    ///
    /// let json = orch.save_state().unwrap();
    /// let restored = Orchestrator::load_state(scenario, &json).unwrap();
    /// assert_eq!(restored.state(), orch.state());
    /// ```
    pub fn save_state(&self) -> Result<String, SimulationError> {
        let snapshot = StateSnapshot {
            rng: RngSnapshot::from(self.source()),
            queue: QueueSnapshot::from(self.state()),
            config_hash: compute_config_hash(self.scenario())?,
        };

        validate_snapshot(&snapshot.queue, self.scenario())?;

        serde_json::to_string(&snapshot).map_err(|e| {
            SimulationError::SerializationError(format!("Failed to serialize state: {}", e))
        })
    }

    /// Restore a run saved with `save_state`
    ///
    /// # Errors
    ///
    /// - `DeserializationError` for malformed JSON
    /// - `ConfigMismatch` if the snapshot was taken with another scenario
    /// - `StateValidationError` if the snapshot is inconsistent
    /// - `Rng` if the stored generator has a zero modulus
    pub fn load_state(scenario: Scenario, state_json: &str) -> Result<Self, SimulationError> {
        let snapshot: StateSnapshot = serde_json::from_str(state_json).map_err(|e| {
            SimulationError::DeserializationError(format!("Failed to parse state JSON: {}", e))
        })?;

        scenario.validate()?;

        let config_hash = compute_config_hash(&scenario)?;
        if snapshot.config_hash != config_hash {
            return Err(SimulationError::ConfigMismatch {
                expected: snapshot.config_hash,
                actual: config_hash,
            });
        }

        validate_snapshot(&snapshot.queue, &scenario)?;

        let rng = Lcg::from_state(snapshot.rng.state, snapshot.rng.draws, snapshot.rng.params)?;
        let state = SimulationState::from(snapshot.queue);

        Ok(Orchestrator::from_parts(scenario, rng, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_config_hash_deterministic() {
        let hash1 = compute_config_hash(&Scenario::new(1, 5, 100)).unwrap();
        let hash2 = compute_config_hash(&Scenario::new(1, 5, 100)).unwrap();

        assert_eq!(hash1, hash2, "Same config should produce same hash");
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_compute_config_hash_different_for_different_configs() {
        let hash1 = compute_config_hash(&Scenario::new(1, 5, 100)).unwrap();
        let hash2 = compute_config_hash(&Scenario::new(2, 5, 100)).unwrap();

        assert_ne!(
            hash1, hash2,
            "Different configs should produce different hashes"
        );
    }

    #[test]
    fn test_snapshot_with_wrong_slot_count_rejected() {
        let scenario = Scenario::new(2, 5, 100);
        let mut snapshot = QueueSnapshot::from(&SimulationState::new(2, 5));
        snapshot.slots.pop();

        assert!(matches!(
            validate_snapshot(&snapshot, &scenario),
            Err(SimulationError::StateValidationError(_))
        ));
    }

    #[test]
    fn test_snapshot_with_infinite_time_rejected() {
        let scenario = Scenario::new(1, 5, 100);
        let mut snapshot = QueueSnapshot::from(&SimulationState::new(1, 5));
        snapshot.next_arrival = f64::INFINITY;

        assert!(validate_snapshot(&snapshot, &scenario).is_err());
    }
}
