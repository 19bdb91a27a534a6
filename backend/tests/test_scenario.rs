//! Tests for scenario validation and (de)serialization

use queue_simulator_core_rs::{Scenario, SimulationError, UniformRange};

#[test]
fn test_valid_reference_scenarios() {
    assert!(Scenario::new(1, 5, 100_000).validate().is_ok());
    assert!(Scenario::new(2, 5, 100_000).validate().is_ok());
}

#[test]
fn test_capacity_equal_to_servers_is_valid() {
    assert!(Scenario::new(3, 3, 10).validate().is_ok());
}

#[test]
fn test_zero_servers_zero_capacity_is_valid() {
    assert!(Scenario::new(0, 0, 10).validate().is_ok());
}

#[test]
fn test_capacity_below_servers_rejected() {
    let err = Scenario::new(3, 2, 10).validate().unwrap_err();
    match err {
        SimulationError::InvalidConfig(msg) => {
            assert!(msg.contains("capacity"), "unexpected message: {}", msg)
        }
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn test_inverted_range_rejected() {
    let scenario = Scenario::default().with_arrival(5.0, 2.0);
    assert!(matches!(
        scenario.validate(),
        Err(SimulationError::InvalidConfig(_))
    ));
}

#[test]
fn test_negative_range_rejected() {
    let scenario = Scenario::default().with_service(-1.0, 5.0);
    assert!(matches!(
        scenario.validate(),
        Err(SimulationError::InvalidConfig(_))
    ));
}

#[test]
fn test_infinite_range_rejected() {
    let scenario = Scenario::default().with_arrival(1.0, f64::INFINITY);
    assert!(scenario.validate().is_err());
}

#[test]
fn test_label() {
    assert_eq!(Scenario::new(1, 5, 0).label(), "G/G/1/5");
    assert_eq!(Scenario::default().with_servers(4).label(), "G/G/4/5");
}

#[test]
fn test_json_round_trip() {
    let scenario = Scenario::new(2, 7, 5_000)
        .with_arrival(1.0, 2.5)
        .with_service(0.5, 4.0);

    let json = serde_json::to_string(&scenario).unwrap();
    let parsed: Scenario = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, scenario);
    assert_eq!(parsed.service, UniformRange::new(0.5, 4.0));
}
