//! Event trace for instrumented runs
//!
//! The engine can record every event it processes. The trace is what the
//! aggregate statistics are derived from, so it is the tool of choice for
//! checking conservation, clock monotonicity and occupancy bounds.
//!
//! # Example
//!
//! ```rust
//! use queue_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Arrival {
//!     time: 3.2,
//!     in_system_before: 0,
//!     admitted: true,
//!     server: Some(0),
//! });
//!
//! assert_eq!(log.arrival_count(), 1);
//! assert_eq!(log.events()[0].in_system_after(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// One processed simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A customer tried to enter the system
    Arrival {
        time: f64,
        in_system_before: usize,
        /// False when the system was full and the customer was lost
        admitted: bool,
        /// Slot the customer started service in, if one was idle
        server: Option<usize>,
    },

    /// A customer finished service and left
    Departure {
        time: f64,
        server: usize,
        in_system_before: usize,
        /// True when a waiting customer took over the freed slot
        next_service_started: bool,
    },
}

impl Event {
    /// Simulation time of the event
    pub fn time(&self) -> f64 {
        match self {
            Event::Arrival { time, .. } | Event::Departure { time, .. } => *time,
        }
    }

    /// Occupancy level before the event was applied
    pub fn in_system_before(&self) -> usize {
        match self {
            Event::Arrival {
                in_system_before, ..
            }
            | Event::Departure {
                in_system_before, ..
            } => *in_system_before,
        }
    }

    /// Occupancy level after the event was applied
    pub fn in_system_after(&self) -> usize {
        match self {
            Event::Arrival {
                in_system_before,
                admitted,
                ..
            } => in_system_before + usize::from(*admitted),
            Event::Departure {
                in_system_before, ..
            } => in_system_before - 1,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Event::Arrival { .. } => "arrival",
            Event::Departure { .. } => "departure",
        }
    }
}

/// Ordered record of processed events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Arrival attempts, admitted or lost
    pub fn arrival_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Arrival { .. }))
            .count()
    }

    pub fn departure_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Departure { .. }))
            .count()
    }

    /// Arrivals rejected because the system was full
    pub fn loss_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Arrival { admitted: false, .. }))
            .count()
    }

    /// Events processed within `[from, to)`
    pub fn events_between(&self, from: f64, to: f64) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.time() >= from && e.time() < to)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_arrival_keeps_occupancy() {
        let event = Event::Arrival {
            time: 1.0,
            in_system_before: 5,
            admitted: false,
            server: None,
        };
        assert_eq!(event.in_system_after(), 5);
    }

    #[test]
    fn test_counts_by_kind() {
        let mut log = EventLog::new();
        log.log(Event::Arrival {
            time: 1.0,
            in_system_before: 0,
            admitted: true,
            server: Some(0),
        });
        log.log(Event::Arrival {
            time: 2.0,
            in_system_before: 1,
            admitted: false,
            server: None,
        });
        log.log(Event::Departure {
            time: 4.0,
            server: 0,
            in_system_before: 1,
            next_service_started: false,
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.arrival_count(), 2);
        assert_eq!(log.loss_count(), 1);
        assert_eq!(log.departure_count(), 1);
        assert_eq!(log.events_between(1.5, 4.0).len(), 1);
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = Event::Departure {
            time: 4.0,
            server: 1,
            in_system_before: 2,
            next_service_started: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "departure");
        assert_eq!(json["server"], 1);
    }
}
