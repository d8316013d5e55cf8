use super::types::VehicleId;

/// Errors surfaced by the simulation engine.
///
/// Every variant is fatal: the engine is a closed deterministic computation,
/// so a failure is either a bad configuration or an internal logic defect.
/// There are no transient or retryable cases.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Invalid run configuration, detected before any event is scheduled
    Configuration(String),
    /// An event was scheduled earlier than the current clock value
    Causality { event_time: f64, now: f64 },
    /// The event queue was popped while empty
    EmptyQueue,
    /// A dispatched event referenced a vehicle the driver does not know
    UnknownVehicle(VehicleId),
    /// Statistics were finalized a second time
    AlreadyFinalized,
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            SimulationError::Causality { event_time, now } => write!(
                f,
                "Causality violation: event scheduled at {} while clock is at {}",
                event_time, now
            ),
            SimulationError::EmptyQueue => write!(f, "Event queue is empty"),
            SimulationError::UnknownVehicle(id) => {
                write!(f, "Event references unknown {}", id)
            }
            SimulationError::AlreadyFinalized => {
                write!(f, "Run statistics were already finalized")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimulationError::Configuration("horizon must be finite".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: horizon must be finite"
        );

        let err = SimulationError::Causality {
            event_time: 1.0,
            now: 2.0,
        };
        assert!(err.to_string().contains("Causality violation"));

        let err = SimulationError::UnknownVehicle(VehicleId(3));
        assert_eq!(err.to_string(), "Event references unknown vehicle-3");
    }
}
