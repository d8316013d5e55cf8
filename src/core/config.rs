use super::distributions::{DurationDistribution, ServiceTimeSpec};
use super::error::SimulationError;
use serde::{Deserialize, Serialize};

/// How simultaneous events of *different* fuel types are ordered.
///
/// Same-fuel-type ties always dispatch in insertion order, which preserves
/// FCFS within a queue regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Dispatch in the order the events were scheduled
    InsertionOrder,
    /// Dispatch by position in the configured fuel-type list, earlier first
    FuelTypePriority,
}

impl Default for TieBreak {
    fn default() -> Self {
        TieBreak::InsertionOrder
    }
}

/// Demand and capacity parameters for one fuel type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTypeConfig {
    /// Human-readable name, e.g. "Octane92"
    pub name: String,
    /// Number of pumps serving this fuel type; 0 models an unavailable type
    pub pump_count: usize,
    /// Distribution of the time between consecutive arrivals
    pub interarrival: DurationDistribution,
    /// How service durations are produced
    pub service_time: ServiceTimeSpec,
}

impl FuelTypeConfig {
    /// Convenience constructor for the common Poisson-arrival case, with the
    /// arrival rate given in vehicles per unit time.
    pub fn poisson(
        name: impl Into<String>,
        pump_count: usize,
        arrival_rate: f64,
        service_time: ServiceTimeSpec,
    ) -> Self {
        Self {
            name: name.into(),
            pump_count,
            interarrival: DurationDistribution::Exponential { rate: arrival_rate },
            service_time,
        }
    }
}

/// Immutable parameters of one simulation run.
///
/// Built with the `with_*` methods, validated once by the driver before any
/// event is scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfiguration {
    pub fuel_types: Vec<FuelTypeConfig>,
    /// Shared attendants required to begin service; 0 means self-service
    pub attendant_count: usize,
    /// Simulated-time cutoff after which no new arrivals are generated
    pub horizon: f64,
    pub seed: u64,
    /// Whether to finish vehicles still queued or in service at the horizon
    pub drain_on_horizon: bool,
    pub tie_break: TieBreak,
}

impl RunConfiguration {
    pub fn new(horizon: f64, seed: u64) -> Self {
        Self {
            fuel_types: Vec::new(),
            attendant_count: 0,
            horizon,
            seed,
            drain_on_horizon: false,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_fuel_type(mut self, fuel_type: FuelTypeConfig) -> Self {
        self.fuel_types.push(fuel_type);
        self
    }

    pub fn with_attendants(mut self, count: usize) -> Self {
        self.attendant_count = count;
        self
    }

    pub fn with_drain_on_horizon(mut self, drain: bool) -> Self {
        self.drain_on_horizon = drain;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Check every parameter, reporting the first problem found.
    ///
    /// A horizon of exactly 0 is legal and yields an empty run; pump counts
    /// of 0 are legal and model an unavailable fuel type.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.fuel_types.is_empty() {
            return Err(SimulationError::Configuration(
                "at least one fuel type is required".to_string(),
            ));
        }
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(SimulationError::Configuration(format!(
                "horizon must be finite and non-negative, got {}",
                self.horizon
            )));
        }
        for (index, fuel_type) in self.fuel_types.iter().enumerate() {
            if fuel_type.name.is_empty() {
                return Err(SimulationError::Configuration(format!(
                    "fuel type at index {} has an empty name",
                    index
                )));
            }
            if self
                .fuel_types
                .iter()
                .skip(index + 1)
                .any(|other| other.name == fuel_type.name)
            {
                return Err(SimulationError::Configuration(format!(
                    "duplicate fuel type name '{}'",
                    fuel_type.name
                )));
            }
            fuel_type
                .interarrival
                .validate(&format!("fuel type '{}' interarrival", fuel_type.name))?;
            if fuel_type.interarrival.is_always_zero() {
                return Err(SimulationError::Configuration(format!(
                    "fuel type '{}' interarrival: every draw is zero, arrivals would never advance the clock",
                    fuel_type.name
                )));
            }
            fuel_type
                .service_time
                .validate(&format!("fuel type '{}' service time", fuel_type.name))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn petrol() -> FuelTypeConfig {
        FuelTypeConfig::poisson(
            "petrol",
            2,
            0.2,
            ServiceTimeSpec::Duration(DurationDistribution::Exponential { rate: 0.5 }),
        )
    }

    #[test]
    fn test_valid_configuration() {
        let config = RunConfiguration::new(480.0, 42).with_fuel_type(petrol());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_fuel_list_rejected() {
        assert!(RunConfiguration::new(480.0, 42).validate().is_err());
    }

    #[test]
    fn test_zero_horizon_is_legal() {
        let config = RunConfiguration::new(0.0, 42).with_fuel_type(petrol());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_or_nan_horizon_rejected() {
        let config = RunConfiguration::new(-1.0, 42).with_fuel_type(petrol());
        assert!(config.validate().is_err());

        let config = RunConfiguration::new(f64::NAN, 42).with_fuel_type(petrol());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_fuel_names_rejected() {
        let config = RunConfiguration::new(480.0, 42)
            .with_fuel_type(petrol())
            .with_fuel_type(petrol());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate fuel type name"));
    }

    #[test]
    fn test_invalid_distribution_reported_with_context() {
        let mut bad = petrol();
        bad.interarrival = DurationDistribution::Exponential { rate: -2.0 };
        let config = RunConfiguration::new(480.0, 42).with_fuel_type(bad);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("petrol"));
    }

    #[test]
    fn test_zero_gap_interarrival_rejected() {
        let zero_gap = [
            DurationDistribution::Constant { value: 0.0 },
            DurationDistribution::Uniform { low: 0.0, high: 0.0 },
            DurationDistribution::Sequence {
                values: vec![0.0, 0.0],
            },
            DurationDistribution::Empirical {
                samples: vec![0.0, 0.0],
            },
        ];
        for interarrival in zero_gap {
            let mut bad = petrol();
            bad.interarrival = interarrival;
            let config = RunConfiguration::new(480.0, 42).with_fuel_type(bad);
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("every draw is zero"));
        }
    }

    #[test]
    fn test_zero_entries_in_mixed_sequence_are_legal() {
        let mut fuel_type = petrol();
        fuel_type.interarrival = DurationDistribution::Sequence {
            values: vec![0.0, 0.0, 1.0e9],
        };
        let config = RunConfiguration::new(480.0, 42).with_fuel_type(fuel_type);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_options() {
        let config = RunConfiguration::new(60.0, 7)
            .with_fuel_type(petrol())
            .with_attendants(3)
            .with_drain_on_horizon(true)
            .with_tie_break(TieBreak::FuelTypePriority);
        assert_eq!(config.attendant_count, 3);
        assert!(config.drain_on_horizon);
        assert_eq!(config.tie_break, TieBreak::FuelTypePriority);
    }
}
