pub mod core;

// Re-export commonly used types
pub use crate::core::config::{FuelTypeConfig, RunConfiguration, TieBreak};
pub use crate::core::distributions::{DurationDistribution, ServiceTimeSpec};
pub use crate::core::driver::{run, DriverState, Simulation};
pub use crate::core::error::SimulationError;
pub use crate::core::stats::{FuelTypeStats, OverallStats, RunStatistics, VehicleRecord};
pub use crate::core::types::{FuelTypeId, VehicleId};
