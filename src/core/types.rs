use serde::{Deserialize, Serialize};

/// Identifier for a vehicle, assigned monotonically within one run.
///
/// Monotonic assignment (rather than random IDs) keeps runs reproducible
/// for a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub(crate) u64);

impl VehicleId {
    /// Get the raw identifier value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vehicle-{}", self.0)
    }
}

/// Index into the run configuration's fuel-type list.
///
/// The configuration order doubles as the fuel-type priority when the
/// scheduler is configured with `TieBreak::FuelTypePriority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FuelTypeId(pub(crate) usize);

impl FuelTypeId {
    /// Create a fuel-type ID from its position in the configuration
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the position in the configured fuel-type list
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FuelTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fuel-{}", self.0)
    }
}
