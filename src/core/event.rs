use super::types::{FuelTypeId, VehicleId};
use std::cmp::Ordering;

/// The three state transitions a vehicle goes through.
///
/// Modeled as a sum type with exhaustive handling in the driver so a new
/// event kind cannot be silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A new vehicle of the given fuel type arrives at the station
    Arrival { fuel: FuelTypeId },
    /// A vehicle that holds the resources it needs begins fueling
    ServiceStart { vehicle: VehicleId, fuel: FuelTypeId },
    /// A vehicle finishes fueling and leaves the station
    ServiceEnd { vehicle: VehicleId, fuel: FuelTypeId },
}

impl EventKind {
    /// Fuel type the event belongs to
    pub fn fuel(&self) -> FuelTypeId {
        match self {
            EventKind::Arrival { fuel } => *fuel,
            EventKind::ServiceStart { fuel, .. } => *fuel,
            EventKind::ServiceEnd { fuel, .. } => *fuel,
        }
    }
}

/// An event pending in the scheduler, immutable once created.
///
/// Events are ordered by (time, rank, sequence). `rank` is 0 unless the
/// scheduler runs with fuel-type priority tie-breaking; `seq` is the
/// insertion counter, so simultaneous events of the same rank dispatch FIFO.
#[derive(Debug, Clone)]
pub struct Event {
    pub time: f64,
    pub(crate) rank: usize,
    pub(crate) seq: u64,
    pub kind: EventKind,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time.total_cmp(&other.time) == Ordering::Equal
            && self.rank == other.rank
            && self.seq == other.seq
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.rank.cmp(&self.rank))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
