use super::types::{FuelTypeId, VehicleId};

/// An arriving customer, created on its arrival event and archived into the
/// statistics once it departs.
///
/// Timestamps are filled in as the vehicle progresses; whenever all three
/// are set, arrival <= service start <= departure holds.
#[derive(Debug, Clone)]
pub struct Vehicle {
    id: VehicleId,
    fuel: FuelTypeId,
    arrival_time: f64,
    service_start: Option<f64>,
    departure: Option<f64>,
}

impl Vehicle {
    pub fn new(id: VehicleId, fuel: FuelTypeId, arrival_time: f64) -> Self {
        Self {
            id,
            fuel,
            arrival_time,
            service_start: None,
            departure: None,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn fuel(&self) -> FuelTypeId {
        self.fuel
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn service_start(&self) -> Option<f64> {
        self.service_start
    }

    pub fn departure(&self) -> Option<f64> {
        self.departure
    }

    /// Mark the moment the vehicle reaches a pump and begins fueling
    pub fn begin_service(&mut self, now: f64) {
        debug_assert!(now >= self.arrival_time);
        debug_assert!(self.service_start.is_none(), "service started twice");
        self.service_start = Some(now);
    }

    /// Mark the moment the vehicle leaves the station
    pub fn complete(&mut self, now: f64) {
        debug_assert!(self.service_start.is_some(), "departed without service");
        debug_assert!(self.service_start.map_or(true, |s| now >= s));
        debug_assert!(self.departure.is_none(), "departed twice");
        self.departure = Some(now);
    }

    /// Time spent waiting for a free pump, once service has started
    pub fn wait_time(&self) -> Option<f64> {
        self.service_start.map(|start| start - self.arrival_time)
    }

    /// Time spent fueling and paying, once departed
    pub fn service_duration(&self) -> Option<f64> {
        match (self.service_start, self.departure) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Total time in the system, once departed
    pub fn total_time(&self) -> Option<f64> {
        self.departure.map(|end| end - self.arrival_time)
    }

    pub fn is_complete(&self) -> bool {
        self.departure.is_some()
    }
}
