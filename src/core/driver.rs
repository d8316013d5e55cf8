use super::config::RunConfiguration;
use super::distributions::RandomProcesses;
use super::error::SimulationError;
use super::event::EventKind;
use super::event_scheduler::EventScheduler;
use super::pool::{Acquisition, ResourcePool};
use super::stats::{PoolUsage, RunStatistics, StatsCollector};
use super::types::{FuelTypeId, VehicleId};
use super::vehicle::Vehicle;
use log::{debug, trace};
use std::collections::HashMap;

/// Phases of one run. `Finished` is terminal; no events are dispatched
/// after it is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Initialized,
    Running,
    /// Horizon reached with events still pending, finishing them off
    Draining,
    /// Horizon reached, remaining vehicles counted as unfinished
    Truncated,
    Finished,
}

/// Owns all mutable simulation state (clock, pools, statistics) for one run,
/// so independent scenarios can execute in the same process without
/// interference.
///
/// The driver pops events in time order and dispatches each to the matching
/// handler; every arrival schedules the next arrival of its fuel type, so
/// the arrival chain perpetuates itself until the horizon.
pub struct Simulation {
    config: RunConfiguration,
    scheduler: EventScheduler,
    processes: RandomProcesses,
    pumps: Vec<ResourcePool>,
    attendants: Option<ResourcePool>,
    vehicles: HashMap<VehicleId, Vehicle>,
    next_vehicle_id: u64,
    stats: StatsCollector,
    state: DriverState,
}

impl Simulation {
    /// Validate the configuration and set up an idle simulation.
    pub fn new(config: RunConfiguration) -> Result<Self, SimulationError> {
        config.validate()?;

        let fuels: Vec<_> = config
            .fuel_types
            .iter()
            .map(|f| (f.name.clone(), f.interarrival.clone(), f.service_time.clone()))
            .collect();
        let processes = RandomProcesses::new(config.seed, &fuels)?;

        let pumps = config
            .fuel_types
            .iter()
            .map(|f| ResourcePool::new(f.pump_count))
            .collect();
        let attendants = if config.attendant_count > 0 {
            Some(ResourcePool::new(config.attendant_count))
        } else {
            None
        };
        let stats = StatsCollector::new(config.fuel_types.len());

        let scheduler = EventScheduler::new(config.tie_break);
        Ok(Self {
            config,
            scheduler,
            processes,
            pumps,
            attendants,
            vehicles: HashMap::new(),
            next_vehicle_id: 0,
            stats,
            state: DriverState::Initialized,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run to completion and return the finalized statistics. A simulation
    /// runs once; `Finished` is terminal and a second call fails.
    pub fn run(&mut self) -> Result<RunStatistics, SimulationError> {
        if self.state != DriverState::Initialized {
            return Err(SimulationError::AlreadyFinalized);
        }
        self.seed_arrivals()?;
        self.state = DriverState::Running;
        debug!(
            "run started: {} fuel types, horizon {}, seed {}",
            self.config.fuel_types.len(),
            self.config.horizon,
            self.config.seed
        );

        while let Some(next_time) = self.scheduler.peek_time() {
            if self.state == DriverState::Running && next_time > self.config.horizon {
                if self.config.drain_on_horizon {
                    debug!("horizon {} reached, draining {} pending events", self.config.horizon, self.scheduler.len());
                    self.state = DriverState::Draining;
                } else {
                    debug!("horizon {} reached, truncating", self.config.horizon);
                    self.state = DriverState::Truncated;
                    break;
                }
            }

            let event = self.scheduler.pop_next()?;
            trace!("dispatch t={} {:?}", event.time, event.kind);
            match event.kind {
                EventKind::Arrival { fuel } => self.handle_arrival(fuel)?,
                EventKind::ServiceStart { vehicle, fuel } => {
                    self.handle_service_start(vehicle, fuel)?
                }
                EventKind::ServiceEnd { vehicle, fuel } => {
                    self.handle_service_end(vehicle, fuel)?
                }
            }
        }

        self.finish()
    }

    /// Schedule the first arrival of each fuel type from its first draw
    fn seed_arrivals(&mut self) -> Result<(), SimulationError> {
        for index in 0..self.config.fuel_types.len() {
            let fuel = FuelTypeId::new(index);
            let first = self.processes.next_interarrival(fuel);
            if first <= self.config.horizon {
                self.scheduler.schedule(first, EventKind::Arrival { fuel })?;
            }
        }
        Ok(())
    }

    fn handle_arrival(&mut self, fuel: FuelTypeId) -> Result<(), SimulationError> {
        let now = self.scheduler.now();

        // Self-perpetuating arrival chain: each arrival schedules the next
        // one of its fuel type until the horizon.
        let gap = self.processes.next_interarrival(fuel);
        let next = now + gap;
        if next <= self.config.horizon {
            self.scheduler.schedule(next, EventKind::Arrival { fuel })?;
        }

        let id = VehicleId(self.next_vehicle_id);
        self.next_vehicle_id += 1;
        self.vehicles.insert(id, Vehicle::new(id, fuel, now));
        self.stats.record_arrival(fuel);
        trace!("{} ({}) arrived at {}", id, fuel, now);

        match self.pumps[fuel.index()].try_acquire(id, now) {
            Acquisition::Granted => self.pump_granted(id, fuel, now)?,
            Acquisition::Queued => {
                let depth = self.pumps[fuel.index()].queue_len();
                self.stats.sample_queue_length(fuel, now, depth);
                trace!("{} queued, {} waiting for {}", id, depth, fuel);
            }
        }
        Ok(())
    }

    /// A vehicle holds a pump; begin service once an attendant (if modeled)
    /// is free as well.
    fn pump_granted(
        &mut self,
        id: VehicleId,
        fuel: FuelTypeId,
        now: f64,
    ) -> Result<(), SimulationError> {
        let attendant_free = match self.attendants.as_mut() {
            Some(pool) => pool.try_acquire(id, now) == Acquisition::Granted,
            None => true,
        };
        if attendant_free {
            self.scheduler
                .schedule(now, EventKind::ServiceStart { vehicle: id, fuel })?;
        } else {
            trace!("{} holds a pump, waiting for an attendant", id);
        }
        Ok(())
    }

    fn handle_service_start(
        &mut self,
        id: VehicleId,
        fuel: FuelTypeId,
    ) -> Result<(), SimulationError> {
        let now = self.scheduler.now();
        let vehicle = self
            .vehicles
            .get_mut(&id)
            .ok_or(SimulationError::UnknownVehicle(id))?;
        vehicle.begin_service(now);

        let duration = self.processes.next_service_time(fuel);
        self.scheduler
            .schedule(now + duration, EventKind::ServiceEnd { vehicle: id, fuel })?;
        Ok(())
    }

    fn handle_service_end(
        &mut self,
        id: VehicleId,
        fuel: FuelTypeId,
    ) -> Result<(), SimulationError> {
        let now = self.scheduler.now();
        let mut vehicle = self
            .vehicles
            .remove(&id)
            .ok_or(SimulationError::UnknownVehicle(id))?;
        vehicle.complete(now);

        // Release the attendant first so the next waiter (which already
        // holds a pump) can start in the same instant.
        let next_attended = self.attendants.as_mut().and_then(|pool| pool.release(now));
        if let Some(next_id) = next_attended {
            let next_fuel = self
                .vehicles
                .get(&next_id)
                .ok_or(SimulationError::UnknownVehicle(next_id))?
                .fuel();
            self.scheduler.schedule(
                now,
                EventKind::ServiceStart {
                    vehicle: next_id,
                    fuel: next_fuel,
                },
            )?;
        }

        let head = self.pumps[fuel.index()].release(now);
        if let Some(next_id) = head {
            let depth = self.pumps[fuel.index()].queue_len();
            self.stats.sample_queue_length(fuel, now, depth);
            self.pump_granted(next_id, fuel, now)?;
        }

        self.stats.record_departure(&vehicle);
        trace!("{} departed at {}", id, now);
        Ok(())
    }

    /// Close out the run: count unfinished vehicles, fix the elapsed time,
    /// and finalize the statistics.
    fn finish(&mut self) -> Result<RunStatistics, SimulationError> {
        let mut unfinished = vec![0u64; self.config.fuel_types.len()];
        for vehicle in self.vehicles.values() {
            unfinished[vehicle.fuel().index()] += 1;
        }

        // Truncated runs end at the horizon; drained runs end at the last
        // processed event, which may lie past it.
        let end_time = self.config.horizon.max(self.scheduler.now());

        let names: Vec<String> = self
            .config
            .fuel_types
            .iter()
            .map(|f| f.name.clone())
            .collect();
        let pump_usage: Vec<PoolUsage> = self
            .pumps
            .iter()
            .map(|pool| PoolUsage {
                capacity: pool.capacity(),
                busy_time: pool.busy_time(end_time),
            })
            .collect();
        let attendant_usage = self.attendants.as_ref().map(|pool| PoolUsage {
            capacity: pool.capacity(),
            busy_time: pool.busy_time(end_time),
        });

        let statistics =
            self.stats
                .finalize(end_time, &names, &pump_usage, attendant_usage, &unfinished)?;
        self.state = DriverState::Finished;
        debug!(
            "run finished: {} arrived, {} served, {} unfinished over {} simulated time",
            statistics.overall.arrived,
            statistics.overall.served,
            statistics.overall.unfinished,
            statistics.total_simulated_time
        );
        Ok(statistics)
    }
}

/// Run one scenario to completion. This is the sole entry point for
/// external callers; everything downstream of `RunStatistics` (printing,
/// plotting, persistence) is out of engine scope.
pub fn run(config: &RunConfiguration) -> Result<RunStatistics, SimulationError> {
    let mut simulation = Simulation::new(config.clone())?;
    simulation.run()
}
