//! Turns raw event-trace observations into performance metrics.
//!
//! Queue depths are averaged by time weight: the collector integrates the
//! area under the queue-length step curve at every mutation and divides by
//! elapsed time at finalization, which is exact rather than a mean of
//! discrete samples.

use super::error::SimulationError;
use super::types::{FuelTypeId, VehicleId};
use super::vehicle::Vehicle;
use serde::Serialize;

/// Completed lifecycle of one vehicle, archived for downstream reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub vehicle: VehicleId,
    pub fuel: FuelTypeId,
    pub arrival_time: f64,
    pub service_start: f64,
    pub departure: f64,
}

/// Tracks one queue's depth over time as a step function.
#[derive(Debug)]
struct QueueLengthTracker {
    last_time: f64,
    depth: usize,
    area: f64,
    series: Vec<(f64, usize)>,
}

impl QueueLengthTracker {
    fn new() -> Self {
        Self {
            last_time: 0.0,
            depth: 0,
            area: 0.0,
            series: vec![(0.0, 0)],
        }
    }

    /// Record a depth change, weighting the previous depth by the time it
    /// persisted.
    fn record(&mut self, time: f64, depth: usize) {
        debug_assert!(time >= self.last_time);
        self.area += self.depth as f64 * (time - self.last_time);
        self.last_time = time;
        if depth != self.depth {
            self.depth = depth;
            self.series.push((time, depth));
        }
    }

    /// Area under the step curve up to `until`, without mutating state
    fn area_until(&self, until: f64) -> f64 {
        self.area + self.depth as f64 * (until - self.last_time)
    }
}

#[derive(Debug, Default)]
struct FuelAccumulator {
    wait_samples: Vec<f64>,
    service_samples: Vec<f64>,
    total_samples: Vec<f64>,
    arrived: u64,
    served: u64,
}

/// Resource usage snapshot handed to `finalize` by the driver.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PoolUsage {
    pub capacity: usize,
    pub busy_time: f64,
}

/// Aggregated metrics for one fuel type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelTypeStats {
    pub name: String,
    pub arrived: u64,
    pub served: u64,
    /// Vehicles still queued or in service when the run was truncated
    pub unfinished: u64,
    pub mean_wait: f64,
    pub p50_wait: f64,
    pub p90_wait: f64,
    pub max_wait: f64,
    pub mean_service: f64,
    /// Mean time in system (wait + service) of served vehicles
    pub mean_total: f64,
    /// Time-weighted average queue depth
    pub mean_queue_length: f64,
    /// Busy pump time divided by (pump count x elapsed time), in [0, 1]
    pub utilization: f64,
    /// Chart-ready queue-depth step series as (time, depth) points
    pub queue_series: Vec<(f64, usize)>,
}

/// Station-wide totals across all fuel types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub arrived: u64,
    pub served: u64,
    pub unfinished: u64,
    pub mean_wait: f64,
}

/// Final output of a run: plain data with no behavior, consumable by any
/// reporting or plotting collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStatistics {
    pub total_simulated_time: f64,
    pub fuel_types: Vec<FuelTypeStats>,
    pub overall: OverallStats,
    /// Attendant-pool utilization, when attendants are modeled
    pub attendant_utilization: Option<f64>,
    pub completed: Vec<VehicleRecord>,
}

/// Observes every state transition during a run and produces the final
/// `RunStatistics` exactly once.
pub(crate) struct StatsCollector {
    per_fuel: Vec<FuelAccumulator>,
    queues: Vec<QueueLengthTracker>,
    completed: Vec<VehicleRecord>,
    finalized: bool,
}

impl StatsCollector {
    pub(crate) fn new(fuel_count: usize) -> Self {
        Self {
            per_fuel: (0..fuel_count).map(|_| FuelAccumulator::default()).collect(),
            queues: (0..fuel_count).map(|_| QueueLengthTracker::new()).collect(),
            completed: Vec::new(),
            finalized: false,
        }
    }

    pub(crate) fn record_arrival(&mut self, fuel: FuelTypeId) {
        self.per_fuel[fuel.index()].arrived += 1;
    }

    /// Called on every queue mutation with the queue's new depth
    pub(crate) fn sample_queue_length(&mut self, fuel: FuelTypeId, time: f64, depth: usize) {
        self.queues[fuel.index()].record(time, depth);
    }

    /// Archive a departed vehicle and fold its timestamps into the samples
    pub(crate) fn record_departure(&mut self, vehicle: &Vehicle) {
        let (Some(start), Some(end)) = (vehicle.service_start(), vehicle.departure()) else {
            debug_assert!(false, "departure recorded for an unfinished vehicle");
            return;
        };

        let accumulator = &mut self.per_fuel[vehicle.fuel().index()];
        accumulator.wait_samples.push(start - vehicle.arrival_time());
        accumulator.service_samples.push(end - start);
        accumulator.total_samples.push(end - vehicle.arrival_time());
        accumulator.served += 1;

        self.completed.push(VehicleRecord {
            vehicle: vehicle.id(),
            fuel: vehicle.fuel(),
            arrival_time: vehicle.arrival_time(),
            service_start: start,
            departure: end,
        });
    }

    /// Compute the final aggregates. Calling this a second time fails with
    /// `AlreadyFinalized`.
    pub(crate) fn finalize(
        &mut self,
        end_time: f64,
        names: &[String],
        pumps: &[PoolUsage],
        attendants: Option<PoolUsage>,
        unfinished: &[u64],
    ) -> Result<RunStatistics, SimulationError> {
        if self.finalized {
            return Err(SimulationError::AlreadyFinalized);
        }
        self.finalized = true;

        let mut fuel_types = Vec::with_capacity(self.per_fuel.len());
        for (index, accumulator) in self.per_fuel.iter().enumerate() {
            let queue = &self.queues[index];
            fuel_types.push(FuelTypeStats {
                name: names[index].clone(),
                arrived: accumulator.arrived,
                served: accumulator.served,
                unfinished: unfinished[index],
                mean_wait: mean(&accumulator.wait_samples),
                p50_wait: percentile(&accumulator.wait_samples, 50.0),
                p90_wait: percentile(&accumulator.wait_samples, 90.0),
                max_wait: accumulator
                    .wait_samples
                    .iter()
                    .fold(0.0, |acc, w| acc.max(*w)),
                mean_service: mean(&accumulator.service_samples),
                mean_total: mean(&accumulator.total_samples),
                mean_queue_length: if end_time > 0.0 {
                    queue.area_until(end_time) / end_time
                } else {
                    0.0
                },
                utilization: utilization(pumps[index], end_time),
                queue_series: queue.series.clone(),
            });
        }

        let all_waits: Vec<f64> = self
            .per_fuel
            .iter()
            .flat_map(|acc| acc.wait_samples.iter().copied())
            .collect();
        let overall = OverallStats {
            arrived: self.per_fuel.iter().map(|acc| acc.arrived).sum(),
            served: self.per_fuel.iter().map(|acc| acc.served).sum(),
            unfinished: unfinished.iter().sum(),
            mean_wait: mean(&all_waits),
        };

        Ok(RunStatistics {
            total_simulated_time: end_time,
            fuel_types,
            overall,
            attendant_utilization: attendants.map(|usage| utilization(usage, end_time)),
            completed: std::mem::take(&mut self.completed),
        })
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

/// Nearest-rank percentile; 0 for an empty sample set
fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

fn utilization(usage: PoolUsage, end_time: f64) -> f64 {
    if usage.capacity == 0 || end_time <= 0.0 {
        0.0
    } else {
        usage.busy_time / (usage.capacity as f64 * end_time)
    }
}
