use super::types::VehicleId;
use std::collections::VecDeque;

/// Outcome of a capacity request against a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// Capacity was free; the vehicle holds it from now on
    Granted,
    /// Pool is full; the vehicle was appended to the waiting queue
    Queued,
}

/// A finite, shareable resource: the pumps of one fuel type, or the shared
/// attendants.
///
/// Vehicles that cannot acquire capacity wait in FCFS order. The pool also
/// integrates busy time (in-use count x elapsed time) so utilization can be
/// computed at the end of the run. A pool with capacity 0 always queues,
/// which models an unavailable pump type.
#[derive(Debug)]
pub struct ResourcePool {
    capacity: usize,
    in_use: usize,
    waiting: VecDeque<VehicleId>,
    busy_area: f64,
    last_change: f64,
}

impl ResourcePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            in_use: 0,
            waiting: VecDeque::new(),
            busy_area: 0.0,
            last_change: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Grant capacity immediately if available, otherwise append the vehicle
    /// to the waiting queue.
    pub fn try_acquire(&mut self, vehicle: VehicleId, now: f64) -> Acquisition {
        if self.in_use < self.capacity {
            self.accumulate_busy(now);
            self.in_use += 1;
            debug_assert!(self.in_use <= self.capacity);
            Acquisition::Granted
        } else {
            debug_assert!(!self.waiting.contains(&vehicle));
            self.waiting.push_back(vehicle);
            Acquisition::Queued
        }
    }

    /// Free one unit of capacity. If vehicles are waiting, the head of the
    /// queue is granted the freed unit in the same instant and returned so
    /// the caller can start its service; the in-use count then never dips,
    /// which keeps the busy-time integral exact.
    pub fn release(&mut self, now: f64) -> Option<VehicleId> {
        debug_assert!(self.in_use > 0, "release without a matching acquire");
        match self.waiting.pop_front() {
            Some(next) => Some(next),
            None => {
                self.accumulate_busy(now);
                self.in_use -= 1;
                None
            }
        }
    }

    /// Busy time accumulated up to `until`, for the utilization metric
    pub fn busy_time(&self, until: f64) -> f64 {
        self.busy_area + self.in_use as f64 * (until - self.last_change)
    }

    fn accumulate_busy(&mut self, now: f64) {
        self.busy_area += self.in_use as f64 * (now - self.last_change);
        self.last_change = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::VehicleId;

    #[test]
    fn test_grants_until_capacity_then_queues() {
        let mut pool = ResourcePool::new(2);
        assert_eq!(pool.try_acquire(VehicleId(1), 0.0), Acquisition::Granted);
        assert_eq!(pool.try_acquire(VehicleId(2), 0.0), Acquisition::Granted);
        assert_eq!(pool.try_acquire(VehicleId(3), 1.0), Acquisition::Queued);
        assert_eq!(pool.in_use(), 2);
        assert_eq!(pool.queue_len(), 1);
    }

    #[test]
    fn test_release_hands_capacity_to_queue_head() {
        let mut pool = ResourcePool::new(1);
        pool.try_acquire(VehicleId(1), 0.0);
        pool.try_acquire(VehicleId(2), 0.0);
        pool.try_acquire(VehicleId(3), 0.5);

        assert_eq!(pool.release(2.0), Some(VehicleId(2)));
        assert_eq!(pool.release(4.0), Some(VehicleId(3)));
        assert_eq!(pool.release(5.0), None);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_zero_capacity_pool_always_queues() {
        let mut pool = ResourcePool::new(0);
        assert_eq!(pool.try_acquire(VehicleId(1), 0.0), Acquisition::Queued);
        assert_eq!(pool.try_acquire(VehicleId(2), 3.0), Acquisition::Queued);
        assert_eq!(pool.queue_len(), 2);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_busy_time_integration() {
        let mut pool = ResourcePool::new(2);
        pool.try_acquire(VehicleId(1), 0.0);
        pool.try_acquire(VehicleId(2), 1.0);
        // one unit busy over [0, 1), two over [1, 3)
        assert_eq!(pool.busy_time(3.0), 1.0 + 2.0 * 2.0);

        pool.release(3.0);
        // one unit busy over [3, 5)
        assert_eq!(pool.busy_time(5.0), 5.0 + 2.0);
    }

    #[test]
    fn test_busy_time_constant_while_queue_drains() {
        let mut pool = ResourcePool::new(1);
        pool.try_acquire(VehicleId(1), 0.0);
        pool.try_acquire(VehicleId(2), 0.0);
        pool.release(2.0); // head takes over, pool never idle
        pool.release(5.0);
        assert_eq!(pool.busy_time(5.0), 5.0);
    }
}
