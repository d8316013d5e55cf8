use super::config::TieBreak;
use super::error::SimulationError;
use super::event::{Event, EventKind};
use std::collections::BinaryHeap;

/// Simulated clock plus the time-ordered set of pending events.
///
/// This is the primitive every other component schedules against. The clock
/// only advances by popping the earliest event, so simulated time is
/// monotone by construction. Ties are broken by insertion order (or by
/// fuel-type priority first, when so configured) to keep runs fully
/// deterministic for a fixed seed.
pub struct EventScheduler {
    event_queue: BinaryHeap<Event>,
    sequence_counter: u64,
    now: f64,
    tie_break: TieBreak,
}

impl EventScheduler {
    /// Create a scheduler at time zero with the given tie-break policy
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            now: 0.0,
            tie_break,
        }
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Insert an event keyed by (timestamp, tie-break rank, sequence).
    ///
    /// Scheduling into the past is a logic defect and fails with
    /// `Causality` rather than silently corrupting event order.
    pub fn schedule(&mut self, time: f64, kind: EventKind) -> Result<(), SimulationError> {
        if time < self.now {
            return Err(SimulationError::Causality {
                event_time: time,
                now: self.now,
            });
        }

        let rank = match self.tie_break {
            TieBreak::InsertionOrder => 0,
            TieBreak::FuelTypePriority => kind.fuel().index(),
        };

        self.event_queue.push(Event {
            time,
            rank,
            seq: self.sequence_counter,
            kind,
        });
        self.sequence_counter += 1;
        Ok(())
    }

    /// Remove and return the earliest event, advancing the clock to its
    /// timestamp. Popping an empty queue is a logic defect.
    pub fn pop_next(&mut self) -> Result<Event, SimulationError> {
        let event = self.event_queue.pop().ok_or(SimulationError::EmptyQueue)?;
        self.now = event.time;
        Ok(event)
    }

    /// Timestamp of the next event without removing it
    pub fn peek_time(&self) -> Option<f64> {
        self.event_queue.peek().map(|event| event.time)
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }
}
