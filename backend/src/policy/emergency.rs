//! Emergency preemption queue
//!
//! Movements that received an emergency vehicle wait here, oldest first,
//! for exclusive green. The entry at the front is the one being served; it
//! is retired once its queue no longer holds an emergency vehicle.
//!
//! # Critical Invariants
//!
//! - No movement appears twice.
//! - When a movement is being served it is the front entry.

use crate::models::{Event, MovementId, MovementQueues, TraceSink};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct EmergencyQueue {
    pending: VecDeque<MovementId>,
    serving: Option<MovementId>,
}

impl EmergencyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `movement` unless it is already queued
    pub fn notify(&mut self, movement: MovementId) {
        if !self.pending.contains(&movement) {
            self.pending.push_back(movement);
        }
    }

    /// Movement to preempt for this step, if any
    ///
    /// Retires the served movement once its emergency vehicle has left, then
    /// adopts the first queued movement that still holds one, discarding
    /// stale entries on the way.
    pub fn update(
        &mut self,
        queues: &MovementQueues,
        step: usize,
        trace: &mut dyn TraceSink,
    ) -> Option<MovementId> {
        if let Some(movement) = self.serving {
            if !queues.get(movement).has_emergency_waiting() {
                self.pending.pop_front();
                self.serving = None;
                trace.record(Event::EmergencyRetired { step, movement });
            }
        }

        if self.serving.is_none() {
            while let Some(&candidate) = self.pending.front() {
                if queues.get(candidate).has_emergency_waiting() {
                    self.serving = Some(candidate);
                    break;
                }
                self.pending.pop_front();
                trace.record(Event::EmergencyDiscarded {
                    step,
                    movement: candidate,
                });
            }
        }

        if let Some(movement) = self.serving {
            trace.record(Event::EmergencyServing { step, movement });
        }
        self.serving
    }

    pub fn serving(&self) -> Option<MovementId> {
        self.serving
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, movement: MovementId) -> bool {
        self.pending.contains(&movement)
    }
}
