//! Signal Controller Module
//!
//! This module defines the scheduling interface the intersection calls once
//! per step to learn which movements should be green.
//!
//! # Overview
//!
//! The intersection owns the signals and the queues; a controller only
//! *decides*. Each step it is shown the current queues and returns the set
//! of movements it wants green. The intersection turns that set into signal
//! transitions and the conflict monitor audits the result, so a faulty
//! controller can never leave two conflicting movements green for more than
//! one step.
//!
//! # Controller Interface
//!
//! All controllers implement the `SignalController` trait:
//! ```rust
//! use signal_control_core::models::{MovementId, MovementQueues, MovementSet, TraceSink};
//! use signal_control_core::policy::SignalController;
//!
//! struct AllRed;
//!
//! impl SignalController for AllRed {
//!     fn select_green_set(
//!         &mut self,
//!         _queues: &MovementQueues,
//!         _trace: &mut dyn TraceSink,
//!     ) -> MovementSet {
//!         MovementSet::empty()
//!     }
//!
//!     fn notify_emergency_arrival(&mut self, _movement: MovementId) {}
//! }
//! ```
//!
//! Available controllers:
//! 1. **Actuated**: weighted priority, fairness cap, emergency preemption
//! 2. **FixedCycle**: rotates phases on their maximum green, ignores demand

use crate::models::{MovementId, MovementQueues, MovementSet, Phase, TraceSink};
use serde::{Deserialize, Serialize};

pub mod actuated;
pub mod clearance;
pub mod emergency;
pub mod fixed_cycle;

pub use actuated::ActuatedController;
pub use clearance::{ClearanceTimer, ClearanceTick};
pub use emergency::EmergencyQueue;
pub use fixed_cycle::FixedCycleController;

/// Per-phase statistics exposed to reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseReport {
    pub times_activated: usize,
    pub total_duration: usize,
    #[serde(rename = "avgDuration")]
    pub average_duration: f64,
    #[serde(rename = "avgWaitTime")]
    pub average_wait_time: f64,
}

impl PhaseReport {
    /// Report for `phase`, counting `running_green` extra steps of an
    /// activation that has not been closed yet
    pub fn from_phase(phase: &Phase, running_green: usize) -> Self {
        let total_duration = phase.total_duration() + running_green;
        let average_duration = if phase.times_activated() == 0 {
            0.0
        } else {
            total_duration as f64 / phase.times_activated() as f64
        };
        Self {
            times_activated: phase.times_activated(),
            total_duration,
            average_duration,
            average_wait_time: phase.average_wait_time(),
        }
    }
}

/// Decides which movements are green each step
///
/// Implementations must be deterministic: the same queue contents and
/// notification history always yield the same grants.
pub trait SignalController {
    /// Movements that should be green for the step being executed
    ///
    /// Called exactly once per step, after yellow decay and before the
    /// signal transitions are applied.
    fn select_green_set(&mut self, queues: &MovementQueues, trace: &mut dyn TraceSink)
        -> MovementSet;

    /// An emergency vehicle joined `movement`
    ///
    /// Repeated notifications for a movement that is already waiting for
    /// service must be ignored.
    fn notify_emergency_arrival(&mut self, movement: MovementId);

    /// Index of the phase currently holding (or owning) green, if the
    /// controller works in phases
    fn current_phase(&self) -> Option<usize> {
        None
    }

    /// A vehicle left with `wait_time` steps of waiting while the current
    /// phase was active
    fn record_departure(&mut self, _wait_time: usize) {}

    /// Statistics per phase, in phase index order
    fn phase_reports(&self) -> Vec<PhaseReport> {
        Vec::new()
    }
}
