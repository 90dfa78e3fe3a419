//! Fixed-cycle controller
//!
//! Baseline controller: serves the phases in index order, each for its
//! configured maximum green, with the usual clearance between phases.
//! Queue contents are ignored except for emergency preemption, which works
//! exactly as in the actuated controller.
//!
//! # Use Case
//!
//! - Baseline for comparison with the actuated controller
//! - Predictable grants for intersection tests

use super::clearance::{ClearanceTick, ClearanceTimer};
use super::emergency::EmergencyQueue;
use super::{PhaseReport, SignalController};
use crate::config::{ConfigError, SignalConfig};
use crate::models::{
    ConflictGroup, Event, MovementId, MovementQueues, MovementSet, Phase, TraceSink,
};

/// Round-robin controller on fixed green lengths
///
/// # Example
///
/// ```
/// use signal_control_core::{FixedCycleController, MovementQueues, NoTrace, SignalConfig, SignalController};
///
/// let config = SignalConfig::default().with_uniform_phases(1, 2);
/// let mut controller = FixedCycleController::new(&config).unwrap();
/// let queues = MovementQueues::new(2.0, 1, |_, _| 1.0);
///
/// controller.select_green_set(&queues, &mut NoTrace);
/// controller.select_green_set(&queues, &mut NoTrace); // green length reached
/// assert!(controller.select_green_set(&queues, &mut NoTrace).is_empty()); // clearance
/// assert_eq!(controller.current_phase(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct FixedCycleController {
    phases: Vec<Phase>,
    current_phase: usize,
    clearance: ClearanceTimer,
    yellow_duration: usize,
    current_step: usize,
    emergency: EmergencyQueue,
}

impl FixedCycleController {
    pub fn new(config: &SignalConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut phases: Vec<Phase> = ConflictGroup::ALL
            .iter()
            .zip(&config.phases)
            .map(|(group, timing)| Phase::for_group(*group, timing.min_green, timing.max_green))
            .collect();
        phases[0].record_activation();

        Ok(Self {
            phases,
            current_phase: 0,
            clearance: ClearanceTimer::new(),
            yellow_duration: config.yellow_duration,
            current_step: 0,
            emergency: EmergencyQueue::new(),
        })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }
}

impl SignalController for FixedCycleController {
    fn select_green_set(
        &mut self,
        queues: &MovementQueues,
        trace: &mut dyn TraceSink,
    ) -> MovementSet {
        self.current_step += 1;
        let step = self.current_step;

        if let Some(movement) = self.emergency.update(queues, step, trace) {
            return MovementSet::single(movement);
        }

        match self.clearance.tick() {
            ClearanceTick::Idle => {}
            ClearanceTick::Waiting(remaining) => {
                trace.record(Event::ClearanceTick { step, remaining });
                return MovementSet::empty();
            }
            ClearanceTick::Finished(next) => {
                self.current_phase = next;
                self.phases[next].reset_green_timer();
                self.phases[next].record_activation();
                trace.record(Event::PhaseCommitted { step, phase: next });
                return MovementSet::empty();
            }
        }

        let current = self.current_phase;
        let phase = &mut self.phases[current];
        phase.increment_green_timer();

        if phase.is_max_green_exceeded() {
            let served = phase.green_time();
            phase.add_to_cumulative_duration(served);
            let next = (current + 1) % self.phases.len();
            self.clearance.start(next, self.yellow_duration);
            trace.record(Event::PhaseSwitch {
                step,
                from: current,
                to: next,
            });
        } else {
            trace.record(Event::PhaseHeld {
                step,
                phase: current,
            });
        }

        self.phases[current].movements()
    }

    fn notify_emergency_arrival(&mut self, movement: MovementId) {
        self.emergency.notify(movement);
    }

    fn current_phase(&self) -> Option<usize> {
        Some(self.current_phase)
    }

    fn record_departure(&mut self, wait_time: usize) {
        self.phases[self.current_phase].record_departure(wait_time);
    }

    fn phase_reports(&self) -> Vec<PhaseReport> {
        self.phases
            .iter()
            .enumerate()
            .map(|(index, phase)| {
                let running = if index == self.current_phase && self.clearance.pending().is_none() {
                    phase.green_time()
                } else {
                    0
                };
                PhaseReport::from_phase(phase, running)
            })
            .collect()
    }
}
