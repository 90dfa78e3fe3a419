//! Actuated (demand-responsive) controller
//!
//! Chooses among the four phases by weighted priority, bounded by a fairness
//! cap, with emergency preemption on top.
//!
//! # Per-step decision
//!
//! ```text
//! 1. Age every phase by one step
//! 2. Emergency: retire served queue if its vehicle left, adopt next valid one
//! 3. Emergency being served → grant exactly that queue, nothing else runs
//! 4. Clearance running     → count down, commit pending phase at zero, grant nothing
//! 5. Evaluate phases:
//!      pressure  = Σ waiting_time(q) × priority(q)
//!      vehicles  = Σ len(q) × priority(q)
//!      priority  = α·pressure + β·vehicles + γ·fairness_age
//!    fairness candidate = highest-pressure phase with age ≥ cap and demand
//! 6. Target = fairness candidate, else best other phase if
//!    min green met and (max green reached or it beats current)
//! 7. Switch only if target ≠ current and current met min green
//! 8. Switch → start clearance, outgoing phase keeps this step's grant
//! ```
//!
//! Step 7 also gates the fairness-forced switch: a phase whose minimum green
//! is longer than the fairness cap holds green past the cap until its minimum
//! is met.
//!
//! Fault recovery by the conflict monitor is invisible here; timers and
//! fairness ages carry on as if the phase had kept green.

use super::clearance::{ClearanceTick, ClearanceTimer};
use super::emergency::EmergencyQueue;
use super::{PhaseReport, SignalController};
use crate::config::{ConfigError, SignalConfig};
use crate::models::{
    ConflictGroup, Event, MovementId, MovementQueues, MovementSet, Phase, TraceSink,
};

/// Weighted-priority controller with fairness cap and emergency preemption
///
/// # Example
///
/// ```
/// use signal_control_core::{ActuatedController, MovementQueues, NoTrace, SignalConfig, SignalController};
///
/// let config = SignalConfig::default();
/// let mut controller = ActuatedController::new(&config).unwrap();
/// let queues = MovementQueues::new(config.bus_priority, config.yellow_duration, |d, k| {
///     config.lane_priority(d, k)
/// });
///
/// // Phase 0 (north/south straight) is current from the start
/// let green = controller.select_green_set(&queues, &mut NoTrace);
/// assert_eq!(green, controller.phases()[0].movements());
/// ```
#[derive(Debug, Clone)]
pub struct ActuatedController {
    phases: Vec<Phase>,
    current_phase: usize,
    clearance: ClearanceTimer,
    yellow_duration: usize,
    /// Steps since each phase was last current
    fairness_age: Vec<usize>,
    /// Decisions taken so far; also the "now" used for waiting times
    current_step: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
    fairness_cap: usize,
    emergency: EmergencyQueue,
}

/// Score breakdown of one phase
#[derive(Debug, Clone, Copy)]
struct PhaseScore {
    pressure: f64,
    priority: f64,
}

impl ActuatedController {
    /// Build the four standard phases from `config`
    ///
    /// Phase order is NS-straight, EW-straight, NS-left, EW-left. Phase 0
    /// starts current and counts as activated once.
    pub fn new(config: &SignalConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let phases: Vec<Phase> = ConflictGroup::ALL
            .iter()
            .zip(&config.phases)
            .map(|(group, timing)| Phase::for_group(*group, timing.min_green, timing.max_green))
            .collect();

        let mut controller = Self {
            fairness_age: vec![0; phases.len()],
            phases,
            current_phase: 0,
            clearance: ClearanceTimer::new(),
            yellow_duration: config.yellow_duration,
            current_step: 0,
            alpha: config.alpha,
            beta: config.beta,
            gamma: config.gamma,
            fairness_cap: config.fairness_cap,
            emergency: EmergencyQueue::new(),
        };
        controller.phases[0].record_activation();
        Ok(controller)
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn current_phase_index(&self) -> usize {
        self.current_phase
    }

    /// Phase waiting for clearance to finish, if a switch is in progress
    pub fn pending_phase(&self) -> Option<usize> {
        self.clearance.pending()
    }

    pub fn fairness_age(&self, phase: usize) -> usize {
        self.fairness_age[phase]
    }

    /// Movement being served under emergency preemption
    pub fn emergency_serving(&self) -> Option<MovementId> {
        self.emergency.serving()
    }

    pub fn emergency_queue(&self) -> &EmergencyQueue {
        &self.emergency
    }

    fn pressure(&self, phase: &Phase, queues: &MovementQueues) -> f64 {
        phase
            .movements()
            .iter()
            .map(|m| {
                let queue = queues.get(m);
                queue.total_waiting_time(self.current_step) as f64 * queue.effective_priority()
            })
            .sum()
    }

    fn score(&self, index: usize, queues: &MovementQueues) -> PhaseScore {
        let phase = &self.phases[index];
        let pressure = self.pressure(phase, queues);
        let vehicles_waiting: f64 = phase
            .movements()
            .iter()
            .map(|m| {
                let queue = queues.get(m);
                queue.len() as f64 * queue.effective_priority()
            })
            .sum();
        let fairness = self.fairness_age[index] as f64;

        PhaseScore {
            pressure,
            priority: self.alpha * pressure + self.beta * vehicles_waiting + self.gamma * fairness,
        }
    }

    fn has_demand(phase: &Phase, queues: &MovementQueues) -> bool {
        phase.movements().iter().any(|m| !queues.get(m).is_empty())
    }

    fn commit_phase(&mut self, index: usize) {
        self.current_phase = index;
        let phase = &mut self.phases[index];
        phase.reset_green_timer();
        phase.record_activation();
        self.fairness_age[index] = 0;
    }
}

impl SignalController for ActuatedController {
    fn select_green_set(
        &mut self,
        queues: &MovementQueues,
        trace: &mut dyn TraceSink,
    ) -> MovementSet {
        self.current_step += 1;
        for age in &mut self.fairness_age {
            *age += 1;
        }
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
                self.commit_phase(next);
                trace.record(Event::PhaseCommitted { step, phase: next });
                return MovementSet::empty();
            }
        }

        let current = self.current_phase;
        self.fairness_age[current] = 0;
        self.phases[current].increment_green_timer();

        let current_priority = self.score(current, queues).priority;
        let mut best_other_priority = current_priority;
        let mut best_other = current;

        let mut fairness_candidate: Option<usize> = None;
        let mut max_fairness_pressure = -1.0;

        for index in 0..self.phases.len() {
            let score = self.score(index, queues);
            let age = self.fairness_age[index];

            if age >= self.fairness_cap
                && Self::has_demand(&self.phases[index], queues)
                && score.pressure > max_fairness_pressure
            {
                max_fairness_pressure = score.pressure;
                fairness_candidate = Some(index);
            }

            if index != current && score.priority > best_other_priority {
                best_other_priority = score.priority;
                best_other = index;
            }

            trace.record(Event::PhaseEvaluated {
                step,
                phase: index,
                priority: score.priority,
                pressure: score.pressure,
                green_time: self.phases[index].green_time(),
                fairness_age: age,
            });
        }

        let min_reached = self.phases[current].is_min_green_satisfied();
        let max_reached = self.phases[current].is_max_green_exceeded();
        let switch_by_priority = best_other != current && best_other_priority > current_priority;

        let target = if let Some(forced) = fairness_candidate {
            trace.record(Event::FairnessForced {
                step,
                phase: forced,
            });
            Some(forced)
        } else if min_reached && (max_reached || switch_by_priority) {
            Some(best_other)
        } else {
            None
        };

        match target {
            Some(to) if to != current && min_reached => {
                let outgoing = &mut self.phases[current];
                let served = outgoing.green_time();
                outgoing.add_to_cumulative_duration(served);
                self.clearance.start(to, self.yellow_duration);
                trace.record(Event::PhaseSwitch {
                    step,
                    from: current,
                    to,
                });
            }
            _ => trace.record(Event::PhaseHeld {
                step,
                phase: current,
            }),
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
                // The outgoing phase's green was already banked when the switch committed
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
