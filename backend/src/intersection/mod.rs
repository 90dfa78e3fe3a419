//! Intersection - one simulation step
//!
//! Owns the eight movement queues (each with its signal), the controller
//! and the conflict monitor, and runs them in a fixed order every step:
//!
//! ```text
//! 1. Conflict monitor recovery pass (all RED after a fault)
//! 2. Yellow decay on every signal
//! 3. Controller decision → movements to be green
//! 4. Transitions: GREEN not granted → YELLOW, RED granted → GREEN
//! 5. Conflict monitor audit of the applied states
//! 6. Release up to `vehicles_per_step` vehicles from every GREEN queue
//! ```
//!
//! Release runs after the audit, so the step in which a conflict is
//! detected releases nothing from the conflicting queues (they are BLINKING
//! by then).

use crate::config::{ConfigError, SignalConfig};
use crate::core::time::StepClock;
use crate::models::{
    Event, EventLog, MovementId, MovementQueue, MovementQueues, MovementSet, SignalState,
    TraceSink, Vehicle,
};
use crate::policy::{ActuatedController, SignalController};
use crate::safety::{AuditOutcome, ConflictMonitor};
use log::warn;

/// What happened during one step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// 1-based number of the step that ran
    pub step: usize,

    /// Movements the controller asked to be green
    pub granted: MovementSet,

    /// Vehicles that left, in queue index order then FIFO order
    pub released: Vec<Vehicle>,

    /// The audit found conflicting greens this step
    pub conflict_detected: bool,

    /// The step began with a fault recovery (all signals forced RED)
    pub recovered_from_fault: bool,
}

/// A four-way intersection under one controller
pub struct Intersection {
    queues: MovementQueues,
    controller: Box<dyn SignalController>,
    monitor: ConflictMonitor,
    vehicles_per_step: usize,
    clock: StepClock,
    trace: EventLog,
}

impl Intersection {
    /// Intersection driven by an [`ActuatedController`] built from `config`
    ///
    /// # Example
    ///
    /// ```
    /// use signal_control_core::{Direction, Intersection, SignalConfig, Vehicle, VehicleClass};
    ///
    /// let mut intersection = Intersection::new(&SignalConfig::default()).unwrap();
    /// intersection.admit(Vehicle::new("v1", Direction::North, Direction::South, 0, VehicleClass::Normal));
    ///
    /// let outcome = intersection.step();
    /// assert_eq!(outcome.released.len(), 1);
    /// ```
    pub fn new(config: &SignalConfig) -> Result<Self, ConfigError> {
        let controller = ActuatedController::new(config)?;
        Self::with_controller(config, Box::new(controller))
    }

    /// Intersection driven by any controller
    ///
    /// `config` supplies the yellow duration, lane priorities, bus bonus and
    /// release cap; the controller was built separately.
    pub fn with_controller(
        config: &SignalConfig,
        controller: Box<dyn SignalController>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let queues = MovementQueues::new(config.bus_priority, config.yellow_duration, |d, k| {
            config.lane_priority(d, k)
        });

        Ok(Self {
            queues,
            controller,
            monitor: ConflictMonitor::new(),
            vehicles_per_step: config.vehicles_per_step,
            clock: StepClock::new(),
            trace: EventLog::disabled(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Steps completed so far
    pub fn current_step(&self) -> usize {
        self.clock.current_step()
    }

    pub fn queues(&self) -> &MovementQueues {
        &self.queues
    }

    pub fn queue(&self, movement: MovementId) -> &MovementQueue {
        self.queues.get(movement)
    }

    pub fn signal_state(&self, movement: MovementId) -> SignalState {
        self.queues.get(movement).signal().state()
    }

    pub fn controller(&self) -> &dyn SignalController {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> &mut dyn SignalController {
        self.controller.as_mut()
    }

    /// True while the intersection is blinking after a detected conflict
    pub fn is_faulted(&self) -> bool {
        self.monitor.is_faulted()
    }

    pub fn vehicles_waiting(&self) -> usize {
        self.queues.total_waiting()
    }

    // ========================================================================
    // Tracing
    // ========================================================================

    pub fn set_tracing(&mut self, enabled: bool) {
        self.trace.set_enabled(enabled);
    }

    pub fn event_log(&self) -> &EventLog {
        &self.trace
    }

    /// Take the trace events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.trace.drain()
    }

    // ========================================================================
    // Step
    // ========================================================================

    /// Put a vehicle into its movement queue
    ///
    /// Emergency vehicles also notify the controller. Returns the movement
    /// the vehicle joined.
    pub fn admit(&mut self, vehicle: Vehicle) -> MovementId {
        let movement = vehicle.movement();
        let emergency = vehicle.is_emergency();
        self.queues.get_mut(movement).enqueue(vehicle);
        if emergency {
            self.controller.notify_emergency_arrival(movement);
        }
        movement
    }

    /// Execute one step
    pub fn step(&mut self) -> StepOutcome {
        let step = self.clock.current_step() + 1;

        let recovered_from_fault = self.monitor.before_step(&mut self.queues);
        if recovered_from_fault {
            self.trace.record(Event::FaultCleared { step });
        }

        for queue in self.queues.iter_mut() {
            queue.signal_mut().step();
        }

        let granted = self
            .controller
            .select_green_set(&self.queues, &mut self.trace);

        self.apply_grants(granted);

        let conflict_detected = match self.monitor.after_step(&mut self.queues) {
            AuditOutcome::Clear => false,
            AuditOutcome::ConflictDetected { active_groups } => {
                warn!(
                    "step {}: {} conflicting movement groups green, forcing blink",
                    step, active_groups
                );
                self.trace.record(Event::ConflictDetected {
                    step,
                    active_groups,
                });
                true
            }
        };

        let released = self.release();
        self.clock.advance();

        StepOutcome {
            step,
            granted,
            released,
            conflict_detected,
            recovered_from_fault,
        }
    }

    fn apply_grants(&mut self, granted: MovementSet) {
        for queue in self.queues.iter_mut() {
            let wanted = granted.contains(queue.id());
            let signal = queue.signal_mut();
            match signal.state() {
                SignalState::Green if !wanted => signal.set_yellow(),
                SignalState::Red if wanted => signal.set_green(),
                _ => {}
            }
        }
    }

    fn release(&mut self) -> Vec<Vehicle> {
        let mut released = Vec::new();
        for queue in self.queues.iter_mut() {
            if !queue.signal().is_green() {
                continue;
            }
            for _ in 0..self.vehicles_per_step {
                match queue.dequeue() {
                    Some(vehicle) => released.push(vehicle),
                    None => break,
                }
            }
        }
        released
    }
}

impl std::fmt::Debug for Intersection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intersection")
            .field("current_step", &self.clock.current_step())
            .field("vehicles_waiting", &self.queues.total_waiting())
            .field("current_phase", &self.controller.current_phase())
            .field("faulted", &self.monitor.is_faulted())
            .finish()
    }
}
