//! Orchestrator Engine
//!
//! Drives an [`Intersection`] from a command list and keeps the run-level
//! bookkeeping the intersection itself does not care about:
//! - Arrival stamping (a vehicle arrives at the number of steps run so far)
//! - Wait times of released vehicles, attributed to the current phase
//! - Per-step statuses (ids of the vehicles that left)
//! - Aggregate statistics
//! - Trace collection (when enabled)
//!
//! # Architecture
//!
//! ```text
//! For each command:
//!   addVehicle → stamp arrival step, count per approach, admit to intersection
//!   step       → intersection.step()
//!                record wait of every released vehicle (global + current phase)
//!                append step status
//!                drain trace events into the run log
//! ```
//!
//! # Example
//!
//! ```rust
//! use signal_control_core::commands::Command;
//! use signal_control_core::{Direction, Orchestrator, SignalConfig, VehicleClass};
//!
//! let mut orchestrator = Orchestrator::new(SignalConfig::default()).unwrap();
//! orchestrator.execute_commands(&[
//!     Command::add_vehicle("v1", Direction::North, Direction::South, VehicleClass::Normal),
//!     Command::Step,
//! ]);
//!
//! let stats = orchestrator.statistics();
//! assert_eq!(stats.vehicles_left, 1);
//! assert_eq!(stats.average_wait_time, 1.0);
//! ```

use super::report::{
    phase_key, DirectionCounts, MaxWaitTime, RunStatistics, SimulationResult, StepStatus,
};
use crate::commands::{parse_commands, Command, CommandError};
use crate::config::{ConfigError, SignalConfig};
use crate::intersection::{Intersection, StepOutcome};
use crate::models::{Direction, EventLog, MovementId, TraceSink, Vehicle, VehicleClass};
use crate::policy::SignalController;
use log::{debug, info, log_enabled, Level};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors that abort a run before (or instead of) executing it
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("invalid commands: {0}")]
    InvalidCommands(#[from] CommandError),
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Run-level driver around one intersection
pub struct Orchestrator {
    intersection: Intersection,

    step_statuses: Vec<StepStatus>,

    /// Trace events of the whole run (empty unless tracing is enabled)
    event_log: EventLog,

    total_vehicles: usize,
    vehicles_left: usize,
    total_wait_left: u64,
    max_wait_left: usize,
    vehicles_per_direction: DirectionCounts,
}

impl Orchestrator {
    /// Create an orchestrator with the actuated controller
    ///
    /// # Arguments
    ///
    /// * `config` - Signal timing, weights and release cap
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Intersection built, no step run yet
    /// * `Err(SimulationError::InvalidConfig)` - Configuration failed validation
    pub fn new(config: SignalConfig) -> Result<Self, SimulationError> {
        let intersection = Intersection::new(&config)?;
        Ok(Self::from_intersection(intersection, &config))
    }

    /// Create an orchestrator around a caller-supplied controller
    pub fn with_controller(
        config: SignalConfig,
        controller: Box<dyn SignalController>,
    ) -> Result<Self, SimulationError> {
        let intersection = Intersection::with_controller(&config, controller)?;
        Ok(Self::from_intersection(intersection, &config))
    }

    fn from_intersection(intersection: Intersection, config: &SignalConfig) -> Self {
        info!(
            "intersection ready: yellow={} fairness_cap={} vehicles_per_step={} weights=({}, {}, {})",
            config.yellow_duration,
            config.fairness_cap,
            config.vehicles_per_step,
            config.alpha,
            config.beta,
            config.gamma
        );

        Self {
            intersection,
            step_statuses: Vec::new(),
            event_log: EventLog::disabled(),
            total_vehicles: 0,
            vehicles_left: 0,
            total_wait_left: 0,
            max_wait_left: 0,
            vehicles_per_direction: DirectionCounts::default(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Steps executed so far
    pub fn current_step(&self) -> usize {
        self.intersection.current_step()
    }

    pub fn intersection(&self) -> &Intersection {
        &self.intersection
    }

    pub fn step_statuses(&self) -> &[StepStatus] {
        &self.step_statuses
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Record the decision trace of subsequent steps
    pub fn set_tracing(&mut self, enabled: bool) {
        self.intersection.set_tracing(enabled);
        self.event_log.set_enabled(enabled);
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Admit a vehicle arriving now
    ///
    /// Returns the movement queue it joined.
    pub fn admit_vehicle(
        &mut self,
        id: impl Into<String>,
        origin: Direction,
        destination: Direction,
        class: VehicleClass,
    ) -> MovementId {
        let vehicle = Vehicle::new(id, origin, destination, self.current_step(), class);
        self.total_vehicles += 1;
        self.vehicles_per_direction.increment(origin);
        self.intersection.admit(vehicle)
    }

    /// Execute one step and record its outcome
    pub fn step(&mut self) -> StepOutcome {
        let outcome = self.intersection.step();

        let mut left_vehicles = Vec::with_capacity(outcome.released.len());
        for vehicle in &outcome.released {
            let wait = vehicle.wait_at(outcome.step);
            self.vehicles_left += 1;
            self.total_wait_left += wait as u64;
            self.max_wait_left = self.max_wait_left.max(wait);
            self.intersection.controller_mut().record_departure(wait);
            left_vehicles.push(vehicle.id().to_string());
        }

        if log_enabled!(Level::Debug) {
            debug!(
                "step {}: phase={:?} granted={:?} left={:?} waiting={}",
                outcome.step,
                self.intersection.controller().current_phase(),
                outcome.granted,
                left_vehicles,
                self.intersection.vehicles_waiting()
            );
        }
        for event in self.intersection.drain_events() {
            debug!("{}", event);
            self.event_log.record(event);
        }

        self.step_statuses.push(StepStatus { left_vehicles });
        outcome
    }

    pub fn execute(&mut self, command: &Command) {
        match command {
            Command::AddVehicle {
                vehicle_id,
                start_road,
                end_road,
                vehicle_type,
            } => {
                self.admit_vehicle(vehicle_id.clone(), *start_road, *end_road, *vehicle_type);
            }
            Command::Step => {
                self.step();
            }
        }
    }

    /// Apply commands in order
    pub fn execute_commands(&mut self, commands: &[Command]) {
        for command in commands {
            self.execute(command);
        }
        info!(
            "executed {} commands: {} steps, {} vehicles left, {} waiting",
            commands.len(),
            self.current_step(),
            self.vehicles_left,
            self.intersection.vehicles_waiting()
        );
    }

    /// Parse a command document and apply it
    pub fn execute_json(&mut self, json: &str) -> Result<(), SimulationError> {
        let commands = parse_commands(json)?;
        self.execute_commands(&commands);
        Ok(())
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            step_statuses: self.step_statuses.clone(),
        }
    }

    /// Aggregate statistics as of now
    ///
    /// Safe to call mid-run; a phase still holding green contributes its
    /// running green time to its duration.
    pub fn statistics(&self) -> RunStatistics {
        let now = self.current_step();
        let max_remaining = self
            .intersection
            .queues()
            .iter()
            .flat_map(|queue| queue.vehicles())
            .map(|vehicle| vehicle.wait_at(now))
            .max()
            .unwrap_or(0);

        let average_wait_time = if self.vehicles_left == 0 {
            0.0
        } else {
            self.total_wait_left as f64 / self.vehicles_left as f64
        };

        let phases = self
            .intersection
            .controller()
            .phase_reports()
            .into_iter()
            .enumerate()
            .map(|(index, report)| (phase_key(index), report))
            .collect();

        RunStatistics {
            total_vehicles: self.total_vehicles,
            vehicles_left: self.vehicles_left,
            vehicles_remaining: self.total_vehicles - self.vehicles_left,
            average_wait_time,
            max_wait_time: MaxWaitTime {
                left: self.max_wait_left,
                remaining: max_remaining,
            },
            total_steps: now,
            phases,
            vehicles_per_direction: self.vehicles_per_direction,
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("intersection", &self.intersection)
            .field("total_vehicles", &self.total_vehicles)
            .field("vehicles_left", &self.vehicles_left)
            .finish()
    }
}
