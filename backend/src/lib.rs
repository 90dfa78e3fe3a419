//! Signal Control Core - Rust Engine
//!
//! Discrete-step simulation of a signal-controlled four-way intersection
//! with a demand-responsive phase scheduler and an independent safety
//! monitor.
//!
//! # Architecture
//!
//! - **core**: Step clock
//! - **models**: Domain types (Direction, Vehicle, Signal, MovementQueue, Phase, Event)
//! - **config**: Signal timing and weighting configuration
//! - **commands**: Command documents that drive a run
//! - **policy**: Signal controllers (actuated, fixed cycle)
//! - **safety**: Conflict monitor
//! - **intersection**: One simulation step
//! - **orchestrator**: Command loop and run statistics
//!
//! # Critical Invariants
//!
//! 1. After every audit at most one conflict group has a GREEN signal
//! 2. GREEN never goes straight to RED; it passes through YELLOW
//! 3. Queues are FIFO and their class counters match their contents
//! 4. Everything is deterministic: same config and commands, same run

// Module declarations
pub mod commands;
pub mod config;
pub mod core;
pub mod intersection;
pub mod models;
pub mod orchestrator;
pub mod policy;
pub mod safety;

// Re-exports for convenience
pub use commands::{load_commands, parse_commands, Command, CommandError};
pub use config::{ApproachPriority, ConfigError, PhaseTiming, SignalConfig, PHASE_COUNT};
pub use crate::core::time::StepClock;
pub use intersection::{Intersection, StepOutcome};
pub use models::{
    ConflictGroup, Direction, Event, EventLog, MovementId, MovementKind, MovementQueue,
    MovementQueues, MovementSet, NoTrace, Phase, Signal, SignalState, TraceSink, UnknownName,
    Vehicle, VehicleClass,
};
pub use orchestrator::{
    DirectionCounts, MaxWaitTime, Orchestrator, RunStatistics, SimulationError, SimulationResult,
    StepStatus,
};
pub use policy::{ActuatedController, FixedCycleController, PhaseReport, SignalController};
pub use safety::{AuditOutcome, ConflictMonitor};
