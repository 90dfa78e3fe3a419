//! Orchestrator - command-driven run loop
//!
//! See `engine.rs` for the loop and `report.rs` for the output documents.

pub mod engine;
pub mod report;

pub use engine::{Orchestrator, SimulationError};
pub use report::{DirectionCounts, MaxWaitTime, RunStatistics, SimulationResult, StepStatus};
