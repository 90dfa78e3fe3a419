//! Safety Module
//!
//! Independent audit of the signal states the controller produced.
//!
//! # Critical Invariants
//!
//! 1. **Exclusive green**: after every audit at most one conflict group has a
//!    GREEN signal
//! 2. **Bounded fault**: a detected conflict leaves every signal BLINKING for
//!    the rest of that step; the next step starts from all RED
//! 3. **Independence**: the monitor reads signal states only; it trusts
//!    nothing the controller reports about itself

pub mod conflict_monitor;

// Re-export public API
pub use conflict_monitor::{active_conflict_groups, AuditOutcome, ConflictMonitor};
