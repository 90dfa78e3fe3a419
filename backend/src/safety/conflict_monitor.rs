//! Conflict monitor (safety watchdog)
//!
//! # Fault sequence
//!
//! ```text
//! step n    : transitions leave two groups GREEN → audit sets all BLINKING, fault raised
//! step n+1  : recovery pass sets all RED, fault cleared; scheduling resumes
//! ```
//!
//! The monitor never tells the controller about a fault. Whatever green the
//! controller asks for on step n+1 is applied on top of the all-red reset.

use crate::models::{ConflictGroup, MovementQueues};

/// Result of an audit pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Signal states are safe (or a fault was already being handled)
    Clear,
    /// Several groups were green; every signal is now BLINKING
    ConflictDetected { active_groups: usize },
}

/// Number of conflict groups with at least one GREEN signal
pub fn active_conflict_groups(queues: &MovementQueues) -> usize {
    let mut active = [false; 4];
    for queue in queues.iter() {
        if queue.signal().is_green() {
            active[queue.id().conflict_group().index()] = true;
        }
    }
    ConflictGroup::ALL
        .iter()
        .filter(|group| active[group.index()])
        .count()
}

#[derive(Debug, Clone, Default)]
pub struct ConflictMonitor {
    blinking: bool,
}

impl ConflictMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between a detected conflict and the next recovery pass
    pub fn is_faulted(&self) -> bool {
        self.blinking
    }

    /// Recovery pass, run at the start of every step
    ///
    /// After a fault, forces every signal RED and clears the flag. Returns
    /// whether a recovery happened.
    pub fn before_step(&mut self, queues: &mut MovementQueues) -> bool {
        if !self.blinking {
            return false;
        }
        for queue in queues.iter_mut() {
            queue.signal_mut().set_red();
        }
        self.blinking = false;
        true
    }

    /// Audit pass, run after the controller's grants have been applied
    pub fn after_step(&mut self, queues: &mut MovementQueues) -> AuditOutcome {
        if self.blinking {
            return AuditOutcome::Clear;
        }
        let active_groups = active_conflict_groups(queues);
        if active_groups <= 1 {
            return AuditOutcome::Clear;
        }
        self.blinking = true;
        for queue in queues.iter_mut() {
            queue.signal_mut().set_blinking();
        }
        AuditOutcome::ConflictDetected { active_groups }
    }
}
