//! Decision trace for debugging and auditing.
//!
//! Every decision point in the controller and every safety action of the
//! intersection can emit one [`Event`]. Events go to a [`TraceSink`]; the
//! decision code never prints or logs on its own, so a run with tracing
//! disabled takes exactly the same decisions as one with tracing enabled.
//!
//! # Event Types
//!
//! - **Emergency**: preemption started, finished, or a stale entry discarded
//! - **Clearance**: yellow-clearance countdown and phase commit
//! - **Evaluation**: per-phase priority breakdown, forced/normal switch, hold
//! - **Safety**: conflict detected, fault recovery applied
//!
//! All events carry the 1-based number of the step being executed.
//!
//! # Example
//!
//! ```rust
//! use signal_control_core::models::{Event, EventLog, TraceSink};
//!
//! let mut log = EventLog::new();
//! log.record(Event::PhaseHeld { step: 3, phase: 0 });
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.events()[0].event_type(), "PhaseHeld");
//! ```

use crate::models::direction::MovementId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something the controller or safety monitor decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Event {
    /// A queue holding an emergency vehicle was granted exclusive green
    EmergencyServing { step: usize, movement: MovementId },

    /// The served emergency vehicle left; its queue was retired
    EmergencyRetired { step: usize, movement: MovementId },

    /// A queued emergency entry no longer had an emergency vehicle waiting
    EmergencyDiscarded { step: usize, movement: MovementId },

    /// Yellow clearance in progress; no movement is green this step
    ClearanceTick { step: usize, remaining: usize },

    /// Clearance finished and the pending phase became current
    PhaseCommitted { step: usize, phase: usize },

    /// Priority breakdown of one phase
    PhaseEvaluated {
        step: usize,
        phase: usize,
        priority: f64,
        pressure: f64,
        green_time: usize,
        fairness_age: usize,
    },

    /// A phase reached the fairness cap and was chosen as switch target
    FairnessForced { step: usize, phase: usize },

    /// Switch committed; clearance starts next step
    PhaseSwitch { step: usize, from: usize, to: usize },

    /// Current phase keeps green
    PhaseHeld { step: usize, phase: usize },

    /// More than one conflict group was green after the transitions
    ConflictDetected { step: usize, active_groups: usize },

    /// All signals forced to red after a blinking step
    FaultCleared { step: usize },
}

impl Event {
    /// Step number the event belongs to
    pub fn step(&self) -> usize {
        match self {
            Event::EmergencyServing { step, .. } => *step,
            Event::EmergencyRetired { step, .. } => *step,
            Event::EmergencyDiscarded { step, .. } => *step,
            Event::ClearanceTick { step, .. } => *step,
            Event::PhaseCommitted { step, .. } => *step,
            Event::PhaseEvaluated { step, .. } => *step,
            Event::FairnessForced { step, .. } => *step,
            Event::PhaseSwitch { step, .. } => *step,
            Event::PhaseHeld { step, .. } => *step,
            Event::ConflictDetected { step, .. } => *step,
            Event::FaultCleared { step } => *step,
        }
    }

    /// Short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::EmergencyServing { .. } => "EmergencyServing",
            Event::EmergencyRetired { .. } => "EmergencyRetired",
            Event::EmergencyDiscarded { .. } => "EmergencyDiscarded",
            Event::ClearanceTick { .. } => "ClearanceTick",
            Event::PhaseCommitted { .. } => "PhaseCommitted",
            Event::PhaseEvaluated { .. } => "PhaseEvaluated",
            Event::FairnessForced { .. } => "FairnessForced",
            Event::PhaseSwitch { .. } => "PhaseSwitch",
            Event::PhaseHeld { .. } => "PhaseHeld",
            Event::ConflictDetected { .. } => "ConflictDetected",
            Event::FaultCleared { .. } => "FaultCleared",
        }
    }

    /// Phase index if the event concerns one phase
    pub fn phase(&self) -> Option<usize> {
        match self {
            Event::PhaseCommitted { phase, .. } => Some(*phase),
            Event::PhaseEvaluated { phase, .. } => Some(*phase),
            Event::FairnessForced { phase, .. } => Some(*phase),
            Event::PhaseSwitch { to, .. } => Some(*to),
            Event::PhaseHeld { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::EmergencyServing { step, movement } => {
                write!(f, "[step {}] emergency green for {}", step, movement)
            }
            Event::EmergencyRetired { step, movement } => {
                write!(f, "[step {}] emergency cleared from {}", step, movement)
            }
            Event::EmergencyDiscarded { step, movement } => {
                write!(f, "[step {}] stale emergency entry {} dropped", step, movement)
            }
            Event::ClearanceTick { step, remaining } => {
                write!(f, "[step {}] clearance, {} step(s) left", step, remaining)
            }
            Event::PhaseCommitted { step, phase } => {
                write!(f, "[step {}] phase {} now current", step, phase)
            }
            Event::PhaseEvaluated {
                step,
                phase,
                priority,
                pressure,
                green_time,
                fairness_age,
            } => write!(
                f,
                "[step {}] phase {}: priority={:.2}, pressure={:.2}, timer={}, fairness={}",
                step, phase, priority, pressure, green_time, fairness_age
            ),
            Event::FairnessForced { step, phase } => {
                write!(f, "[step {}] fairness cap reached by phase {}", step, phase)
            }
            Event::PhaseSwitch { step, from, to } => {
                write!(f, "[step {}] switching phase {} -> {}", step, from, to)
            }
            Event::PhaseHeld { step, phase } => {
                write!(f, "[step {}] staying on phase {}", step, phase)
            }
            Event::ConflictDetected {
                step,
                active_groups,
            } => write!(
                f,
                "[step {}] conflict: {} groups green, all signals blinking",
                step, active_groups
            ),
            Event::FaultCleared { step } => {
                write!(f, "[step {}] fault recovery, all signals red", step)
            }
        }
    }
}

/// Receiver of trace events
pub trait TraceSink {
    fn record(&mut self, event: Event);
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn record(&mut self, _event: Event) {}
}

/// Event log for storing and querying trace events.
///
/// A disabled log accepts `record` calls and discards them.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
    disabled: bool,
}

impl EventLog {
    /// Create a new empty, enabled event log
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            disabled: false,
        }
    }

    /// Create a log that discards everything until enabled
    pub fn disabled() -> Self {
        Self {
            events: Vec::new(),
            disabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events for a specific step
    pub fn events_at_step(&self, step: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.step() == step).collect()
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Take all events recorded so far, leaving the log empty
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl TraceSink for EventLog {
    fn record(&mut self, event: Event) {
        if !self.disabled {
            self.events.push(event);
        }
    }
}
