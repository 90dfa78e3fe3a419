//! Yellow-clearance countdown between phases
//!
//! When a controller commits a switch, the outgoing phase keeps its grant
//! for that step. The following `duration` steps grant nothing; on the last
//! of them the pending phase becomes current.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceTick {
    /// No clearance running
    Idle,
    /// Clearance running, this many steps left after the current one
    Waiting(usize),
    /// Clearance finished this step; the contained phase is now current
    Finished(usize),
}

#[derive(Debug, Clone, Default)]
pub struct ClearanceTimer {
    remaining: usize,
    next_phase: Option<usize>,
}

impl ClearanceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin clearance towards `next_phase`
    pub fn start(&mut self, next_phase: usize, duration: usize) {
        self.remaining = duration;
        self.next_phase = Some(next_phase);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Phase waiting for clearance to finish
    pub fn pending(&self) -> Option<usize> {
        self.next_phase
    }

    /// Consume one step of clearance
    pub fn tick(&mut self) -> ClearanceTick {
        if self.remaining == 0 {
            return ClearanceTick::Idle;
        }
        self.remaining -= 1;
        if self.remaining > 0 {
            return ClearanceTick::Waiting(self.remaining);
        }
        match self.next_phase.take() {
            Some(next) => ClearanceTick::Finished(next),
            None => ClearanceTick::Waiting(0),
        }
    }
}
