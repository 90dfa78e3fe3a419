//! Step clock for the intersection
//!
//! The intersection operates in discrete steps. There is no wall-clock time:
//! a step is whatever the command stream says it is.

use serde::{Deserialize, Serialize};

/// Counts completed simulation steps
///
/// # Example
/// ```
/// use signal_control_core::StepClock;
///
/// let mut clock = StepClock::new();
/// assert_eq!(clock.current_step(), 0);
///
/// clock.advance();
/// assert_eq!(clock.current_step(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepClock {
    /// Steps completed since the run started
    current_step: usize,
}

impl StepClock {
    /// Create a clock positioned at step 0
    pub fn new() -> Self {
        Self { current_step: 0 }
    }

    /// Advance by one step
    pub fn advance(&mut self) {
        self.current_step += 1;
    }

    /// Number of steps completed so far
    ///
    /// Vehicles admitted now are stamped with this value as their arrival step.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Steps elapsed between `since` and now, saturating at zero
    ///
    /// # Example
    /// ```
    /// use signal_control_core::StepClock;
    ///
    /// let mut clock = StepClock::new();
    /// for _ in 0..5 {
    ///     clock.advance();
    /// }
    /// assert_eq!(clock.elapsed_since(2), 3);
    /// assert_eq!(clock.elapsed_since(9), 0);
    /// ```
    pub fn elapsed_since(&self, since: usize) -> usize {
        self.current_step.saturating_sub(since)
    }
}
