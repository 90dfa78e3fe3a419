//! Signal phase
//!
//! A phase is a fixed group of mutually compatible movements that may show
//! green together, plus its green-time bounds. It holds no decision logic:
//! the controller drives the timers and the phase only records statistics.

use crate::models::direction::{ConflictGroup, MovementSet};
use serde::{Deserialize, Serialize};

/// Group of compatible movements with timing bounds and run statistics
///
/// # Example
/// ```
/// use signal_control_core::{ConflictGroup, Phase};
///
/// let mut phase = Phase::new(ConflictGroup::NsStraight.members(), 2, 5);
/// phase.increment_green_timer();
/// assert!(!phase.is_min_green_satisfied());
/// phase.increment_green_timer();
/// assert!(phase.is_min_green_satisfied());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    movements: MovementSet,
    min_green: usize,
    max_green: usize,

    /// Steps of green in the current activation
    green_time: usize,
    times_activated: usize,
    /// Green steps summed over finished activations
    total_duration: usize,
    /// Wait summed over vehicles released while this phase was current
    total_wait_time: u64,
    vehicles_released: usize,
}

impl Phase {
    pub fn new(movements: MovementSet, min_green: usize, max_green: usize) -> Self {
        Self {
            movements,
            min_green,
            max_green,
            green_time: 0,
            times_activated: 0,
            total_duration: 0,
            total_wait_time: 0,
            vehicles_released: 0,
        }
    }

    /// Phase serving exactly the members of `group`
    pub fn for_group(group: ConflictGroup, min_green: usize, max_green: usize) -> Self {
        Self::new(group.members(), min_green, max_green)
    }

    pub fn movements(&self) -> MovementSet {
        self.movements
    }

    pub fn min_green(&self) -> usize {
        self.min_green
    }

    pub fn max_green(&self) -> usize {
        self.max_green
    }

    pub fn reset_green_timer(&mut self) {
        self.green_time = 0;
    }

    pub fn increment_green_timer(&mut self) {
        self.green_time += 1;
    }

    pub fn record_activation(&mut self) {
        self.times_activated += 1;
    }

    pub fn add_to_cumulative_duration(&mut self, steps: usize) {
        self.total_duration += steps;
    }

    /// Record a vehicle released while this phase held green
    pub fn record_departure(&mut self, wait_time: usize) {
        self.total_wait_time += wait_time as u64;
        self.vehicles_released += 1;
    }

    pub fn is_min_green_satisfied(&self) -> bool {
        self.green_time >= self.min_green
    }

    pub fn is_max_green_exceeded(&self) -> bool {
        self.green_time >= self.max_green
    }

    pub fn green_time(&self) -> usize {
        self.green_time
    }

    pub fn times_activated(&self) -> usize {
        self.times_activated
    }

    pub fn total_duration(&self) -> usize {
        self.total_duration
    }

    pub fn vehicles_released(&self) -> usize {
        self.vehicles_released
    }

    /// Mean green length per activation (0.0 if never activated)
    pub fn average_duration(&self) -> f64 {
        if self.times_activated == 0 {
            0.0
        } else {
            self.total_duration as f64 / self.times_activated as f64
        }
    }

    /// Mean wait of vehicles released under this phase (0.0 if none)
    pub fn average_wait_time(&self) -> f64 {
        if self.vehicles_released == 0 {
            0.0
        } else {
            self.total_wait_time as f64 / self.vehicles_released as f64
        }
    }
}
