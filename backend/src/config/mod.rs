//! Controller configuration
//!
//! One explicit [`SignalConfig`] value is built (or loaded) before the run
//! and handed to every component that needs part of it. Nothing reads
//! configuration through global state.
//!
//! JSON files only need the keys they override; every other key keeps its
//! default:
//!
//! ```json
//! {
//!   "yellowDuration": 2,
//!   "fairnessCap": 10,
//!   "lanePriorities": { "north": { "straight": 3.0 } },
//!   "phases": [
//!     { "minGreen": 2, "maxGreen": 6 },
//!     { "minGreen": 2, "maxGreen": 6 },
//!     { "minGreen": 1, "maxGreen": 3 },
//!     { "minGreen": 1, "maxGreen": 3 }
//!   ]
//! }
//! ```

use crate::models::direction::{Direction, MovementKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Number of phases in the four-way layout
pub const PHASE_COUNT: usize = 4;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config: {field} {reason}")]
    Invalid { field: String, reason: String },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Green-time bounds for one phase, in steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhaseTiming {
    pub min_green: usize,
    pub max_green: usize,
}

impl PhaseTiming {
    pub fn new(min_green: usize, max_green: usize) -> Self {
        Self {
            min_green,
            max_green,
        }
    }
}

impl Default for PhaseTiming {
    fn default() -> Self {
        Self::new(2, 5)
    }
}

/// Base priorities of the two movements on one approach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApproachPriority {
    #[serde(alias = "LEFT")]
    pub left: f64,
    #[serde(alias = "STRAIGHT")]
    pub straight: f64,
}

impl Default for ApproachPriority {
    fn default() -> Self {
        Self {
            left: 1.0,
            straight: 1.0,
        }
    }
}

/// Complete controller configuration
///
/// # Example
/// ```
/// use signal_control_core::SignalConfig;
///
/// let config = SignalConfig::from_json_str(r#"{ "fairnessCap": 3 }"#).unwrap();
/// assert_eq!(config.fairness_cap, 3);
/// assert_eq!(config.yellow_duration, 1); // default kept
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SignalConfig {
    /// Steps a signal stays yellow, and steps of all-red clearance between phases
    pub yellow_duration: usize,

    /// Weight of accumulated waiting time (pressure)
    pub alpha: f64,

    /// Weight of the number of waiting vehicles
    pub beta: f64,

    /// Weight of steps since a phase was last current
    pub gamma: f64,

    /// Steps a phase may go unserved before a forced switch is considered
    pub fairness_cap: usize,

    /// Priority added per bus waiting in a queue
    pub bus_priority: f64,

    /// Base priority per approach; missing approaches use 1.0
    pub lane_priorities: BTreeMap<Direction, ApproachPriority>,

    /// Green bounds for NS-straight, EW-straight, NS-left, EW-left
    pub phases: Vec<PhaseTiming>,

    /// Vehicles released per green queue per step
    pub vehicles_per_step: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            yellow_duration: 1,
            alpha: 2.0,
            beta: 1.0,
            gamma: 1.0,
            fairness_cap: 30,
            bus_priority: 2.0,
            lane_priorities: Direction::ALL
                .iter()
                .map(|d| (*d, ApproachPriority::default()))
                .collect(),
            phases: vec![PhaseTiming::default(); PHASE_COUNT],
            vehicles_per_step: 1,
        }
    }
}

impl SignalConfig {
    /// Parse JSON over the defaults, then validate
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SignalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON file over the defaults, then validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Base priority of one movement
    pub fn lane_priority(&self, direction: Direction, kind: MovementKind) -> f64 {
        let approach = self
            .lane_priorities
            .get(&direction)
            .copied()
            .unwrap_or_default();
        match kind {
            MovementKind::Left => approach.left,
            MovementKind::Straight => approach.straight,
        }
    }

    /// Set every phase to the same bounds
    pub fn with_uniform_phases(mut self, min_green: usize, max_green: usize) -> Self {
        self.phases = vec![PhaseTiming::new(min_green, max_green); PHASE_COUNT];
        self
    }

    /// Check every value is in range
    ///
    /// Called by every constructor that takes a config, so a component is
    /// never built from a bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.yellow_duration == 0 {
            return Err(ConfigError::invalid("yellowDuration", "must be > 0"));
        }

        if self.fairness_cap == 0 {
            return Err(ConfigError::invalid("fairnessCap", "must be > 0"));
        }

        if self.vehicles_per_step == 0 {
            return Err(ConfigError::invalid("vehiclesPerStep", "must be > 0"));
        }

        for (name, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
            ("busPriority", self.bus_priority),
        ] {
            check_weight(name, value)?;
        }

        for (direction, approach) in &self.lane_priorities {
            check_weight(
                &format!("lanePriorities.{}.left", direction),
                approach.left,
            )?;
            check_weight(
                &format!("lanePriorities.{}.straight", direction),
                approach.straight,
            )?;
        }

        if self.phases.len() != PHASE_COUNT {
            return Err(ConfigError::invalid(
                "phases",
                format!("must list {} phases, got {}", PHASE_COUNT, self.phases.len()),
            ));
        }

        for (i, timing) in self.phases.iter().enumerate() {
            if timing.min_green > timing.max_green {
                return Err(ConfigError::invalid(
                    format!("phases[{}]", i),
                    format!(
                        "minGreen ({}) exceeds maxGreen ({})",
                        timing.min_green, timing.max_green
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn check_weight(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be a finite non-negative number, got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SignalConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_approach_defaults_to_one() {
        let mut config = SignalConfig::default();
        config.lane_priorities.clear();
        assert_eq!(config.lane_priority(Direction::East, MovementKind::Left), 1.0);
    }

    #[test]
    fn test_partial_approach_keeps_other_movement() {
        let config =
            SignalConfig::from_json_str(r#"{ "lanePriorities": { "NORTH": { "STRAIGHT": 4.0 } } }"#)
                .unwrap();
        assert_eq!(config.lane_priority(Direction::North, MovementKind::Straight), 4.0);
        assert_eq!(config.lane_priority(Direction::North, MovementKind::Left), 1.0);
        assert_eq!(config.lane_priority(Direction::South, MovementKind::Left), 1.0);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = SignalConfig {
            gamma: -1.0,
            ..SignalConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "gamma"
        ));
    }
}
