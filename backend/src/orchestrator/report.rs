//! Run output: per-step statuses and aggregate statistics
//!
//! Both documents are plain serde structs so the CLI (or any caller) can
//! write them with `serde_json` directly. Key names are camelCase.

use crate::models::Direction;
use crate::policy::PhaseReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vehicles that left during one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStatus {
    pub left_vehicles: Vec<String>,
}

/// Per-step output of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub step_statuses: Vec<StepStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxWaitTime {
    /// Longest wait among vehicles that left
    pub left: usize,
    /// Longest wait so far among vehicles still queued
    pub remaining: usize,
}

/// Admissions per approach
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct DirectionCounts {
    pub north: usize,
    pub south: usize,
    pub east: usize,
    pub west: usize,
}

impl DirectionCounts {
    pub fn get(&self, direction: Direction) -> usize {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    pub fn increment(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north += 1,
            Direction::South => self.south += 1,
            Direction::East => self.east += 1,
            Direction::West => self.west += 1,
        }
    }
}

/// Aggregate statistics of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatistics {
    pub total_vehicles: usize,
    pub vehicles_left: usize,
    pub vehicles_remaining: usize,
    pub average_wait_time: f64,
    pub max_wait_time: MaxWaitTime,
    pub total_steps: usize,
    /// Keyed `Phase0`, `Phase1`, ...; empty for controllers without phases
    pub phases: BTreeMap<String, PhaseReport>,
    pub vehicles_per_direction: DirectionCounts,
}

impl RunStatistics {
    pub fn phase(&self, index: usize) -> Option<&PhaseReport> {
        self.phases.get(&phase_key(index))
    }

    /// Number of phases that held green at least once
    pub fn phases_activated(&self) -> usize {
        self.phases
            .values()
            .filter(|report| report.times_activated > 0)
            .count()
    }
}

pub(crate) fn phase_key(index: usize) -> String {
    format!("Phase{}", index)
}
