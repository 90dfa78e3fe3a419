//! Movement queues
//!
//! A movement queue is the FIFO of vehicles waiting to perform one
//! (direction, kind) movement, together with the signal head that governs
//! it. Besides the FIFO it keeps running counts of buses and emergency
//! vehicles so that priority and preemption checks are O(1).
//!
//! # Critical Invariants
//!
//! - `bus_count` and `emergency_count` always equal the number of matching
//!   vehicles currently enqueued; both are updated inside `enqueue`/`dequeue`.
//! - Vehicles leave in exactly the order they arrived.

use crate::models::direction::{Direction, MovementId, MovementKind};
use crate::models::signal::Signal;
use crate::models::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Vehicles waiting for one movement, plus its signal
///
/// # Example
/// ```
/// use signal_control_core::{Direction, MovementId, MovementKind, MovementQueue, Vehicle, VehicleClass};
///
/// let id = MovementId::new(Direction::North, MovementKind::Straight);
/// let mut queue = MovementQueue::new(id, 1.0, 2.0, 1);
/// queue.enqueue(Vehicle::new("bus_1", Direction::North, Direction::South, 0, VehicleClass::Bus));
///
/// assert_eq!(queue.len(), 1);
/// assert_eq!(queue.effective_priority(), 3.0); // 1.0 base + 1 bus × 2.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementQueue {
    id: MovementId,
    vehicles: VecDeque<Vehicle>,
    signal: Signal,
    base_priority: f64,
    /// Bonus added per queued bus
    bus_bonus: f64,
    bus_count: usize,
    emergency_count: usize,
}

impl MovementQueue {
    pub fn new(id: MovementId, base_priority: f64, bus_bonus: f64, yellow_duration: usize) -> Self {
        Self {
            id,
            vehicles: VecDeque::new(),
            signal: Signal::new(yellow_duration),
            base_priority,
            bus_bonus,
            bus_count: 0,
            emergency_count: 0,
        }
    }

    pub fn id(&self) -> MovementId {
        self.id
    }

    pub fn enqueue(&mut self, vehicle: Vehicle) {
        if vehicle.is_bus() {
            self.bus_count += 1;
        }
        if vehicle.is_emergency() {
            self.emergency_count += 1;
        }
        self.vehicles.push_back(vehicle);
    }

    /// Remove the oldest vehicle; `None` when the queue is empty
    pub fn dequeue(&mut self) -> Option<Vehicle> {
        let vehicle = self.vehicles.pop_front()?;
        if vehicle.is_bus() {
            self.bus_count -= 1;
        }
        if vehicle.is_emergency() {
            self.emergency_count -= 1;
        }
        Some(vehicle)
    }

    /// Sum of `current_step - arrival_step` over every queued vehicle
    ///
    /// Recomputed on every call, so vehicles that never leave keep adding
    /// to the total each evaluation.
    pub fn total_waiting_time(&self, current_step: usize) -> usize {
        self.vehicles.iter().map(|v| v.wait_at(current_step)).sum()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn has_emergency_waiting(&self) -> bool {
        self.emergency_count > 0
    }

    pub fn bus_count(&self) -> usize {
        self.bus_count
    }

    pub fn emergency_count(&self) -> usize {
        self.emergency_count
    }

    pub fn base_priority(&self) -> f64 {
        self.base_priority
    }

    /// Base weight plus `bus_count × bus_bonus`
    pub fn effective_priority(&self) -> f64 {
        self.base_priority + self.bus_count as f64 * self.bus_bonus
    }

    /// Queued vehicles, oldest first
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    pub fn signal_mut(&mut self) -> &mut Signal {
        &mut self.signal
    }
}

/// The eight movement queues of a four-way intersection, indexed by
/// [`MovementId::index`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementQueues {
    queues: [MovementQueue; MovementId::COUNT],
}

impl MovementQueues {
    /// Build all eight queues
    ///
    /// `base_priority` supplies the base weight for each movement.
    pub fn new<F>(bus_bonus: f64, yellow_duration: usize, base_priority: F) -> Self
    where
        F: Fn(Direction, MovementKind) -> f64,
    {
        let queues = std::array::from_fn(|index| {
            let id = MovementId::from_index(index);
            MovementQueue::new(
                id,
                base_priority(id.direction, id.kind),
                bus_bonus,
                yellow_duration,
            )
        });
        Self { queues }
    }

    pub fn get(&self, id: MovementId) -> &MovementQueue {
        &self.queues[id.index()]
    }

    pub fn get_mut(&mut self, id: MovementId) -> &mut MovementQueue {
        &mut self.queues[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovementQueue> {
        self.queues.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MovementQueue> {
        self.queues.iter_mut()
    }

    /// Total vehicles waiting across all movements
    pub fn total_waiting(&self) -> usize {
        self.queues.iter().map(MovementQueue::len).sum()
    }
}
