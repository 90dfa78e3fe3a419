//! Vehicle model
//!
//! Vehicles are modelled only as far as the scheduler needs them: an
//! identifier, a route (origin and destination approach), the step at which
//! the vehicle joined its queue, and a class tag that feeds priority.

use crate::models::direction::{Direction, MovementId, MovementKind, UnknownName};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Class tag carried by every vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    #[default]
    Normal,
    /// High-priority class; each bus adds the configured bonus to its queue
    Bus,
    /// Triggers exclusive preemptive service for its queue
    Emergency,
}

impl FromStr for VehicleClass {
    type Err = UnknownName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Ok(VehicleClass::Normal),
            "bus" => Ok(VehicleClass::Bus),
            "emergency" => Ok(VehicleClass::Emergency),
            _ => Err(UnknownName {
                kind: "vehicle class",
                name: name.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for VehicleClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// A vehicle waiting at (or released from) the intersection
///
/// # Example
/// ```
/// use signal_control_core::{Direction, MovementKind, Vehicle, VehicleClass};
///
/// let v = Vehicle::new("car_1", Direction::South, Direction::East, 3, VehicleClass::Normal);
/// assert_eq!(v.movement().kind, MovementKind::Left);
/// assert_eq!(v.wait_at(5), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: String,
    origin: Direction,
    destination: Direction,
    arrival_step: usize,
    class: VehicleClass,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        origin: Direction,
        destination: Direction,
        arrival_step: usize,
        class: VehicleClass,
    ) -> Self {
        Self {
            id: id.into(),
            origin,
            destination,
            arrival_step,
            class,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> Direction {
        self.origin
    }

    pub fn destination(&self) -> Direction {
        self.destination
    }

    pub fn arrival_step(&self) -> usize {
        self.arrival_step
    }

    pub fn class(&self) -> VehicleClass {
        self.class
    }

    pub fn is_emergency(&self) -> bool {
        self.class == VehicleClass::Emergency
    }

    pub fn is_bus(&self) -> bool {
        self.class == VehicleClass::Bus
    }

    /// Movement queue this vehicle belongs in
    pub fn movement(&self) -> MovementId {
        MovementId::new(
            self.origin,
            MovementKind::for_route(self.origin, self.destination),
        )
    }

    /// Steps spent waiting as of `step` (zero if `step` precedes arrival)
    pub fn wait_at(&self, step: usize) -> usize {
        step.saturating_sub(self.arrival_step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_any_case() {
        assert_eq!("Emergency".parse::<VehicleClass>(), Ok(VehicleClass::Emergency));
        assert_eq!("bUs".parse::<VehicleClass>(), Ok(VehicleClass::Bus));
        let parsed: VehicleClass = serde_json::from_str("\"NORMAL\"").unwrap();
        assert_eq!(parsed, VehicleClass::Normal);
    }

    #[test]
    fn test_unknown_class_rejected() {
        let err = "tram".parse::<VehicleClass>().unwrap_err();
        assert_eq!(err.to_string(), "unknown vehicle class \"tram\"");
    }
}
