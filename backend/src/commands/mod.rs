//! Command documents
//!
//! A run is driven by a JSON document listing commands in execution order:
//!
//! ```json
//! {
//!   "commands": [
//!     {"type": "addVehicle", "vehicleId": "v1", "startRoad": "south", "endRoad": "north"},
//!     {"type": "addVehicle", "vehicleId": "amb", "startRoad": "west", "endRoad": "east", "vehicleType": "emergency"},
//!     {"type": "step"}
//!   ]
//! }
//! ```
//!
//! Commands with an unrecognised `type` are skipped with a warning. A known
//! command with bad fields (unknown road name, missing id) fails the whole
//! document. Road and class names are matched in any letter case; a
//! `vehicleType` that is not a string counts as normal traffic.

use crate::models::{Direction, VehicleClass};
use log::warn;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to read command file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed command document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("command #{index} has no \"type\" field")]
    MissingType { index: usize },
}

/// One entry of the command list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Queue a vehicle on its approach
    AddVehicle {
        #[serde(rename = "vehicleId")]
        vehicle_id: String,
        #[serde(rename = "startRoad")]
        start_road: Direction,
        #[serde(rename = "endRoad")]
        end_road: Direction,
        #[serde(rename = "vehicleType", default, deserialize_with = "class_or_normal")]
        vehicle_type: VehicleClass,
    },

    /// Advance the simulation by one step
    Step,
}

impl Command {
    pub fn add_vehicle(
        id: impl Into<String>,
        start_road: Direction,
        end_road: Direction,
        vehicle_type: VehicleClass,
    ) -> Self {
        Command::AddVehicle {
            vehicle_id: id.into(),
            start_road,
            end_road,
            vehicle_type,
        }
    }

    /// Decode one raw command
    ///
    /// Returns `Ok(None)` for an unrecognised command type.
    fn from_value(index: usize, value: Value) -> Result<Option<Self>, CommandError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CommandError::MissingType { index })?;

        match kind {
            "addVehicle" | "step" => Ok(Some(serde_json::from_value(value)?)),
            other => {
                warn!("skipping command #{}: unknown type {:?}", index, other);
                Ok(None)
            }
        }
    }
}

/// Any non-string `vehicleType` (null, number, object) means normal traffic
fn class_or_normal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<VehicleClass, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(name) => name.parse().map_err(de::Error::custom),
        _ => Ok(VehicleClass::Normal),
    }
}

#[derive(Debug, Deserialize)]
struct CommandDocument {
    commands: Vec<Value>,
}

/// Parse a command document
///
/// # Example
///
/// ```
/// use signal_control_core::commands::{parse_commands, Command};
///
/// let commands = parse_commands(r#"{"commands": [{"type": "step"}, {"type": "noop"}]}"#).unwrap();
/// assert_eq!(commands, vec![Command::Step]);
/// ```
pub fn parse_commands(json: &str) -> Result<Vec<Command>, CommandError> {
    let document: CommandDocument = serde_json::from_str(json)?;
    let mut commands = Vec::with_capacity(document.commands.len());
    for (index, value) in document.commands.into_iter().enumerate() {
        if let Some(command) = Command::from_value(index, value)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

pub fn load_commands(path: impl AsRef<Path>) -> Result<Vec<Command>, CommandError> {
    let contents = std::fs::read_to_string(path)?;
    parse_commands(&contents)
}
