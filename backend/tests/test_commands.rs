//! Command documents and their execution by the orchestrator

use signal_control_core::{
    load_commands, parse_commands, Command, CommandError, Direction, Orchestrator, SignalConfig,
    VehicleClass,
};

const DOCUMENT: &str = r#"{
  "commands": [
    {"type": "addVehicle", "vehicleId": "vehicle1", "startRoad": "south", "endRoad": "north"},
    {"type": "addVehicle", "vehicleId": "vehicle2", "startRoad": "north", "endRoad": "south"},
    {"type": "step"},
    {"type": "step"},
    {"type": "addVehicle", "vehicleId": "vehicle3", "startRoad": "west", "endRoad": "south"},
    {"type": "addVehicle", "vehicleId": "vehicle4", "startRoad": "west", "endRoad": "south"},
    {"type": "step"},
    {"type": "step"}
  ]
}"#;

#[test]
fn test_parse_document() {
    let commands = parse_commands(DOCUMENT).unwrap();
    assert_eq!(commands.len(), 8);
    assert_eq!(
        commands[0],
        Command::add_vehicle("vehicle1", Direction::South, Direction::North, VehicleClass::Normal)
    );
    assert_eq!(commands[2], Command::Step);
}

#[test]
fn test_unknown_commands_skipped() {
    let commands = parse_commands(
        r#"{"commands": [{"type": "pause"}, {"type": "step"}, {"type": "reset", "hard": true}]}"#,
    )
    .unwrap();
    assert_eq!(commands, vec![Command::Step]);
}

#[test]
fn test_vehicle_classes() {
    let commands = parse_commands(
        r#"{"commands": [
            {"type": "addVehicle", "vehicleId": "b", "startRoad": "north", "endRoad": "south", "vehicleType": "bus"},
            {"type": "addVehicle", "vehicleId": "a", "startRoad": "north", "endRoad": "south", "vehicleType": "EMERGENCY"}
        ]}"#,
    )
    .unwrap();
    assert!(matches!(
        commands[0],
        Command::AddVehicle { vehicle_type: VehicleClass::Bus, .. }
    ));
    assert!(matches!(
        commands[1],
        Command::AddVehicle { vehicle_type: VehicleClass::Emergency, .. }
    ));
}

#[test]
fn test_names_in_mixed_case() {
    let commands = parse_commands(
        r#"{"commands": [
            {"type": "addVehicle", "vehicleId": "m", "startRoad": "nOrth", "endRoad": "SoUtH", "vehicleType": "Bus"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(
        commands[0],
        Command::add_vehicle("m", Direction::North, Direction::South, VehicleClass::Bus)
    );
}

#[test]
fn test_null_vehicle_type_runs_as_normal() {
    let mut orchestrator = Orchestrator::new(SignalConfig::default()).unwrap();
    orchestrator
        .execute_json(
            r#"{"commands": [
                {"type": "addVehicle", "vehicleId": "n", "startRoad": "north", "endRoad": "south", "vehicleType": null},
                {"type": "step"}
            ]}"#,
        )
        .unwrap();
    assert_eq!(orchestrator.step_statuses()[0].left_vehicles, vec!["n"]);
}

#[test]
fn test_missing_vehicle_id_fails() {
    let result = parse_commands(
        r#"{"commands": [{"type": "addVehicle", "startRoad": "north", "endRoad": "south"}]}"#,
    );
    assert!(matches!(result, Err(CommandError::Parse(_))));
}

#[test]
fn test_command_serialization_matches_input_format() {
    let json = serde_json::to_value(Command::add_vehicle(
        "v",
        Direction::East,
        Direction::North,
        VehicleClass::Normal,
    ))
    .unwrap();
    assert_eq!(json["type"], "addVehicle");
    assert_eq!(json["vehicleId"], "v");
    assert_eq!(json["startRoad"], "east");
    assert_eq!(serde_json::to_value(Command::Step).unwrap()["type"], "step");
}

#[test]
fn test_load_commands_from_file() {
    let path = std::env::temp_dir().join(format!("signal_control_{}_commands.json", std::process::id()));
    std::fs::write(&path, DOCUMENT).unwrap();
    let commands = load_commands(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(commands.len(), 8);

    assert!(matches!(
        load_commands("/nonexistent/signal_control/commands.json"),
        Err(CommandError::Io(_))
    ));
}

#[test]
fn test_document_step_statuses() {
    let mut orchestrator = Orchestrator::new(SignalConfig::default()).unwrap();
    orchestrator.execute_json(DOCUMENT).unwrap();

    let result = orchestrator.result();
    let left: Vec<Vec<&str>> = result
        .step_statuses
        .iter()
        .map(|s| s.left_vehicles.iter().map(String::as_str).collect())
        .collect();

    assert_eq!(left.len(), 4);
    assert_eq!(left[0], vec!["vehicle2", "vehicle1"]);
    assert!(left[1].is_empty());
    assert_eq!(orchestrator.statistics().total_vehicles, 4);
}
