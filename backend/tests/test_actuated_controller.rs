//! Actuated controller decisions, driven directly against hand-built queues

use signal_control_core::config::PhaseTiming;
use signal_control_core::{
    ActuatedController, Direction, EventLog, MovementId, MovementKind, MovementQueues,
    MovementSet, NoTrace, SignalConfig, SignalController, Vehicle, VehicleClass,
};

fn queues_for(config: &SignalConfig) -> MovementQueues {
    MovementQueues::new(config.bus_priority, config.yellow_duration, |d, k| {
        config.lane_priority(d, k)
    })
}

fn add(queues: &mut MovementQueues, id: &str, origin: Direction, destination: Direction, class: VehicleClass) {
    let vehicle = Vehicle::new(id, origin, destination, 0, class);
    queues.get_mut(vehicle.movement()).enqueue(vehicle);
}

fn add_many(queues: &mut MovementQueues, prefix: &str, origin: Direction, count: usize) {
    for i in 0..count {
        add(
            queues,
            &format!("{}{}", prefix, i),
            origin,
            origin.opposite(),
            VehicleClass::Normal,
        );
    }
}

// ============================================================================
// Emergency preemption
// ============================================================================

#[test]
fn test_emergency_granted_alone_regardless_of_priority() {
    let config = SignalConfig::default();
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);
    add_many(&mut queues, "n", Direction::North, 20);

    let west_left = MovementId::new(Direction::West, MovementKind::Left);
    add(&mut queues, "amb", Direction::West, Direction::South, VehicleClass::Emergency);
    controller.notify_emergency_arrival(west_left);

    let grant = controller.select_green_set(&queues, &mut NoTrace);
    assert_eq!(grant, MovementSet::single(west_left));
    assert_eq!(controller.emergency_serving(), Some(west_left));
}

#[test]
fn test_preemption_freezes_phase_timer() {
    let config = SignalConfig::default();
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);

    let east = MovementId::new(Direction::East, MovementKind::Straight);
    add(&mut queues, "amb", Direction::East, Direction::West, VehicleClass::Emergency);
    controller.notify_emergency_arrival(east);

    for _ in 0..3 {
        controller.select_green_set(&queues, &mut NoTrace);
    }
    assert_eq!(controller.phases()[0].green_time(), 0);
    assert_eq!(controller.current_phase_index(), 0);
}

#[test]
fn test_emergency_retired_after_vehicle_leaves() {
    let config = SignalConfig::default();
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);

    let east = MovementId::new(Direction::East, MovementKind::Straight);
    add(&mut queues, "amb", Direction::East, Direction::West, VehicleClass::Emergency);
    controller.notify_emergency_arrival(east);
    controller.select_green_set(&queues, &mut NoTrace);

    queues.get_mut(east).dequeue();

    let mut log = EventLog::new();
    let grant = controller.select_green_set(&queues, &mut log);
    assert_eq!(grant, controller.phases()[0].movements());
    assert_eq!(controller.emergency_serving(), None);
    assert!(controller.emergency_queue().is_empty());
    assert_eq!(log.events_of_type("EmergencyRetired").len(), 1);
}

#[test]
fn test_emergencies_served_in_notification_order() {
    let config = SignalConfig::default();
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);

    let south = MovementId::new(Direction::South, MovementKind::Straight);
    let east_left = MovementId::new(Direction::East, MovementKind::Left);
    add(&mut queues, "a1", Direction::South, Direction::North, VehicleClass::Emergency);
    add(&mut queues, "a2", Direction::East, Direction::North, VehicleClass::Emergency);
    controller.notify_emergency_arrival(south);
    controller.notify_emergency_arrival(east_left);
    controller.notify_emergency_arrival(south);

    assert_eq!(controller.emergency_queue().len(), 2);
    assert_eq!(
        controller.select_green_set(&queues, &mut NoTrace),
        MovementSet::single(south)
    );

    queues.get_mut(south).dequeue();
    assert_eq!(
        controller.select_green_set(&queues, &mut NoTrace),
        MovementSet::single(east_left)
    );
}

#[test]
fn test_stale_notification_is_ignored() {
    let config = SignalConfig::default();
    let mut controller = ActuatedController::new(&config).unwrap();
    let queues = queues_for(&config);

    // Notified, but the queue holds no emergency vehicle
    controller.notify_emergency_arrival(MovementId::new(Direction::North, MovementKind::Left));

    let grant = controller.select_green_set(&queues, &mut NoTrace);
    assert_eq!(grant, controller.phases()[0].movements());
    assert!(controller.emergency_queue().is_empty());
}

// ============================================================================
// Priority
// ============================================================================

#[test]
fn test_held_past_max_green_while_current_dominates() {
    let config = SignalConfig::default().with_uniform_phases(1, 3);
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);
    add_many(&mut queues, "n", Direction::North, 5);
    add_many(&mut queues, "e", Direction::East, 1);

    let mut log = EventLog::new();
    for _ in 0..5 {
        controller.select_green_set(&queues, &mut log);
    }
    // No other phase beats the current one, so max green alone never switches
    assert!(log.events_of_type("PhaseSwitch").is_empty());
    assert_eq!(controller.phases()[0].green_time(), 5);
}

#[test]
fn test_bus_bonus_changes_target() {
    let config = SignalConfig::default().with_uniform_phases(0, 10);

    let mut plain = queues_for(&config);
    add(&mut plain, "e", Direction::East, Direction::West, VehicleClass::Normal);
    add(&mut plain, "l", Direction::North, Direction::West, VehicleClass::Normal);
    let mut controller = ActuatedController::new(&config).unwrap();
    controller.select_green_set(&plain, &mut NoTrace);
    assert_eq!(controller.pending_phase(), Some(1));

    let mut with_bus = queues_for(&config);
    add(&mut with_bus, "e", Direction::East, Direction::West, VehicleClass::Normal);
    add(&mut with_bus, "l", Direction::North, Direction::West, VehicleClass::Bus);
    let mut controller = ActuatedController::new(&config).unwrap();
    controller.select_green_set(&with_bus, &mut NoTrace);
    assert_eq!(controller.pending_phase(), Some(2));
}

#[test]
fn test_lane_priority_changes_target() {
    let mut config = SignalConfig::default().with_uniform_phases(0, 10);
    config
        .lane_priorities
        .entry(Direction::West)
        .or_default()
        .left = 5.0;

    let mut queues = queues_for(&config);
    add(&mut queues, "e", Direction::East, Direction::West, VehicleClass::Normal);
    add(&mut queues, "w", Direction::West, Direction::South, VehicleClass::Normal);

    let mut controller = ActuatedController::new(&config).unwrap();
    controller.select_green_set(&queues, &mut NoTrace);
    assert_eq!(controller.pending_phase(), Some(3));
}

// ============================================================================
// Fairness
// ============================================================================

fn fairness_config(cap: usize) -> SignalConfig {
    SignalConfig {
        alpha: 1.0,
        beta: 0.0,
        gamma: 0.0,
        fairness_cap: cap,
        ..SignalConfig::default().with_uniform_phases(0, 100)
    }
}

#[test]
fn test_fairness_forces_starved_phase() {
    let config = fairness_config(4);
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);
    add_many(&mut queues, "n", Direction::North, 10);
    add_many(&mut queues, "e", Direction::East, 1);

    let mut log = EventLog::new();
    for _ in 0..3 {
        controller.select_green_set(&queues, &mut log);
        assert_eq!(controller.pending_phase(), None);
    }

    controller.select_green_set(&queues, &mut log);
    assert_eq!(controller.pending_phase(), Some(1));
    assert_eq!(log.events_of_type("FairnessForced").len(), 1);
}

#[test]
fn test_fairness_skips_phases_without_demand() {
    let config = fairness_config(2);
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);
    add_many(&mut queues, "n", Direction::North, 3);

    let mut log = EventLog::new();
    for _ in 0..6 {
        controller.select_green_set(&queues, &mut log);
    }
    assert!(log.events_of_type("FairnessForced").is_empty());
    assert_eq!(controller.pending_phase(), None);
}

#[test]
fn test_fairness_picks_highest_pressure_candidate() {
    let config = fairness_config(3);
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);
    add_many(&mut queues, "n", Direction::North, 10);
    add_many(&mut queues, "e", Direction::East, 1);
    // Two vehicles on the NS left phase: more pressure than the single east car
    add(&mut queues, "l1", Direction::North, Direction::West, VehicleClass::Normal);
    add(&mut queues, "l2", Direction::South, Direction::East, VehicleClass::Normal);

    for _ in 0..3 {
        controller.select_green_set(&queues, &mut NoTrace);
    }
    assert_eq!(controller.pending_phase(), Some(2));
}

#[test]
fn test_fairness_switch_waits_for_min_green() {
    let mut config = fairness_config(2);
    config.phases[0] = PhaseTiming::new(6, 100);
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);
    add_many(&mut queues, "n", Direction::North, 10);
    add_many(&mut queues, "e", Direction::East, 1);

    for _ in 0..5 {
        controller.select_green_set(&queues, &mut NoTrace);
        assert_eq!(controller.pending_phase(), None);
    }
    controller.select_green_set(&queues, &mut NoTrace);
    assert_eq!(controller.pending_phase(), Some(1));
    assert!(controller.fairness_age(1) > config.fairness_cap);
}

// ============================================================================
// Clearance and statistics
// ============================================================================

#[test]
fn test_clearance_lasts_yellow_duration() {
    let config = SignalConfig {
        yellow_duration: 3,
        ..SignalConfig::default().with_uniform_phases(0, 10)
    };
    let mut controller = ActuatedController::new(&config).unwrap();
    let mut queues = queues_for(&config);
    add_many(&mut queues, "e", Direction::East, 1);

    let ns_straight = controller.phases()[0].movements();
    assert_eq!(controller.select_green_set(&queues, &mut NoTrace), ns_straight);

    for _ in 0..3 {
        assert!(controller.select_green_set(&queues, &mut NoTrace).is_empty());
    }
    assert_eq!(controller.current_phase_index(), 1);
    assert_eq!(
        controller.select_green_set(&queues, &mut NoTrace),
        controller.phases()[1].movements()
    );
}

#[test]
fn test_phase_reports_include_running_green() {
    let config = SignalConfig::default();
    let mut controller = ActuatedController::new(&config).unwrap();
    let queues = queues_for(&config);

    controller.select_green_set(&queues, &mut NoTrace);
    let reports = controller.phase_reports();
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0].times_activated, 1);
    assert_eq!(reports[0].total_duration, 1);
    assert_eq!(reports[0].average_duration, 1.0);
    assert_eq!(reports[1].times_activated, 0);
    assert_eq!(reports[1].average_duration, 0.0);
}

#[test]
fn test_departures_recorded_on_current_phase() {
    let mut controller = ActuatedController::new(&SignalConfig::default()).unwrap();
    controller.record_departure(2);
    controller.record_departure(4);
    assert_eq!(controller.phases()[0].average_wait_time(), 3.0);
    assert_eq!(controller.phase_reports()[0].average_wait_time, 3.0);
}
