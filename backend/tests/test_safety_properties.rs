//! Property tests for the safety invariant and signal timing
//!
//! Hostile controllers grant arbitrary movement sets; whatever they do, no
//! two conflict groups may be green once a step has finished.

use proptest::prelude::*;
use signal_control_core::models::{MovementQueues, TraceSink};
use signal_control_core::safety::active_conflict_groups;
use signal_control_core::{
    Direction, Intersection, MovementId, MovementSet, Signal, SignalConfig, SignalController,
    SignalState, Vehicle, VehicleClass,
};

/// Replays a fixed list of grant masks, then grants nothing
struct Hostile {
    masks: Vec<u8>,
    step: usize,
}

impl SignalController for Hostile {
    fn select_green_set(&mut self, _: &MovementQueues, _: &mut dyn TraceSink) -> MovementSet {
        let mask = self.masks.get(self.step).copied().unwrap_or(0);
        self.step += 1;
        (0..MovementId::COUNT)
            .filter(|bit| mask & (1 << bit) != 0)
            .map(MovementId::from_index)
            .collect()
    }

    fn notify_emergency_arrival(&mut self, _: MovementId) {}
}

fn arrival() -> impl Strategy<Value = (usize, usize, u8)> {
    (0..4usize, 0..4usize, 0..10u8)
}

fn class_for(roll: u8) -> VehicleClass {
    match roll {
        0 => VehicleClass::Emergency,
        1 | 2 => VehicleClass::Bus,
        _ => VehicleClass::Normal,
    }
}

proptest! {
    #[test]
    fn prop_hostile_grants_never_leave_conflict(
        masks in prop::collection::vec(any::<u8>(), 1..40),
        yellow in 1..4usize,
    ) {
        let config = SignalConfig { yellow_duration: yellow, ..SignalConfig::default() };
        let steps = masks.len() + 2;
        let mut intersection = Intersection::with_controller(
            &config,
            Box::new(Hostile { masks, step: 0 }),
        ).unwrap();
        for i in 0..16 {
            let origin = Direction::ALL[i % 4];
            intersection.admit(Vehicle::new(
                format!("v{}", i),
                origin,
                Direction::ALL[(i / 4) % 4],
                0,
                VehicleClass::Normal,
            ));
        }

        let mut previous_conflict = false;
        for _ in 0..steps {
            let outcome = intersection.step();

            prop_assert!(active_conflict_groups(intersection.queues()) <= 1);
            prop_assert_eq!(outcome.recovered_from_fault, previous_conflict);
            if outcome.conflict_detected {
                prop_assert!(outcome.released.is_empty());
                prop_assert!(MovementId::all()
                    .all(|m| intersection.signal_state(m) == SignalState::Blinking));
            }
            for vehicle in &outcome.released {
                prop_assert_eq!(intersection.signal_state(vehicle.movement()), SignalState::Green);
            }
            previous_conflict = outcome.conflict_detected;
        }
    }

    #[test]
    fn prop_actuated_controller_never_conflicts(
        arrivals in prop::collection::vec(prop::collection::vec(arrival(), 0..4), 1..60),
        fairness_cap in 1..10usize,
        min_green in 0..4usize,
        extra_green in 0..4usize,
    ) {
        let config = SignalConfig {
            fairness_cap,
            ..SignalConfig::default().with_uniform_phases(min_green, min_green + extra_green)
        };
        let mut intersection = Intersection::new(&config).unwrap();

        let mut admitted = 0;
        let mut released = 0;
        for (step, batch) in arrivals.iter().enumerate() {
            for &(origin, destination, roll) in batch {
                intersection.admit(Vehicle::new(
                    format!("v{}", admitted),
                    Direction::ALL[origin],
                    Direction::ALL[destination],
                    step,
                    class_for(roll),
                ));
                admitted += 1;
            }

            let outcome = intersection.step();
            prop_assert!(!outcome.conflict_detected);
            prop_assert!(active_conflict_groups(intersection.queues()) <= 1);
            released += outcome.released.len();
        }
        prop_assert_eq!(admitted, released + intersection.vehicles_waiting());
    }

    #[test]
    fn prop_yellow_lasts_configured_steps(duration in 1..20usize, early in 0..20usize) {
        let mut signal = Signal::new(duration);
        signal.set_green();
        signal.set_yellow();

        let early = early % duration;
        for _ in 0..early {
            signal.step();
        }
        prop_assert_eq!(signal.state(), SignalState::Yellow);

        for _ in early..duration {
            signal.step();
        }
        prop_assert_eq!(signal.state(), SignalState::Red);
    }

    #[test]
    fn prop_green_never_jumps_to_red(masks in prop::collection::vec(0..=255u8, 1..30)) {
        let mut intersection = Intersection::with_controller(
            &SignalConfig::default(),
            Box::new(Hostile { masks: masks.clone(), step: 0 }),
        ).unwrap();

        let mut before: Vec<SignalState> =
            MovementId::all().map(|m| intersection.signal_state(m)).collect();
        for _ in 0..masks.len() {
            intersection.step();
            let after: Vec<SignalState> =
                MovementId::all().map(|m| intersection.signal_state(m)).collect();
            for (previous, now) in before.iter().zip(after.iter()) {
                prop_assert!(!(*previous == SignalState::Green && *now == SignalState::Red));
            }
            before = after;
        }
    }
}
