//! End-to-end scenarios for the simulation registry.

use std::sync::Arc;
use std::thread;

use sim_core::SimCoreError;
use simulation::{MetricsHook, SimulationConfig, SimulationRegistry};
use types::{Condition, EmergencyConfig, RosterEntry, SubjectId};

fn ward() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new(1, "John Doe", 65, Condition::Normal),
        RosterEntry::new(2, "Sarah Smith", 58, Condition::Normal),
        RosterEntry::new(3, "Mike Johnson", 72, Condition::AtRisk),
    ]
}

#[test]
fn seeded_single_subject_runs_twenty_five_ticks() {
    let roster = vec![RosterEntry::new(1, "Test", 40, Condition::Normal)];
    let registry =
        SimulationRegistry::build(&roster, SimulationConfig::new().with_seed(2024)).unwrap();

    for _ in 0..25 {
        registry.tick_all();
    }

    let snapshot = registry.get_subject(SubjectId(1)).unwrap();
    assert!((50.0..=150.0).contains(&snapshot.heart_rate));
    assert!((35.0..=40.0).contains(&snapshot.temperature));
    assert!((75..=100).contains(&snapshot.spo2));
    assert!(matches!(
        snapshot.condition,
        Condition::Normal | Condition::Critical
    ));
    assert_eq!(registry.current_tick(), 25);
}

#[test]
fn unknown_id_is_not_found() {
    let registry =
        SimulationRegistry::build(&ward(), SimulationConfig::new().with_seed(1)).unwrap();
    registry.tick_all();
    match registry.get_subject(SubjectId(99)) {
        Err(SimCoreError::NotFound(id)) => assert_eq!(id, SubjectId(99)),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn reads_without_ticks_are_idempotent() {
    let registry =
        SimulationRegistry::build(&ward(), SimulationConfig::new().with_seed(5)).unwrap();
    for _ in 0..10 {
        registry.tick_all();
    }

    let first = registry.get_subject(SubjectId(2)).unwrap();
    let second = registry.get_subject(SubjectId(2)).unwrap();
    assert!(first.same_reading(&second));

    let all_a = registry.get_all_snapshots();
    let all_b = registry.get_all_snapshots();
    for (a, b) in all_a.iter().zip(&all_b) {
        assert!(a.same_reading(b));
    }
}

#[test]
fn three_subject_roster_lists_in_order() {
    let registry =
        SimulationRegistry::build(&ward(), SimulationConfig::new().with_seed(9)).unwrap();
    let roster = registry.get_roster();
    assert_eq!(roster.len(), 3);
    assert_eq!(
        roster.iter().map(|e| e.patient_id).collect::<Vec<_>>(),
        vec![SubjectId(1), SubjectId(2), SubjectId(3)]
    );
    assert_eq!(roster[2].condition, Condition::AtRisk);

    let snapshots = registry.get_all_snapshots();
    assert_eq!(snapshots.len(), 3);
    assert_eq!(snapshots[1].name, "Sarah Smith");
}

#[test]
fn roster_json_has_wire_field_names() {
    let registry =
        SimulationRegistry::build(&ward(), SimulationConfig::new().with_seed(3)).unwrap();
    let json = serde_json::to_value(registry.get_roster()).unwrap();
    assert_eq!(json[2]["patient_id"], 3);
    assert_eq!(json[2]["condition"], "at-risk");

    let snapshot = serde_json::to_value(registry.get_subject(SubjectId(1)).unwrap()).unwrap();
    for key in [
        "patient_id",
        "name",
        "age",
        "heart_rate",
        "temperature",
        "spo2",
        "condition",
        "timestamp",
    ] {
        assert!(snapshot.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn vitals_stay_clamped_across_long_runs() {
    let config = SimulationConfig::new()
        .with_seed(11)
        .with_emergency(EmergencyConfig::new(0.1, 20));
    let registry = SimulationRegistry::build(&ward(), config).unwrap();

    for _ in 0..3000 {
        registry.tick_all();
        for snapshot in registry.get_all_snapshots() {
            assert!(snapshot.vitals().within_limits(), "{snapshot:?}");
        }
    }
}

#[test]
fn same_seed_replays_identically() {
    let config = SimulationConfig::new()
        .with_seed(42)
        .with_emergency_probability(0.2);
    let a = SimulationRegistry::build(&ward(), config.clone()).unwrap();
    let b = SimulationRegistry::build(&ward(), config).unwrap();

    for _ in 0..100 {
        assert_eq!(a.tick_all().emergencies, b.tick_all().emergencies);
    }
    for (x, y) in a.get_all_snapshots().iter().zip(&b.get_all_snapshots()) {
        assert!(x.same_reading(y));
    }
}

#[test]
fn sequential_and_parallel_ticks_agree() {
    let base = SimulationConfig::new()
        .with_seed(314)
        .with_emergency_probability(0.1);
    let sequential =
        SimulationRegistry::build(&ward(), base.clone().with_sequential(true)).unwrap();
    let fanned_out = SimulationRegistry::build(&ward(), base.with_sequential(false)).unwrap();

    for _ in 0..200 {
        sequential.tick_all();
        fanned_out.tick_all();
    }
    for (x, y) in sequential
        .get_all_snapshots()
        .iter()
        .zip(&fanned_out.get_all_snapshots())
    {
        assert!(x.same_reading(y));
    }
}

#[test]
fn reads_during_ticks_see_whole_readings() {
    let config = SimulationConfig::new()
        .with_seed(8)
        .with_emergency(EmergencyConfig::new(0.3, 5));
    let registry = Arc::new(SimulationRegistry::build(&ward(), config).unwrap());

    let ticker = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..500 {
                registry.tick_all();
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..500 {
                    for snapshot in registry.get_all_snapshots() {
                        assert!(snapshot.vitals().within_limits());
                    }
                    assert!(registry.get_subject(SubjectId(3)).is_ok());
                }
            })
        })
        .collect();

    ticker.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(registry.current_tick(), 500);
}

#[test]
fn certain_emergencies_turn_the_whole_ward_critical() {
    let config = SimulationConfig::new()
        .with_seed(77)
        .with_emergency(EmergencyConfig::default().with_probability(1.0));
    let mut registry = SimulationRegistry::build(&ward(), config).unwrap();
    let metrics = Arc::new(MetricsHook::new());
    registry.add_hook(metrics.clone());

    for _ in 0..25 {
        registry.tick_all();
    }

    assert!(
        registry
            .get_roster()
            .iter()
            .all(|e| e.condition == Condition::Critical)
    );
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.escalations, 3);
    assert_eq!(snapshot.total_emergencies, 15);
    assert_eq!(snapshot.first_emergency_tick, Some(21));
}
