//! Simulation registry: the fixed set of subjects a driver ticks and
//! consumers read.
//!
//! The registry is built once from a roster and never grows or shrinks. Every
//! subject sits behind its own `Mutex`, which gives two properties:
//!
//! - `tick_all` only needs `&self`, so the registry can live in an `Arc` with
//!   one thread ticking while others read
//! - a read never observes a half-updated vital triple, because a tick and a
//!   snapshot of the same subject both hold that subject's lock
//!
//! # Tick Flow
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │           SimulationRegistry.tick_all()    │
//! │                                            │
//! │  1. Advance registry tick counter          │
//! │  2. subject.tick() for each (maybe rayon)  │
//! │  3. Hook: on_emergency per transition      │
//! │  4. Hook: on_tick_end with TickSummary     │
//! │                                            │
//! └────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use sim_core::{Result, SimCoreError, SubjectSimulator};
use tracing::{debug, info, warn};
use types::{Condition, RosterEntry, SubjectId, Tick, VitalsSnapshot};

use crate::config::SimulationConfig;
use crate::hooks::{EmergencyEvent, HookRunner, RegistryHook, TickSummary};

/// What one subject reports back from a parallel tick.
struct StepReport {
    condition: Condition,
    emergency: Option<(Condition, VitalsSnapshot)>,
}

/// Owns every simulated subject and advances them together.
pub struct SimulationRegistry {
    config: SimulationConfig,

    /// Subjects in roster order, each behind its own lock.
    subjects: Vec<Mutex<SubjectSimulator>>,

    /// Map from SubjectId to index in `subjects`.
    id_to_index: HashMap<SubjectId, usize>,

    /// Completed `tick_all` passes.
    tick: AtomicU64,

    hooks: HookRunner,
}

impl SimulationRegistry {
    /// Build a registry from a roster.
    ///
    /// # Errors
    /// `InvalidArgument` on a duplicate id, an invalid roster row or an
    /// invalid emergency configuration.
    pub fn build(roster: &[RosterEntry], config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut subjects = Vec::with_capacity(roster.len());
        let mut id_to_index = HashMap::with_capacity(roster.len());

        for entry in roster {
            if id_to_index.contains_key(&entry.patient_id) {
                return Err(SimCoreError::invalid(format!(
                    "duplicate subject id {}",
                    entry.patient_id
                )));
            }
            let subject = SubjectSimulator::from_entry(entry, config.rng_for(entry.patient_id))?
                .with_emergency(config.emergency)?;
            id_to_index.insert(entry.patient_id, subjects.len());
            subjects.push(Mutex::new(subject));
        }

        info!(
            subjects = subjects.len(),
            seeded = config.seed.is_some(),
            emergency_probability = config.emergency.probability,
            "simulation registry built"
        );

        Ok(Self {
            config,
            subjects,
            id_to_index,
            tick: AtomicU64::new(0),
            hooks: HookRunner::new(),
        })
    }

    /// Register an observer. Must happen before the registry is shared.
    pub fn add_hook(&mut self, hook: Arc<dyn RegistryHook>) {
        self.hooks.add(hook);
    }

    /// Advance every subject by one step.
    ///
    /// Subjects are independent; with the `parallel` feature they tick on the
    /// rayon pool unless `force_sequential` is set. The summary lists
    /// emergencies in roster order either way.
    pub fn tick_all(&self) -> TickSummary {
        let tick = self.tick.fetch_add(1, Ordering::SeqCst) + 1;

        let reports = parallel::map_mutex_slice(
            &self.subjects,
            |subject| {
                let previous = subject.condition();
                let outcome = subject.tick();
                StepReport {
                    condition: subject.condition(),
                    emergency: outcome
                        .is_emergency()
                        .then(|| (previous, subject.snapshot())),
                }
            },
            self.config.force_sequential,
        );

        let mut summary = TickSummary {
            tick,
            subjects: reports.len(),
            emergencies: Vec::new(),
            critical: 0,
        };

        for report in reports {
            if report.condition.is_critical() {
                summary.critical += 1;
            }
            if let Some((previous, snapshot)) = report.emergency {
                let event = EmergencyEvent {
                    tick,
                    previous,
                    snapshot,
                };
                if event.is_escalation() {
                    warn!(
                        patient_id = %event.snapshot.patient_id,
                        tick,
                        previous = %previous,
                        "subject entered critical condition"
                    );
                } else {
                    debug!(
                        patient_id = %event.snapshot.patient_id,
                        tick,
                        "critical baseline redrawn"
                    );
                }
                summary.emergencies.push(event.snapshot.patient_id);
                self.hooks.on_emergency(&event);
            }
        }

        debug!(
            tick,
            subjects = summary.subjects,
            emergencies = summary.emergencies.len(),
            critical = summary.critical,
            "tick complete"
        );
        self.hooks.on_tick_end(&summary);
        summary
    }

    /// Snapshot of one subject.
    ///
    /// # Errors
    /// `NotFound` if no subject has this id.
    pub fn get_subject(&self, id: SubjectId) -> Result<VitalsSnapshot> {
        self.id_to_index
            .get(&id)
            .map(|&idx| self.subjects[idx].lock().snapshot())
            .ok_or(SimCoreError::NotFound(id))
    }

    /// One snapshot per subject, in roster order.
    ///
    /// Each snapshot is consistent on its own; the set as a whole may straddle
    /// a concurrent tick.
    pub fn get_all_snapshots(&self) -> Vec<VitalsSnapshot> {
        parallel::map_mutex_slice_ref(
            &self.subjects,
            |s| s.snapshot(),
            self.config.force_sequential,
        )
    }

    /// Identity and current condition of every subject, in roster order.
    pub fn get_roster(&self) -> Vec<RosterEntry> {
        self.subjects.iter().map(|s| s.lock().roster_entry()).collect()
    }

    /// Subject ids currently in the Critical condition.
    pub fn critical_subjects(&self) -> Vec<SubjectId> {
        self.subjects
            .iter()
            .filter_map(|s| {
                let s = s.lock();
                s.condition().is_critical().then_some(s.id())
            })
            .collect()
    }

    /// Notify hooks that the driver is done ticking.
    pub fn finish(&self) {
        let total = self.current_tick();
        info!(total_ticks = total, "simulation run finished");
        self.hooks.on_run_end(total);
    }

    pub fn contains(&self, id: SubjectId) -> bool {
        self.id_to_index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Number of completed `tick_all` passes.
    pub fn current_tick(&self) -> Tick {
        self.tick.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.hook_names()
    }
}

impl std::fmt::Debug for SimulationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationRegistry")
            .field("subjects", &self.subjects.len())
            .field("tick", &self.current_tick())
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsHook;
    use types::EmergencyConfig;

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new(1, "John Doe", 65, Condition::Normal),
            RosterEntry::new(3, "Mike Johnson", 72, Condition::AtRisk),
            RosterEntry::new(7, "James Taylor", 75, Condition::Normal),
        ]
    }

    fn seeded() -> SimulationConfig {
        SimulationConfig::new().with_seed(7)
    }

    #[test]
    fn test_build_keeps_roster_order() {
        let registry = SimulationRegistry::build(&roster(), seeded()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get_roster(), roster());
        assert_eq!(registry.current_tick(), 0);
    }

    #[test]
    fn test_build_rejects_duplicate_ids() {
        let mut entries = roster();
        entries.push(RosterEntry::new(3, "Someone Else", 40, Condition::Normal));
        let result = SimulationRegistry::build(&entries, seeded());
        assert!(matches!(result, Err(SimCoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_build_rejects_invalid_entry() {
        let entries = vec![RosterEntry::new(4, "Emily Davis", 0, Condition::Normal)];
        let result = SimulationRegistry::build(&entries, seeded());
        assert!(matches!(result, Err(SimCoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_build_accepts_empty_name() {
        let entries = vec![RosterEntry::new(4, "", 51, Condition::Normal)];
        let registry = SimulationRegistry::build(&entries, seeded()).unwrap();
        assert_eq!(registry.get_subject(SubjectId(4)).unwrap().name, "");
    }

    #[test]
    fn test_build_rejects_bad_emergency_config() {
        let config = seeded().with_emergency_probability(1.5);
        let result = SimulationRegistry::build(&roster(), config);
        assert!(matches!(result, Err(SimCoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_roster() {
        let registry = SimulationRegistry::build(&[], seeded()).unwrap();
        assert!(registry.is_empty());
        let summary = registry.tick_all();
        assert_eq!(summary.subjects, 0);
        assert!(registry.get_all_snapshots().is_empty());
    }

    #[test]
    fn test_get_subject_not_found() {
        let registry = SimulationRegistry::build(&roster(), seeded()).unwrap();
        assert!(matches!(
            registry.get_subject(SubjectId(2)),
            Err(SimCoreError::NotFound(SubjectId(2)))
        ));
        assert!(registry.get_subject(SubjectId(7)).is_ok());
        assert!(registry.contains(SubjectId(7)));
        assert!(!registry.contains(SubjectId(2)));
    }

    #[test]
    fn test_tick_summary_counts() {
        let registry = SimulationRegistry::build(&roster(), seeded()).unwrap();
        for expected in 1..=5 {
            let summary = registry.tick_all();
            assert_eq!(summary.tick, expected);
            assert_eq!(summary.subjects, 3);
            assert!(!summary.has_emergencies());
            assert_eq!(summary.critical, 0);
        }
        assert_eq!(registry.current_tick(), 5);
    }

    #[test]
    fn test_forced_emergencies_reach_hooks() {
        let config = seeded().with_emergency(EmergencyConfig::new(1.0, 20));
        let mut registry = SimulationRegistry::build(&roster(), config).unwrap();
        let metrics = Arc::new(MetricsHook::new());
        registry.add_hook(metrics.clone());

        for _ in 0..20 {
            assert!(!registry.tick_all().has_emergencies());
        }
        let summary = registry.tick_all();
        assert_eq!(
            summary.emergencies,
            vec![SubjectId(1), SubjectId(3), SubjectId(7)]
        );
        assert_eq!(summary.critical, 3);
        assert_eq!(
            registry.critical_subjects(),
            vec![SubjectId(1), SubjectId(3), SubjectId(7)]
        );

        registry.tick_all();
        registry.finish();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_ticks, 22);
        assert_eq!(snapshot.total_emergencies, 6);
        assert_eq!(snapshot.escalations, 3);
        assert_eq!(snapshot.first_emergency_tick, Some(21));
        assert_eq!(snapshot.peak_critical, 3);
    }

    #[test]
    fn test_hook_names_visible() {
        let mut registry = SimulationRegistry::build(&roster(), seeded()).unwrap();
        registry.add_hook(Arc::new(crate::NoOpHook));
        assert_eq!(registry.hook_names(), vec!["NoOp"]);
    }
}
