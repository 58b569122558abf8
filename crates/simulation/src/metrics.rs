//! MetricsHook - built-in hook for aggregating ward statistics.
//!
//! Counts ticks and emergency transitions and tracks how many subjects are
//! Critical. Cheap enough to leave attached for the whole run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use types::{SubjectId, Tick};

use crate::hooks::{EmergencyEvent, RegistryHook, TickSummary};

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    /// Total ticks processed.
    pub total_ticks: u64,
    /// Emergency transitions fired, including redraws while already Critical.
    pub total_emergencies: u64,
    /// Transitions that moved a subject into Critical.
    pub escalations: u64,
    /// Critical subjects after the latest tick.
    pub critical_now: u64,
    /// Highest Critical count seen after any tick.
    pub peak_critical: u64,
    /// Average emergencies per tick.
    pub avg_emergencies_per_tick: f64,
    /// Tick on which the first emergency fired.
    pub first_emergency_tick: Option<Tick>,
}

/// Built-in hook for collecting registry metrics.
///
/// Thread-safe via atomics and a mutex for the per-subject tally.
pub struct MetricsHook {
    tick_count: AtomicU64,
    emergency_count: AtomicU64,
    escalation_count: AtomicU64,
    critical_now: AtomicU64,
    peak_critical: AtomicU64,
    /// 0 until the first emergency.
    first_emergency_tick: AtomicU64,
    per_subject: Mutex<HashMap<SubjectId, u64>>,
}

impl MetricsHook {
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            emergency_count: AtomicU64::new(0),
            escalation_count: AtomicU64::new(0),
            critical_now: AtomicU64::new(0),
            peak_critical: AtomicU64::new(0),
            first_emergency_tick: AtomicU64::new(0),
            per_subject: Mutex::new(HashMap::new()),
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_ticks = self.tick_count.load(Ordering::Relaxed);
        let total_emergencies = self.emergency_count.load(Ordering::Relaxed);

        let avg_emergencies_per_tick = if total_ticks > 0 {
            total_emergencies as f64 / total_ticks as f64
        } else {
            0.0
        };

        let first = self.first_emergency_tick.load(Ordering::Relaxed);

        MetricsSnapshot {
            total_ticks,
            total_emergencies,
            escalations: self.escalation_count.load(Ordering::Relaxed),
            critical_now: self.critical_now.load(Ordering::Relaxed),
            peak_critical: self.peak_critical.load(Ordering::Relaxed),
            avg_emergencies_per_tick,
            first_emergency_tick: (first > 0).then_some(first),
        }
    }

    /// Emergencies fired per subject.
    pub fn emergencies_by_subject(&self) -> HashMap<SubjectId, u64> {
        self.per_subject.lock().clone()
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.tick_count.store(0, Ordering::Relaxed);
        self.emergency_count.store(0, Ordering::Relaxed);
        self.escalation_count.store(0, Ordering::Relaxed);
        self.critical_now.store(0, Ordering::Relaxed);
        self.peak_critical.store(0, Ordering::Relaxed);
        self.first_emergency_tick.store(0, Ordering::Relaxed);
        self.per_subject.lock().clear();
    }

    /// Update peak value atomically (CAS loop).
    fn update_peak(peak: &AtomicU64, value: u64) {
        let mut current = peak.load(Ordering::Relaxed);
        while value > current {
            match peak.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_emergency(&self, event: &EmergencyEvent) {
        self.emergency_count.fetch_add(1, Ordering::Relaxed);
        if event.is_escalation() {
            self.escalation_count.fetch_add(1, Ordering::Relaxed);
        }
        let _ = self.first_emergency_tick.compare_exchange(
            0,
            event.tick,
            Ordering::Relaxed,
            Ordering::Relaxed,
        );
        *self
            .per_subject
            .lock()
            .entry(event.snapshot.patient_id)
            .or_insert(0) += 1;
    }

    fn on_tick_end(&self, summary: &TickSummary) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        let critical = summary.critical as u64;
        self.critical_now.store(critical, Ordering::Relaxed);
        Self::update_peak(&self.peak_critical, critical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookRunner;
    use chrono::Utc;
    use std::sync::Arc;
    use types::{Condition, VitalsSnapshot};

    fn make_event(id: u64, tick: Tick, previous: Condition) -> EmergencyEvent {
        EmergencyEvent {
            tick,
            previous,
            snapshot: VitalsSnapshot {
                patient_id: SubjectId(id),
                name: format!("Subject {id}"),
                age: 60,
                heart_rate: 120.0,
                temperature: 38.5,
                spo2: 90,
                condition: Condition::Critical,
                timestamp: Utc::now(),
            },
        }
    }

    fn summary(tick: Tick, critical: usize) -> TickSummary {
        TickSummary {
            tick,
            subjects: 3,
            emergencies: Vec::new(),
            critical,
        }
    }

    #[test]
    fn test_metrics_accumulation() {
        let metrics = Arc::new(MetricsHook::new());
        let mut runner = HookRunner::new();
        runner.add(metrics.clone());

        runner.on_tick_end(&summary(1, 0));
        runner.on_emergency(&make_event(2, 2, Condition::Normal));
        runner.on_tick_end(&summary(2, 1));
        runner.on_emergency(&make_event(2, 3, Condition::Critical));
        runner.on_emergency(&make_event(3, 3, Condition::AtRisk));
        runner.on_tick_end(&summary(3, 2));
        runner.on_tick_end(&summary(4, 2));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_ticks, 4);
        assert_eq!(snapshot.total_emergencies, 3);
        assert_eq!(snapshot.escalations, 2);
        assert_eq!(snapshot.critical_now, 2);
        assert_eq!(snapshot.first_emergency_tick, Some(2));
        assert!((snapshot.avg_emergencies_per_tick - 0.75).abs() < 1e-9);

        let by_subject = metrics.emergencies_by_subject();
        assert_eq!(by_subject.get(&SubjectId(2)), Some(&2));
        assert_eq!(by_subject.get(&SubjectId(3)), Some(&1));
    }

    #[test]
    fn test_peak_tracking() {
        let metrics = MetricsHook::new();
        metrics.on_tick_end(&summary(1, 2));
        metrics.on_tick_end(&summary(2, 5));
        metrics.on_tick_end(&summary(3, 1));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.peak_critical, 5);
        assert_eq!(snapshot.critical_now, 1);
    }

    #[test]
    fn test_reset() {
        let metrics = MetricsHook::new();
        metrics.on_emergency(&make_event(1, 30, Condition::Normal));
        metrics.on_tick_end(&summary(30, 1));
        assert_eq!(metrics.snapshot().total_ticks, 1);

        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert!(metrics.emergencies_by_subject().is_empty());
    }
}
