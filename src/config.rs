//! Central configuration for the vitals monitor.
//!
//! Everything the driver needs to build a registry and run it lives here:
//! the roster, the tick cadence and the emergency rule.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use simulation::SimulationConfig;
use types::{Condition, EmergencyConfig, RosterEntry};

/// Master configuration for a monitor run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Simulation Control
    // ─────────────────────────────────────────────────────────────────────────
    /// Subjects to simulate.
    pub roster: Vec<RosterEntry>,
    /// Total ticks to run (0 = until interrupted).
    pub total_ticks: u64,
    /// Delay between ticks in milliseconds (0 = fastest).
    pub tick_interval_ms: u64,
    /// Master seed for reproducible runs.
    pub seed: Option<u64>,
    /// Emergency rule for every subject.
    pub emergency: EmergencyConfig,
    /// Tick subjects on one thread.
    pub force_sequential: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────────
    /// Ticks between ward reports (0 = final report only).
    pub report_every: u64,
    /// Optional risk model file.
    pub risk_model: Option<PathBuf>,
    /// Print one JSON line per snapshot instead of a text report.
    pub json: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            total_ticks: 300,
            tick_interval_ms: 1000,
            seed: None,
            emergency: EmergencyConfig::default(),
            force_sequential: false,
            report_every: 10,
            risk_model: None,
            json: false,
        }
    }
}

/// The demo ward: ten patients, three of them at risk.
pub fn default_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new(1, "John Doe", 65, Condition::Normal),
        RosterEntry::new(2, "Sarah Smith", 58, Condition::Normal),
        RosterEntry::new(3, "Mike Johnson", 72, Condition::AtRisk),
        RosterEntry::new(4, "Emily Davis", 51, Condition::Normal),
        RosterEntry::new(5, "Robert Brown", 68, Condition::Normal),
        RosterEntry::new(6, "Lisa Wilson", 55, Condition::AtRisk),
        RosterEntry::new(7, "James Taylor", 75, Condition::Normal),
        RosterEntry::new(8, "Jennifer Lee", 62, Condition::Normal),
        RosterEntry::new(9, "David Anderson", 70, Condition::AtRisk),
        RosterEntry::new(10, "Mary Thomas", 60, Condition::Normal),
    ]
}

/// Read a roster from a JSON array of `{patient_id, name, age, condition}`.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    roster_from_json_str(&content).with_context(|| format!("invalid roster {}", path.display()))
}

pub fn roster_from_json_str(json: &str) -> Result<Vec<RosterEntry>> {
    let roster: Vec<RosterEntry> = serde_json::from_str(json)?;
    Ok(roster)
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters for fluent configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn roster(mut self, roster: Vec<RosterEntry>) -> Self {
        self.roster = roster;
        self
    }

    pub fn total_ticks(mut self, ticks: u64) -> Self {
        self.total_ticks = ticks;
        self
    }

    pub fn tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn emergency_probability(mut self, probability: f64) -> Self {
        self.emergency.probability = probability;
        self
    }

    pub fn emergency_after(mut self, min_updates: u64) -> Self {
        self.emergency.min_updates = min_updates;
        self
    }

    pub fn sequential(mut self, force_sequential: bool) -> Self {
        self.force_sequential = force_sequential;
        self
    }

    pub fn report_every(mut self, ticks: u64) -> Self {
        self.report_every = ticks;
        self
    }

    pub fn risk_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.risk_model = Some(path.into());
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Registry configuration for this run.
    pub fn simulation_config(&self) -> SimulationConfig {
        let config = SimulationConfig::new()
            .with_emergency(self.emergency)
            .with_sequential(self.force_sequential);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.total_ticks == 0
    }

    /// Whether `tick` is a report tick.
    pub fn is_report_tick(&self, tick: u64) -> bool {
        self.report_every > 0 && tick % self.report_every == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preset Configurations
// ─────────────────────────────────────────────────────────────────────────────

impl MonitorConfig {
    /// Quick demo: short run, fast cadence, frequent emergencies.
    pub fn demo() -> Self {
        Self::default()
            .total_ticks(60)
            .tick_interval_ms(100)
            .emergency_probability(0.2)
            .report_every(5)
    }

    /// Stress test: a large generated ward ticked as fast as possible.
    pub fn stress_test() -> Self {
        let conditions = [Condition::Normal, Condition::Normal, Condition::AtRisk];
        let roster = (1..=10_000u64)
            .map(|id| {
                RosterEntry::new(
                    id,
                    format!("Subject {id:05}"),
                    20 + (id % 70) as u32,
                    conditions[(id % 3) as usize],
                )
            })
            .collect();
        Self::default()
            .roster(roster)
            .total_ticks(1_000)
            .tick_interval_ms(0)
            .report_every(100)
    }
}
