//! Vitals Sim - Main binary
//!
//! Runs a ward of simulated patients and reports their vitals and risk.
//!
//! # Architecture
//!
//! The registry is shared between a simulation thread that ticks it at a
//! fixed cadence and the main thread that reads snapshots, classifies them
//! and reports:
//!
//! ```text
//! ┌────────────────┐   MonitorUpdate    ┌────────────────┐
//! │   Simulation   │ ─────────────────► │    Monitor     │
//! │   (Thread A)   │    (channel)       │ (main thread)  │
//! └───────┬────────┘                    └───────┬────────┘
//!         │ tick_all()                          │ get_all_snapshots()
//!         ▼                                     ▼
//!      ┌──────────────── Arc<SimulationRegistry> ─────────┐
//!      └──────────────────────────────────────────────────┘
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use crossbeam_channel::{Sender, bounded};
use risk::{RiskAssessment, RiskClassifier, RiskPredictor};
use serde::Serialize;
use simulation::{MetricsHook, SimulationRegistry, TickSummary};
use tracing::{info, warn};
use types::{Tick, VitalsSnapshot};

use config::{MonitorConfig, load_roster};

/// Starting point before CLI overrides are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    Default,
    Demo,
    Stress,
}

/// Vitals Sim - simulated ward monitor
#[derive(Parser, Debug)]
#[command(name = "vitals-sim")]
#[command(about = "Simulates patient vital signs with spontaneous emergencies")]
#[command(version)]
struct Args {
    /// Configuration preset
    #[arg(long, value_enum, default_value = "default", env = "VITALS_PRESET")]
    preset: Preset,

    /// Total ticks to run (0 = until interrupted)
    #[arg(long, env = "VITALS_TICKS")]
    ticks: Option<u64>,

    /// Delay between ticks in milliseconds
    #[arg(long, env = "VITALS_TICK_INTERVAL_MS")]
    tick_interval_ms: Option<u64>,

    /// Master seed for reproducible runs
    #[arg(long, env = "VITALS_SEED")]
    seed: Option<u64>,

    /// JSON roster file (array of {patient_id, name, age, condition})
    #[arg(long, env = "VITALS_ROSTER")]
    roster: Option<PathBuf>,

    /// Per-tick emergency probability (0.0 - 1.0)
    #[arg(long, env = "VITALS_EMERGENCY_PROBABILITY")]
    emergency_probability: Option<f64>,

    /// Updates a subject must exceed before an emergency can fire
    #[arg(long, env = "VITALS_EMERGENCY_AFTER")]
    emergency_after: Option<u64>,

    /// Tick subjects on a single thread
    #[arg(long, env = "VITALS_SEQUENTIAL")]
    sequential: bool,

    /// Risk model file; missing files fall back to built-in rules
    #[arg(long, env = "VITALS_RISK_MODEL")]
    risk_model: Option<PathBuf>,

    /// Ticks between ward reports (0 = final report only)
    #[arg(long, env = "VITALS_REPORT_EVERY")]
    report_every: Option<u64>,

    /// Emit JSON lines instead of a text report
    #[arg(long, env = "VITALS_JSON")]
    json: bool,
}

/// Message from the simulation thread to the monitor.
#[derive(Debug)]
enum MonitorUpdate {
    Tick(TickSummary),
    Finished { total_ticks: Tick },
}

/// One JSON output line.
#[derive(Serialize)]
struct ReportLine<'a> {
    tick: Tick,
    #[serde(flatten)]
    snapshot: &'a VitalsSnapshot,
    risk: RiskAssessment,
}

fn build_config(args: &Args) -> Result<MonitorConfig> {
    let mut config = match args.preset {
        Preset::Default => MonitorConfig::new(),
        Preset::Demo => MonitorConfig::demo(),
        Preset::Stress => MonitorConfig::stress_test(),
    };

    if let Some(path) = &args.roster {
        config = config.roster(load_roster(path)?);
    }
    if let Some(ticks) = args.ticks {
        config = config.total_ticks(ticks);
    }
    if let Some(ms) = args.tick_interval_ms {
        config = config.tick_interval_ms(ms);
    }
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(probability) = args.emergency_probability {
        config = config.emergency_probability(probability);
    }
    if let Some(after) = args.emergency_after {
        config = config.emergency_after(after);
    }
    if let Some(every) = args.report_every {
        config = config.report_every(every);
    }
    if let Some(path) = &args.risk_model {
        config = config.risk_model(path.clone());
    }
    if args.sequential {
        config = config.sequential(true);
    }
    if args.json {
        config = config.json(true);
    }

    Ok(config)
}

/// Tick the registry until done or until the monitor hangs up.
fn run_simulation(
    registry: &SimulationRegistry,
    tx: Sender<MonitorUpdate>,
    total_ticks: u64,
    tick_interval_ms: u64,
) {
    let interval = Duration::from_millis(tick_interval_ms);
    loop {
        if total_ticks > 0 && registry.current_tick() >= total_ticks {
            break;
        }

        let started = Instant::now();
        let summary = registry.tick_all();
        if tx.send(MonitorUpdate::Tick(summary)).is_err() {
            return;
        }

        if let Some(remaining) = interval.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }
    let _ = tx.send(MonitorUpdate::Finished {
        total_ticks: registry.current_tick(),
    });
}

fn report(
    registry: &SimulationRegistry,
    classifier: &dyn RiskClassifier,
    tick: Tick,
    json: bool,
) -> Result<()> {
    let snapshots = registry.get_all_snapshots();

    if json {
        for snapshot in &snapshots {
            let line = ReportLine {
                tick,
                snapshot,
                risk: classifier.classify(snapshot),
            };
            println!("{}", serde_json::to_string(&line)?);
        }
        return Ok(());
    }

    println!("── Ward report, tick {tick} ─────────────────────────────────────────────");
    println!(
        "  {:>4}  {:<18} {:>3}  {:>6}  {:>5}  {:>4}  {:<9}  {:<9}  {:>4}",
        "ID", "Name", "Age", "HR", "Temp", "SpO2", "Condition", "Risk", "Conf"
    );
    for snapshot in &snapshots {
        let risk = classifier.classify(snapshot);
        println!(
            "  {:>4}  {:<18} {:>3}  {:>6.1}  {:>5.1}  {:>4}  {:<9}  {:<9}  {:>4.2}",
            snapshot.patient_id.raw(),
            snapshot.name,
            snapshot.age,
            snapshot.heart_rate,
            snapshot.temperature,
            snapshot.spo2,
            snapshot.condition,
            risk.risk_level,
            risk.confidence,
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let predictor = match &config.risk_model {
        Some(path) => RiskPredictor::load(path)
            .with_context(|| format!("loading risk model {}", path.display()))?,
        None => RiskPredictor::fallback(),
    };

    let mut registry = SimulationRegistry::build(&config.roster, config.simulation_config())
        .context("building simulation registry")?;
    let metrics = Arc::new(MetricsHook::new());
    registry.add_hook(metrics.clone());
    let registry = Arc::new(registry);

    info!(
        patients = registry.len(),
        ticks = config.total_ticks,
        tick_interval_ms = config.tick_interval_ms,
        classifier = predictor.name(),
        "starting monitor"
    );
    if config.is_unbounded() {
        warn!("no tick limit set; running until interrupted");
    }

    // Bounded channel: the simulation waits if the monitor falls behind.
    let (tx, rx) = bounded::<MonitorUpdate>(100);

    let sim_handle = {
        let registry = Arc::clone(&registry);
        let total_ticks = config.total_ticks;
        let interval = config.tick_interval_ms;
        thread::spawn(move || run_simulation(&registry, tx, total_ticks, interval))
    };

    let started = Instant::now();
    let mut last_tick = 0;
    for update in rx {
        match update {
            MonitorUpdate::Tick(summary) => {
                last_tick = summary.tick;
                if config.is_report_tick(summary.tick) {
                    report(&registry, &predictor, summary.tick, config.json)?;
                }
            }
            MonitorUpdate::Finished { total_ticks } => {
                last_tick = total_ticks;
                break;
            }
        }
    }

    sim_handle
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))?;
    registry.finish();

    if !config.is_report_tick(last_tick) {
        report(&registry, &predictor, last_tick, config.json)?;
    }

    let elapsed = started.elapsed();
    let m = metrics.snapshot();
    info!(
        ticks = m.total_ticks,
        elapsed_secs = elapsed.as_secs_f64(),
        emergencies = m.total_emergencies,
        escalations = m.escalations,
        critical_now = m.critical_now,
        peak_critical = m.peak_critical,
        "monitor finished"
    );

    Ok(())
}
