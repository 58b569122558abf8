//! Simulation crate: the registry that owns and advances every subject.
//!
//! This crate provides:
//! - [`SimulationRegistry`]: fixed id → subject mapping built from a roster
//! - [`SimulationConfig`]: seed, emergency rule and execution mode
//! - Hook-based observation ([`RegistryHook`], [`MetricsHook`])
//!
//! # Example
//!
//! ```ignore
//! use simulation::{MetricsHook, SimulationConfig, SimulationRegistry};
//! use std::sync::Arc;
//! use types::{Condition, RosterEntry};
//!
//! let roster = vec![RosterEntry::new(1, "John Doe", 65, Condition::Normal)];
//! let mut registry = SimulationRegistry::build(&roster, SimulationConfig::new().with_seed(1))?;
//! let metrics = Arc::new(MetricsHook::new());
//! registry.add_hook(metrics.clone());
//!
//! let registry = Arc::new(registry);
//! for _ in 0..100 {
//!     registry.tick_all();
//! }
//! println!("{:?}", metrics.snapshot());
//! ```
//!
//! # Parallel Execution
//!
//! With the `parallel` feature, `tick_all` fans subjects out over rayon.
//! Every subject owns its generator, so a seeded run produces the same
//! readings whichever mode is used.

pub mod config;
mod hooks;
mod metrics;
mod registry;

pub use config::SimulationConfig;
pub use hooks::{EmergencyEvent, HookRunner, NoOpHook, RegistryHook, TickSummary};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use registry::SimulationRegistry;
