//! Sim-core: the per-subject vital-signs engine.
//!
//! This crate provides the pieces that generate one subject's biometric
//! stream:
//! - Condition-specific baseline sampling
//! - Trend accumulators giving vitals momentum instead of jitter
//! - [`SubjectSimulator`], which advances one subject per tick and may
//!   spontaneously move it into the Critical condition
//! - Error handling for construction and lookups

pub mod baseline;
mod error;
mod subject;
pub mod trend;

pub use baseline::{BaselineProfile, sample_baseline, sample_emergency_baseline};
pub use error::{Result, SimCoreError};
pub use subject::{SubjectSimulator, TickOutcome};
pub use trend::{SignalModel, TrendState};
