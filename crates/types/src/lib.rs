//! Core types for the vital-signs simulator.
//!
//! This crate provides the data shared by the engine, the registry and its
//! consumers: subject ids, condition tags, vital triples with their hard
//! limits, snapshot/roster records and simulation rule configuration.

mod config;
mod ids;
mod snapshot;
mod vitals;

pub use config::EmergencyConfig;
pub use ids::{SubjectId, Tick, Timestamp};
pub use snapshot::{RosterEntry, VitalsSnapshot};
pub use vitals::{
    Baseline, Condition, HEART_RATE_LIMITS, SPO2_LIMITS, TEMPERATURE_LIMITS, VitalRange,
    VitalSigns, round_to_tenth,
};
