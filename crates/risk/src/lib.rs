//! Risk classification for vitals snapshots.
//!
//! The simulation engine never classifies anything itself; it only promises
//! that its snapshots carry what a classifier needs. Consumers pick an
//! implementation of [`RiskClassifier`]:
//!
//! - [`ThresholdClassifier`]: built-in per-signal band rules
//! - [`RiskPredictor`]: loads band rules from a JSON model file, falling back
//!   to the built-in rules when no model is present

mod classifier;
mod error;
mod predictor;

pub use classifier::{
    Band, NORMAL_CONFIDENCE, RiskAssessment, RiskClassifier, RiskLevel, RiskThresholds,
    SignalThresholds, ThresholdClassifier,
};
pub use error::{Result, RiskError};
pub use predictor::{ModelSource, RiskPredictor};
