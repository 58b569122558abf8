//! Risk predictor with an optional on-disk model.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "model_type": "vital_thresholds",
//!   "model_name": "ward_v2",
//!   "thresholds": {
//!     "heart_rate": {
//!       "elevated": {"low": 55, "high": 100},
//!       "high_risk": {"low": 45, "high": 120}
//!     },
//!     "temperature": {
//!       "elevated": {"low": 36.0, "high": 37.5},
//!       "high_risk": {"low": 35.5, "high": 38.5}
//!     },
//!     "spo2": {
//!       "elevated": {"low": 95, "high": 100},
//!       "high_risk": {"low": 90, "high": 100}
//!     }
//!   }
//! }
//! ```
//!
//! A missing model file is not an error: the predictor logs a warning and
//! falls back to the built-in rules. A file that exists but cannot be read or
//! parsed is an error.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};
use types::VitalsSnapshot;

use crate::classifier::{RiskAssessment, RiskClassifier, RiskThresholds, ThresholdClassifier};
use crate::error::{Result, RiskError};

const MODEL_TYPE: &str = "vital_thresholds";

#[derive(Debug, Deserialize)]
struct ThresholdModelJson {
    model_type: String,
    model_name: String,
    thresholds: RiskThresholds,
}

/// Where the active rules came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Loaded from a model file.
    Loaded(String),
    /// Built-in rules.
    Fallback,
}

/// Front door for risk classification.
#[derive(Debug, Clone)]
pub struct RiskPredictor {
    classifier: ThresholdClassifier,
    source: ModelSource,
}

impl RiskPredictor {
    /// Built-in rules only.
    pub fn fallback() -> Self {
        Self {
            classifier: ThresholdClassifier::new(),
            source: ModelSource::Fallback,
        }
    }

    /// Load a model from `path`, or fall back when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "risk model not found; using fallback assessment");
            return Ok(Self::fallback());
        }
        let content = std::fs::read_to_string(path).map_err(|source| RiskError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let predictor = Self::from_json_str(&content)?;
        info!(path = %path.display(), model = predictor.name(), "risk model loaded");
        Ok(predictor)
    }

    /// Load a model from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: ThresholdModelJson = serde_json::from_str(json)?;

        if parsed.model_type != MODEL_TYPE {
            return Err(RiskError::InvalidThresholds(format!(
                "expected model_type '{MODEL_TYPE}', got '{}'",
                parsed.model_type
            )));
        }
        parsed.thresholds.validate()?;

        Ok(Self {
            classifier: ThresholdClassifier::with_thresholds(
                parsed.model_name.clone(),
                parsed.thresholds,
            ),
            source: ModelSource::Loaded(parsed.model_name),
        })
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ModelSource::Fallback
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        self.classifier.thresholds()
    }
}

impl Default for RiskPredictor {
    fn default() -> Self {
        Self::fallback()
    }
}

impl RiskClassifier for RiskPredictor {
    fn classify(&self, snapshot: &VitalsSnapshot) -> RiskAssessment {
        self.classifier.classify(snapshot)
    }

    fn name(&self) -> &str {
        self.classifier.name()
    }
}
