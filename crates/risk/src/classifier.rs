//! Rule-based risk classification over a vitals snapshot.
//!
//! Each signal is checked against two bands. A value outside the `elevated`
//! band flags the signal as ELEVATED; outside the wider `high_risk` band it
//! flags HIGH_RISK. The overall level is the worst flag across signals.
//!
//! Confidence grows with agreement: a level backed by all three signals is
//! reported at 0.9, a level backed by one at 0.7. A snapshot with no flags is
//! NORMAL at 0.9.

use std::fmt;

use serde::{Deserialize, Serialize};
use types::{VitalSigns, VitalsSnapshot};

use crate::error::{Result, RiskError};

/// Confidence reported when nothing is flagged.
pub const NORMAL_CONFIDENCE: f64 = 0.9;

/// Coarse risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Normal,
    Elevated,
    HighRisk,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Elevated => "ELEVATED",
            Self::HighRisk => "HIGH_RISK",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classifier output: `{"risk_level": "...", "confidence": 0.0..=1.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub confidence: f64,
}

impl RiskAssessment {
    /// Build an assessment, clamping confidence into `[0, 1]`.
    pub fn new(risk_level: RiskLevel, confidence: f64) -> Self {
        Self {
            risk_level,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Anything that can turn a snapshot into a risk label.
///
/// Implementations must be pure with respect to the snapshot: the engine
/// never calls a classifier itself, consumers do.
pub trait RiskClassifier: Send + Sync {
    fn classify(&self, snapshot: &VitalsSnapshot) -> RiskAssessment;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Closed interval of unflagged values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    fn encloses(&self, other: &Band) -> bool {
        self.low <= other.low && other.high <= self.high
    }
}

/// Bands for one signal. `high_risk` must enclose `elevated`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    pub elevated: Band,
    pub high_risk: Band,
}

impl SignalThresholds {
    pub const fn new(elevated: Band, high_risk: Band) -> Self {
        Self {
            elevated,
            high_risk,
        }
    }

    pub fn level(&self, value: f64) -> RiskLevel {
        if !self.high_risk.contains(value) {
            RiskLevel::HighRisk
        } else if !self.elevated.contains(value) {
            RiskLevel::Elevated
        } else {
            RiskLevel::Normal
        }
    }

    fn validate(&self, signal: &str) -> std::result::Result<(), String> {
        for band in [self.elevated, self.high_risk] {
            if !band.low.is_finite() || !band.high.is_finite() || band.low > band.high {
                return Err(format!("{signal}: band {band:?} is not a finite interval"));
            }
        }
        if !self.high_risk.encloses(&self.elevated) {
            return Err(format!("{signal}: high_risk band must enclose elevated band"));
        }
        Ok(())
    }
}

/// Per-signal thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub heart_rate: SignalThresholds,
    pub temperature: SignalThresholds,
    pub spo2: SignalThresholds,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            heart_rate: SignalThresholds::new(Band::new(55.0, 100.0), Band::new(45.0, 120.0)),
            temperature: SignalThresholds::new(Band::new(36.0, 37.5), Band::new(35.5, 38.5)),
            spo2: SignalThresholds::new(Band::new(95.0, 100.0), Band::new(90.0, 100.0)),
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> Result<()> {
        self.heart_rate
            .validate("heart_rate")
            .and_then(|_| self.temperature.validate("temperature"))
            .and_then(|_| self.spo2.validate("spo2"))
            .map_err(RiskError::InvalidThresholds)
    }

    /// Level per signal: heart rate, temperature, SpO2.
    pub fn levels(&self, vitals: &VitalSigns) -> [RiskLevel; 3] {
        [
            self.heart_rate.level(vitals.heart_rate),
            self.temperature.level(vitals.temperature),
            self.spo2.level(f64::from(vitals.spo2)),
        ]
    }
}

/// Built-in rule-based classifier.
#[derive(Debug, Clone)]
pub struct ThresholdClassifier {
    name: String,
    thresholds: RiskThresholds,
}

impl ThresholdClassifier {
    pub fn new() -> Self {
        Self::with_thresholds("threshold_rules", RiskThresholds::default())
    }

    pub fn with_thresholds(name: impl Into<String>, thresholds: RiskThresholds) -> Self {
        Self {
            name: name.into(),
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Classify raw vitals.
    pub fn assess(&self, vitals: &VitalSigns) -> RiskAssessment {
        let levels = self.thresholds.levels(vitals);
        let worst = levels.iter().copied().max().unwrap_or(RiskLevel::Normal);
        if worst == RiskLevel::Normal {
            return RiskAssessment::new(RiskLevel::Normal, NORMAL_CONFIDENCE);
        }
        let agreeing = levels.iter().filter(|&&l| l == worst).count();
        RiskAssessment::new(worst, 0.6 + 0.3 * agreeing as f64 / levels.len() as f64)
    }
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskClassifier for ThresholdClassifier {
    fn classify(&self, snapshot: &VitalsSnapshot) -> RiskAssessment {
        self.assess(&snapshot.vitals())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
