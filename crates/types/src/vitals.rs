//! Condition tags, vital-sign triples and their hard physiological limits.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Condition
// =============================================================================

/// Clinical condition of a subject.
///
/// Determines which baseline ranges are sampled. The wire names match the
/// downstream dashboard contract (`normal`, `at-risk`, `critical`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "at-risk")]
    AtRisk,
    #[serde(rename = "critical")]
    Critical,
}

impl Condition {
    /// Wire name of the condition.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::AtRisk => "at-risk",
            Self::Critical => "critical",
        }
    }

    pub fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// Hard limits
// =============================================================================

/// Closed interval a derived vital is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalRange {
    pub min: f64,
    pub max: f64,
}

impl VitalRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Heart rate limits in beats per minute.
pub const HEART_RATE_LIMITS: VitalRange = VitalRange::new(50.0, 150.0);

/// Body temperature limits in °C.
pub const TEMPERATURE_LIMITS: VitalRange = VitalRange::new(35.0, 40.0);

/// Oxygen saturation limits in percent.
pub const SPO2_LIMITS: VitalRange = VitalRange::new(75.0, 100.0);

// =============================================================================
// Vital triples
// =============================================================================

/// Center values a subject's vitals drift around for its current condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Beats per minute.
    pub heart_rate: u32,
    /// °C, one decimal.
    pub temperature: f64,
    /// Percent.
    pub spo2: u8,
}

/// Current derived vitals of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub heart_rate: f64,
    pub temperature: f64,
    pub spo2: u8,
}

impl VitalSigns {
    /// Whether every signal sits inside its hard limit.
    pub fn within_limits(&self) -> bool {
        HEART_RATE_LIMITS.contains(self.heart_rate)
            && TEMPERATURE_LIMITS.contains(self.temperature)
            && SPO2_LIMITS.contains(f64::from(self.spo2))
    }
}

impl From<Baseline> for VitalSigns {
    fn from(baseline: Baseline) -> Self {
        Self {
            heart_rate: f64::from(baseline.heart_rate),
            temperature: baseline.temperature,
            spo2: baseline.spo2,
        }
    }
}

/// Round to one decimal place.
#[inline]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_wire_names() {
        assert_eq!(serde_json::to_string(&Condition::Normal).unwrap(), "\"normal\"");
        assert_eq!(serde_json::to_string(&Condition::AtRisk).unwrap(), "\"at-risk\"");
        assert_eq!(serde_json::to_string(&Condition::Critical).unwrap(), "\"critical\"");

        let parsed: Condition = serde_json::from_str("\"at-risk\"").unwrap();
        assert_eq!(parsed, Condition::AtRisk);
        assert_eq!(Condition::Critical.to_string(), "critical");
    }

    #[test]
    fn test_vital_range_clamp() {
        assert_eq!(HEART_RATE_LIMITS.clamp(200.0), 150.0);
        assert_eq!(HEART_RATE_LIMITS.clamp(10.0), 50.0);
        assert_eq!(TEMPERATURE_LIMITS.clamp(37.2), 37.2);
        assert!(SPO2_LIMITS.contains(75.0));
        assert!(!SPO2_LIMITS.contains(74.9));
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(36.54), 36.5);
        assert_eq!(round_to_tenth(36.56), 36.6);
        assert_eq!(round_to_tenth(-0.04), 0.0);
    }

    #[test]
    fn test_vitals_from_baseline() {
        let baseline = Baseline {
            heart_rate: 72,
            temperature: 36.6,
            spo2: 97,
        };
        let vitals = VitalSigns::from(baseline);
        assert_eq!(vitals.heart_rate, 72.0);
        assert_eq!(vitals.temperature, 36.6);
        assert_eq!(vitals.spo2, 97);
        assert!(vitals.within_limits());
    }
}
