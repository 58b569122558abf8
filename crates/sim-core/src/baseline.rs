//! Condition-specific baseline sampling.
//!
//! | Profile              | HR (bpm)   | Temp (°C)           | SpO2 (%) |
//! |----------------------|------------|---------------------|----------|
//! | Normal               | 60..=80    | 36.5 + U(-0.5, 0.5) | 95..=98  |
//! | AtRisk               | 85..=100   | 37.5 + U(-0.3, 0.3) | 90..=94  |
//! | Critical             | 105..=130  | 38.5 + U(-0.2, 0.2) | 85..=92  |
//! | Emergency (Critical) | 110..=130  | 38.5 + U(-0.2, 0.3) | 85..=92  |

use std::ops::RangeInclusive;

use rand::Rng;
use types::{Baseline, Condition, round_to_tenth};

/// Sampling ranges for one baseline profile.
#[derive(Debug, Clone)]
pub struct BaselineProfile {
    pub heart_rate: RangeInclusive<u32>,
    pub temperature_center: f64,
    /// Offset added to the center, drawn from `low..=high`.
    pub temperature_offset: (f64, f64),
    pub spo2: RangeInclusive<u8>,
}

impl BaselineProfile {
    /// Draw a baseline. Temperature is rounded to one decimal.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Baseline {
        let heart_rate = rng.gen_range(self.heart_rate.clone());
        let (low, high) = self.temperature_offset;
        let temperature = round_to_tenth(self.temperature_center + rng.gen_range(low..=high));
        let spo2 = rng.gen_range(self.spo2.clone());

        Baseline {
            heart_rate,
            temperature,
            spo2,
        }
    }
}

pub static NORMAL_PROFILE: BaselineProfile = BaselineProfile {
    heart_rate: 60..=80,
    temperature_center: 36.5,
    temperature_offset: (-0.5, 0.5),
    spo2: 95..=98,
};

pub static AT_RISK_PROFILE: BaselineProfile = BaselineProfile {
    heart_rate: 85..=100,
    temperature_center: 37.5,
    temperature_offset: (-0.3, 0.3),
    spo2: 90..=94,
};

pub static CRITICAL_PROFILE: BaselineProfile = BaselineProfile {
    heart_rate: 105..=130,
    temperature_center: 38.5,
    temperature_offset: (-0.2, 0.2),
    spo2: 85..=92,
};

/// Used when a subject spontaneously enters an emergency.
pub static EMERGENCY_PROFILE: BaselineProfile = BaselineProfile {
    heart_rate: 110..=130,
    temperature_center: 38.5,
    temperature_offset: (-0.2, 0.3),
    spo2: 85..=92,
};

/// Profile sampled when a subject is created with `condition`.
pub fn profile_for(condition: Condition) -> &'static BaselineProfile {
    match condition {
        Condition::Normal => &NORMAL_PROFILE,
        Condition::AtRisk => &AT_RISK_PROFILE,
        Condition::Critical => &CRITICAL_PROFILE,
    }
}

/// Draw a creation-time baseline for `condition`.
pub fn sample_baseline<R: Rng + ?Sized>(condition: Condition, rng: &mut R) -> Baseline {
    profile_for(condition).sample(rng)
}

/// Draw a baseline for the emergency transition.
pub fn sample_emergency_baseline<R: Rng + ?Sized>(rng: &mut R) -> Baseline {
    EMERGENCY_PROFILE.sample(rng)
}
