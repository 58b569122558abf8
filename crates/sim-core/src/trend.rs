//! Trend accumulators driving gradual vital drift.
//!
//! Each signal carries an unbounded signed scalar that takes a small random
//! step every tick. The derived vital is `baseline + trend * scale`, clamped
//! to the signal's hard limits. Because the step is applied to the trend and
//! not to the vital itself, vitals keep momentum and drift smoothly instead
//! of jittering independently each tick.

use rand::Rng;
use types::{
    Baseline, HEART_RATE_LIMITS, SPO2_LIMITS, TEMPERATURE_LIMITS, VitalRange, VitalSigns,
    round_to_tenth,
};

/// Drift parameters for one signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalModel {
    /// Per-tick trend step is drawn from `[-step, step]`.
    pub step: f64,
    /// Multiplier applied to the trend before adding it to the baseline.
    pub scale: f64,
    /// Hard clamp for the derived value.
    pub limits: VitalRange,
}

impl SignalModel {
    /// Draw one trend increment.
    #[inline]
    pub fn perturb<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(-self.step..=self.step)
    }

    /// Baseline shifted by the scaled trend, clamped.
    #[inline]
    pub fn derive(&self, baseline: f64, trend: f64) -> f64 {
        self.limits.clamp(baseline + trend * self.scale)
    }
}

pub const HEART_RATE_MODEL: SignalModel = SignalModel {
    step: 0.3,
    scale: 10.0,
    limits: HEART_RATE_LIMITS,
};

pub const TEMPERATURE_MODEL: SignalModel = SignalModel {
    step: 0.1,
    scale: 0.5,
    limits: TEMPERATURE_LIMITS,
};

pub const SPO2_MODEL: SignalModel = SignalModel {
    step: 0.2,
    scale: 3.0,
    limits: SPO2_LIMITS,
};

/// One trend accumulator per signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendState {
    pub heart_rate: f64,
    pub temperature: f64,
    pub spo2: f64,
}

impl TrendState {
    /// Start each accumulator at -1, 0 or 1, uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            heart_rate: f64::from(rng.gen_range(-1i32..=1)),
            temperature: f64::from(rng.gen_range(-1i32..=1)),
            spo2: f64::from(rng.gen_range(-1i32..=1)),
        }
    }

    /// Take one random-walk step on every accumulator. Never resets.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.heart_rate += HEART_RATE_MODEL.perturb(rng);
        self.temperature += TEMPERATURE_MODEL.perturb(rng);
        self.spo2 += SPO2_MODEL.perturb(rng);
    }

    /// Derive clamped vitals from a baseline.
    ///
    /// Temperature is rounded to one decimal; SpO2 is truncated to an integer
    /// before clamping.
    pub fn derive(&self, baseline: &Baseline) -> VitalSigns {
        let heart_rate = HEART_RATE_MODEL.derive(f64::from(baseline.heart_rate), self.heart_rate);
        let temperature =
            round_to_tenth(TEMPERATURE_MODEL.derive(baseline.temperature, self.temperature));
        let spo2 = SPO2_MODEL
            .limits
            .clamp((f64::from(baseline.spo2) + self.spo2 * SPO2_MODEL.scale).trunc());

        VitalSigns {
            heart_rate,
            temperature,
            spo2: spo2 as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn baseline() -> Baseline {
        Baseline {
            heart_rate: 70,
            temperature: 36.5,
            spo2: 96,
        }
    }

    #[test]
    fn test_initial_trend_values() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let t = TrendState::random(&mut rng);
            for v in [t.heart_rate, t.temperature, t.spo2] {
                assert!(v == -1.0 || v == 0.0 || v == 1.0, "unexpected trend {v}");
            }
        }
    }

    #[test]
    fn test_advance_step_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut trend = TrendState {
            heart_rate: 0.0,
            temperature: 0.0,
            spo2: 0.0,
        };
        for _ in 0..1000 {
            let before = trend;
            trend.advance(&mut rng);
            assert!((trend.heart_rate - before.heart_rate).abs() <= 0.3 + 1e-12);
            assert!((trend.temperature - before.temperature).abs() <= 0.1 + 1e-12);
            assert!((trend.spo2 - before.spo2).abs() <= 0.2 + 1e-12);
        }
    }

    #[test]
    fn test_derive_applies_scale() {
        let trend = TrendState {
            heart_rate: 1.0,
            temperature: -1.0,
            spo2: 0.5,
        };
        let vitals = trend.derive(&baseline());
        assert_eq!(vitals.heart_rate, 80.0);
        assert_eq!(vitals.temperature, 36.0);
        assert_eq!(vitals.spo2, 97); // 96 + 1.5 truncated
    }

    #[test]
    fn test_derive_clamps_wandering_trend() {
        let high = TrendState {
            heart_rate: 50.0,
            temperature: 50.0,
            spo2: 50.0,
        };
        let vitals = high.derive(&baseline());
        assert_eq!(vitals.heart_rate, 150.0);
        assert_eq!(vitals.temperature, 40.0);
        assert_eq!(vitals.spo2, 100);

        let low = TrendState {
            heart_rate: -50.0,
            temperature: -50.0,
            spo2: -50.0,
        };
        let vitals = low.derive(&baseline());
        assert_eq!(vitals.heart_rate, 50.0);
        assert_eq!(vitals.temperature, 35.0);
        assert_eq!(vitals.spo2, 75);
    }

    #[test]
    fn test_spo2_truncates_toward_zero() {
        let trend = TrendState {
            heart_rate: 0.0,
            temperature: 0.0,
            spo2: -0.1,
        };
        // 96 - 0.3 = 95.7 -> 95
        assert_eq!(trend.derive(&baseline()).spo2, 95);
    }
}
