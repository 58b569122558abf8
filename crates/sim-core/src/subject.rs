//! Per-subject vitals generator.
//!
//! A [`SubjectSimulator`] owns one subject's identity, baseline, current
//! vitals, trend accumulators, condition and update counter, plus its own
//! random generator. Each call to [`SubjectSimulator::tick`] advances exactly
//! one discrete step:
//!
//! 1. Increment the update counter
//! 2. Random-walk every trend accumulator
//! 3. Re-derive clamped vitals from baseline + scaled trend
//! 4. Roll for an emergency (only once the counter passes the threshold)
//!
//! The emergency roll happens after derivation, so a freshly drawn Critical
//! baseline only shows up in the vitals of the following tick.
//!
//! # Determinism
//!
//! The generator is generic over [`rand::Rng`]. Inject a seeded `StdRng` to
//! replay a subject exactly; the registry gives every subject its own
//! generator so ticks never contend on shared random state.

use chrono::Utc;
use rand::Rng;
use rand::rngs::StdRng;
use types::{
    Baseline, Condition, EmergencyConfig, RosterEntry, SubjectId, VitalSigns, VitalsSnapshot,
    round_to_tenth,
};

use crate::baseline::{sample_baseline, sample_emergency_baseline};
use crate::error::{Result, SimCoreError};
use crate::trend::TrendState;

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Vitals drifted; condition unchanged.
    Steady,
    /// The emergency transition fired at the end of this tick.
    Emergency,
}

impl TickOutcome {
    #[inline]
    pub fn is_emergency(self) -> bool {
        matches!(self, Self::Emergency)
    }
}

/// Simulates the vital signs of one subject.
#[derive(Debug, Clone)]
pub struct SubjectSimulator<R = StdRng> {
    id: SubjectId,
    name: String,
    age: u32,
    condition: Condition,
    baseline: Baseline,
    vitals: VitalSigns,
    trend: TrendState,
    update_count: u64,
    emergency: EmergencyConfig,
    rng: R,
}

impl<R: Rng> SubjectSimulator<R> {
    /// Create a subject with a freshly sampled baseline for `condition`.
    ///
    /// Current vitals start equal to the baseline and every trend accumulator
    /// starts at -1, 0 or 1.
    ///
    /// # Errors
    /// `InvalidArgument` if `id` or `age` is zero.
    pub fn new(
        id: SubjectId,
        name: impl Into<String>,
        age: u32,
        condition: Condition,
        mut rng: R,
    ) -> Result<Self> {
        let name = name.into();
        if !id.is_valid() {
            return Err(SimCoreError::invalid("subject id must be positive"));
        }
        if age == 0 {
            return Err(SimCoreError::invalid(format!("{id}: age must be positive")));
        }

        let baseline = sample_baseline(condition, &mut rng);
        let trend = TrendState::random(&mut rng);

        Ok(Self {
            id,
            name,
            age,
            condition,
            baseline,
            vitals: VitalSigns::from(baseline),
            trend,
            update_count: 0,
            emergency: EmergencyConfig::default(),
            rng,
        })
    }

    /// Create a subject from a roster row.
    pub fn from_entry(entry: &RosterEntry, rng: R) -> Result<Self> {
        Self::new(entry.patient_id, entry.name.clone(), entry.age, entry.condition, rng)
    }

    /// Replace the emergency rule.
    ///
    /// # Errors
    /// `InvalidArgument` if the probability is outside `[0, 1]`.
    pub fn with_emergency(mut self, emergency: EmergencyConfig) -> Result<Self> {
        emergency.validate().map_err(SimCoreError::InvalidArgument)?;
        self.emergency = emergency;
        Ok(self)
    }

    /// Advance one discrete time step.
    pub fn tick(&mut self) -> TickOutcome {
        self.update_count += 1;

        self.trend.advance(&mut self.rng);
        self.vitals = self.trend.derive(&self.baseline);

        // Always draw so the random stream does not depend on eligibility.
        let roll: f64 = self.rng.r#gen();
        if roll < self.emergency.probability && self.emergency.is_eligible(self.update_count) {
            self.trigger_emergency();
            return TickOutcome::Emergency;
        }
        TickOutcome::Steady
    }

    /// Move to Critical and redraw the baseline from the emergency profile.
    ///
    /// One-way. Re-triggering while already Critical only redraws the baseline.
    /// Current vitals are left untouched until the next tick derives them.
    pub fn trigger_emergency(&mut self) {
        self.condition = Condition::Critical;
        self.baseline = sample_emergency_baseline(&mut self.rng);
    }
}

impl<R> SubjectSimulator<R> {
    pub fn id(&self) -> SubjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    pub fn vitals(&self) -> VitalSigns {
        self.vitals
    }

    pub fn trend(&self) -> TrendState {
        self.trend
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn emergency_config(&self) -> EmergencyConfig {
        self.emergency
    }

    /// Immutable point-in-time record stamped with the current wall clock.
    ///
    /// Heart rate is reported to one decimal.
    pub fn snapshot(&self) -> VitalsSnapshot {
        VitalsSnapshot {
            patient_id: self.id,
            name: self.name.clone(),
            age: self.age,
            heart_rate: round_to_tenth(self.vitals.heart_rate),
            temperature: self.vitals.temperature,
            spo2: self.vitals.spo2,
            condition: self.condition,
            timestamp: Utc::now(),
        }
    }

    /// Identity plus condition, without vitals.
    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            patient_id: self.id,
            name: self.name.clone(),
            age: self.age,
            condition: self.condition,
        }
    }
}
