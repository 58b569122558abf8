//! Configuration types for simulation rules.

use serde::{Deserialize, Serialize};

/// Controls the spontaneous transition into the Critical condition.
///
/// The defaults (5% per tick, only after 20 updates) are illustrative rather
/// than calibrated, so both knobs are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmergencyConfig {
    /// Probability of an emergency on each eligible tick (0.0 - 1.0).
    pub probability: f64,
    /// Emergencies are only possible once the update counter exceeds this.
    pub min_updates: u64,
}

impl EmergencyConfig {
    pub fn new(probability: f64, min_updates: u64) -> Self {
        Self {
            probability,
            min_updates,
        }
    }

    /// Never trigger an emergency.
    pub fn disabled() -> Self {
        Self::new(0.0, 0)
    }

    /// Set the per-tick probability.
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Set the eligibility threshold.
    pub fn with_min_updates(mut self, min_updates: u64) -> Self {
        self.min_updates = min_updates;
        self
    }

    /// Check that the probability is a real number in `[0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(format!(
                "emergency probability must be within [0, 1], got {}",
                self.probability
            ));
        }
        Ok(())
    }

    /// Whether a subject with `update_count` updates may enter an emergency.
    #[inline]
    pub fn is_eligible(&self, update_count: u64) -> bool {
        update_count > self.min_updates
    }
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self::new(0.05, 20)
    }
}
