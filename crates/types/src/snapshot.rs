//! Read-side records handed to display, alerting and classification layers.
//!
//! Field names are the downstream contract and must not change:
//!
//! ```json
//! {"patient_id": 1, "name": "John Doe", "age": 65, "heart_rate": 72.4,
//!  "temperature": 36.6, "spo2": 97, "condition": "normal",
//!  "timestamp": "2024-05-01T12:00:00.000Z"}
//! ```

use serde::{Deserialize, Serialize};

use crate::ids::{SubjectId, Timestamp};
use crate::vitals::{Condition, VitalSigns};

/// Point-in-time read of a subject's identity, vitals and condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    pub patient_id: SubjectId,
    pub name: String,
    pub age: u32,
    /// Beats per minute, one decimal.
    pub heart_rate: f64,
    /// °C, one decimal.
    pub temperature: f64,
    pub spo2: u8,
    pub condition: Condition,
    /// Wall clock time of the read (not simulation time).
    pub timestamp: Timestamp,
}

impl VitalsSnapshot {
    /// The numeric vitals of this snapshot.
    pub fn vitals(&self) -> VitalSigns {
        VitalSigns {
            heart_rate: self.heart_rate,
            temperature: self.temperature,
            spo2: self.spo2,
        }
    }

    /// Compare everything except the timestamp.
    pub fn same_reading(&self, other: &Self) -> bool {
        self.patient_id == other.patient_id
            && self.name == other.name
            && self.age == other.age
            && self.heart_rate == other.heart_rate
            && self.temperature == other.temperature
            && self.spo2 == other.spo2
            && self.condition == other.condition
    }
}

/// Lightweight listing entry without vitals.
///
/// Also the shape of one roster row when a registry is built from config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub patient_id: SubjectId,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub condition: Condition,
}

impl RosterEntry {
    pub fn new(id: u64, name: impl Into<String>, age: u32, condition: Condition) -> Self {
        Self {
            patient_id: SubjectId(id),
            name: name.into(),
            age,
            condition,
        }
    }
}
