//! Identifier and time types shared across the simulator.

use chrono::{DateTime, Utc};
use derive_more::{From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a simulated patient.
///
/// Serializes as a bare integer so snapshots keep the `patient_id: int` shape.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    From,
    Into,
)]
pub struct SubjectId(pub u64);

impl SubjectId {
    /// Ids must be positive; zero is reserved as "unassigned".
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 > 0
    }

    /// Raw integer value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Patient#{}", self.0)
    }
}

/// Simulation tick (discrete time step).
pub type Tick = u64;

/// Wall clock time embedded in snapshots.
pub type Timestamp = DateTime<Utc>;
