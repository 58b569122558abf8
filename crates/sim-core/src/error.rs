//! Error types for sim-core operations.

use thiserror::Error;
use types::SubjectId;

/// Result type for sim-core operations.
pub type Result<T> = std::result::Result<T, SimCoreError>;

/// Errors surfaced by subject construction and registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimCoreError {
    /// Rejected construction input (zero id or age, bad config).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No subject with this id exists.
    #[error("subject not found: {0}")]
    NotFound(SubjectId),
}

impl SimCoreError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
