//! Error types for risk model loading.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("failed to read risk model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("risk model parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid risk thresholds: {0}")]
    InvalidThresholds(String),
}

pub type Result<T> = std::result::Result<T, RiskError>;
