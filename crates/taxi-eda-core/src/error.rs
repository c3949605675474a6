// crates/taxi-eda-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdaError {
    #[error("failed to load dataset '{}': {reason}", path.display())]
    DatasetLoad { path: PathBuf, reason: String },

    #[error("{pipeline} requires column '{column}', which is not in the trip table")]
    MissingColumn {
        pipeline: &'static str,
        column: String,
    },

    #[error("'{value}' is not a valid {kind} selection; expected one of: {}", allowed.join(", "))]
    InvalidSelection {
        kind: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("no description is catalogued for column '{column}'")]
    UnknownColumn { column: String },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl EdaError {
    /// Errors the UI recovers from locally instead of surfacing as failures.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EdaError::InvalidSelection { .. } | EdaError::UnknownColumn { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EdaError>;
