//! Error types for parameter validation, loading and reporting

use thiserror::Error;

/// Errors produced by the projection model and its loaders
#[derive(Debug, Error)]
pub enum ModelError {
    /// A parameter set or override failed validation
    #[error("Invalid configuration: {field} - {reason}")]
    Configuration { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Unknown scenario preset name
    #[error("Unknown scenario: {0} (expected pessimistic, realistic or optimistic)")]
    UnknownScenario(String),
}

impl ModelError {
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ModelError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
