use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Solver returned HTTP {status}: {payload}")]
    SolverFailure { status: u16, payload: String },

    #[error("Solver did not answer within {timeout:?}")]
    SolverTimeout { timeout: Duration },

    #[error("Solver response failed schema validation: {message}")]
    SchemaValidation { message: String },

    #[error("Solver result does not fit the round: {message}")]
    InvalidMatching { message: String },

    #[error("Data store error: {message}")]
    StoreError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Solver,
    Validation,
    Store,
    Unexpected,
}

impl MatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MatchError::ConfigError { .. }
            | MatchError::MissingConfigError { .. }
            | MatchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MatchError::SolverFailure { .. }
            | MatchError::SolverTimeout { .. }
            | MatchError::HttpError(_) => ErrorCategory::Solver,
            MatchError::SchemaValidation { .. } | MatchError::InvalidMatching { .. } => {
                ErrorCategory::Validation
            }
            MatchError::StoreError { .. } | MatchError::DatabaseError(_) => ErrorCategory::Store,
            MatchError::IoError(_) | MatchError::SerializationError(_) => {
                ErrorCategory::Unexpected
            }
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        MatchError::StoreError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
