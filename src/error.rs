use thiserror::Error;

/// Main error type for the screening service and trainer
#[derive(Error, Debug)]
pub enum GuardianError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Dataset errors (training input)
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Non-numeric value {value:?} in column '{column}' at line {line}")]
    NonNumeric {
        column: String,
        line: usize,
        value: String,
    },

    #[error("Invalid target value {value} at line {line} (expected 0 or 1)")]
    InvalidTarget { line: usize, value: String },

    // Model errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // Artifact errors (inference startup)
    #[error("Artifact error: {path}: {reason}")]
    Artifact { path: String, reason: String },

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    // Input errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown option {value:?} for field '{field}'")]
    UnknownOption { field: String, value: String },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl GuardianError {
    pub fn artifact(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        GuardianError::Artifact {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GuardianError::Validation(_)
                | GuardianError::UnknownOption { .. }
                | GuardianError::DimensionMismatch { .. }
        )
    }
}

/// Result type alias for GuardianError
pub type Result<T> = std::result::Result<T, GuardianError>;
