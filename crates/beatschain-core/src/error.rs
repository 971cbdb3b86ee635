//! Error types module
//!
//! Errors are split by how the orchestrator treats them:
//! - [`ValidationError`] and [`MetadataError`] reject a submission before any network call.
//! - [`UploadError`] is what a failed job surfaces to its caller.
//!
//! Failures of best-effort stages (storage, transcoding, notification, attribution) are
//! defined next to their clients and never reach this module: the orchestrator absorbs
//! them into placeholder values.

use crate::models::UploadStage;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as rejected input
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Reasons a file descriptor is rejected by the validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("file is empty")]
    Empty,

    #[error("file too large (max {} MB)", .max_bytes / 1024 / 1024)]
    TooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("unsupported file type: {content_type} (allowed: {allowed})")]
    UnsupportedType {
        content_type: String,
        allowed: String,
    },
}

/// Reasons user-supplied metadata overrides are rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata key cannot be empty")]
    EmptyKey,

    #[error("metadata key '{key}' exceeds maximum length of {max} characters")]
    KeyTooLong { key: String, max: usize },

    #[error("metadata key '{0}' contains invalid characters")]
    InvalidKeyCharacters(String),

    #[error("metadata key '{0}' uses a reserved prefix")]
    ReservedKey(String),

    #[error("metadata value for '{0}' must be a string, number or boolean")]
    NonScalarValue(String),

    #[error("metadata value for '{key}' exceeds maximum length of {max} characters")]
    ValueTooLong { key: String, max: usize },

    #[error("metadata contains {count} keys, but maximum allowed is {max}")]
    TooManyKeys { count: usize, max: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid metadata: {0}")]
    InvalidMetadata(#[from] MetadataError),

    #[error("minting failed: {0}")]
    Mint(String),

    #[error("invalid stage transition from {from} to {to}")]
    InvalidTransition { from: UploadStage, to: UploadStage },

    #[error("job is terminal at stage {0}")]
    JobTerminal(UploadStage),

    #[error("configuration error: {0}")]
    Config(String),
}

impl UploadError {
    /// Machine-readable error code (e.g., "VALIDATION_FAILED")
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "VALIDATION_FAILED",
            UploadError::InvalidMetadata(_) => "INVALID_METADATA",
            UploadError::Mint(_) => "MINT_FAILED",
            UploadError::InvalidTransition { .. } => "INVALID_TRANSITION",
            UploadError::JobTerminal(_) => "JOB_TERMINAL",
            UploadError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Whether the error ends the job in the `error` stage.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            UploadError::Validation(_) | UploadError::InvalidMetadata(_) | UploadError::Mint(_)
        )
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            UploadError::Validation(_) | UploadError::InvalidMetadata(_) => LogLevel::Debug,
            UploadError::Mint(_)
            | UploadError::InvalidTransition { .. }
            | UploadError::JobTerminal(_)
            | UploadError::Config(_) => LogLevel::Error,
        }
    }
}
