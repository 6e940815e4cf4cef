//! Core error types for firehose-sync.
//!
//! All errors are explicit, typed, and recoverable - no panics allowed.

use std::path::PathBuf;

use thiserror::Error;

/// A service definition that cannot be synchronized as written.
///
/// Raised by validation before any remote call is made. Always scoped to the
/// function that owns the offending trigger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing firehose deliveryStreamName for function '{function}'")]
    MissingDeliveryStreamName { function: String },
}

impl ConfigurationError {
    /// Create a missing delivery stream name error.
    pub fn missing_delivery_stream_name(function: impl Into<String>) -> Self {
        Self::MissingDeliveryStreamName {
            function: function.into(),
        }
    }

    /// Identifier of the function the error belongs to.
    #[must_use]
    pub fn function(&self) -> &str {
        match self {
            Self::MissingDeliveryStreamName { function } => function,
        }
    }
}

/// The standard Result type for definition loading and validation.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for definition loading and validation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    // I/O errors
    #[error("failed to read file '{path}': {reason}")]
    FileReadFailed { path: PathBuf, reason: String },

    // Parsing errors
    #[error("JSON parse error: {reason}")]
    JsonParseFailed { reason: String },

    #[error("YAML parse error: {reason}")]
    YamlParseFailed { reason: String },

    #[error("invalid service definition: {reason}")]
    InvalidDefinition { reason: String },
}

impl Error {
    /// Create a file read error.
    pub fn file_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse_failed(reason: impl Into<String>) -> Self {
        Self::JsonParseFailed {
            reason: reason.into(),
        }
    }

    /// Create a YAML parse error.
    pub fn yaml_parse_failed(reason: impl Into<String>) -> Self {
        Self::YamlParseFailed {
            reason: reason.into(),
        }
    }

    /// Create an invalid definition error.
    pub fn invalid_definition(reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            reason: reason.into(),
        }
    }
}
