//! Top-level error type for hook and command execution.

use std::path::PathBuf;

use fhsync_core::ConfigurationError;
use fhsync_reconciler::RemoteOperationError;
use thiserror::Error;

/// Anything that can abort a deployment step.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Definition(#[from] fhsync_core::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Remote(#[from] RemoteOperationError),

    #[error("unknown lifecycle hook '{0}'")]
    UnknownHook(String),

    // Tool configuration file
    #[error("failed to read config '{path}': {reason}")]
    ConfigReadFailed { path: PathBuf, reason: String },

    #[error("failed to parse config '{path}': {reason}")]
    ConfigParseFailed { path: PathBuf, reason: String },
}

impl SyncError {
    /// Create a config read error.
    pub fn config_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config parse error.
    pub fn config_parse_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for hook and command execution.
pub type Result<T> = std::result::Result<T, SyncError>;
