//! Error types for the reconciler crate.

use std::fmt;

/// Result type alias for reconciler operations.
pub type Result<T> = std::result::Result<T, RemoteOperationError>;

/// Failure of a remote fetch or update.
///
/// Never retried. The first one raised during a pass becomes the failure of
/// the whole pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOperationError {
    /// Compute function lookup failed.
    FunctionLookupFailed { function: String, reason: String },
    /// Delivery stream describe failed.
    StreamLookupFailed { stream: String, reason: String },
    /// Destination update was rejected (includes stale version conflicts).
    UpdateFailed { stream: String, reason: String },
    /// Delivery stream has no destination to attach a processor to.
    NoDestinations { stream: String },
    /// Remote response lacked a field this tool relies on.
    MissingField { resource: String, field: String },
    /// Request could not be built from the derived update.
    InvalidRequest { reason: String },
}

impl fmt::Display for RemoteOperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FunctionLookupFailed { function, reason } => {
                write!(f, "failed to look up function '{function}': {reason}")
            }
            Self::StreamLookupFailed { stream, reason } => {
                write!(f, "failed to describe delivery stream '{stream}': {reason}")
            }
            Self::UpdateFailed { stream, reason } => {
                write!(f, "failed to update delivery stream '{stream}': {reason}")
            }
            Self::NoDestinations { stream } => {
                write!(f, "delivery stream '{stream}' has no destinations")
            }
            Self::MissingField { resource, field } => {
                write!(f, "response for '{resource}' is missing {field}")
            }
            Self::InvalidRequest { reason } => {
                write!(f, "invalid update request: {reason}")
            }
        }
    }
}

impl std::error::Error for RemoteOperationError {}

impl RemoteOperationError {
    /// Create a function lookup error.
    pub fn function_lookup_failed(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FunctionLookupFailed {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Create a stream lookup error.
    pub fn stream_lookup_failed(stream: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StreamLookupFailed {
            stream: stream.into(),
            reason: reason.into(),
        }
    }

    /// Create an update error.
    pub fn update_failed(stream: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UpdateFailed {
            stream: stream.into(),
            reason: reason.into(),
        }
    }

    /// Create a no-destinations error.
    pub fn no_destinations(stream: impl Into<String>) -> Self {
        Self::NoDestinations {
            stream: stream.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(resource: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            resource: resource.into(),
            field: field.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RemoteOperationError::update_failed("my-stream", "ConcurrentModificationException");
        assert!(err.to_string().contains("my-stream"));
        assert!(err.to_string().contains("ConcurrentModificationException"));
    }

    #[test]
    fn test_function_lookup_failed() {
        let err = RemoteOperationError::function_lookup_failed("service-env-func2", "not found");
        assert_eq!(
            err.to_string(),
            "failed to look up function 'service-env-func2': not found"
        );
    }

    #[test]
    fn test_no_destinations() {
        let err = RemoteOperationError::no_destinations("empty-stream");
        assert!(err.to_string().contains("empty-stream"));
    }
}
