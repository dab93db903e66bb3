//! SDK Error Types
//!
//! Defines error types for the Mnemo SDK.

use thiserror::Error;

/// SDK Result type alias
pub type SDKResult<T> = Result<T, SDKError>;

/// SDK errors
#[derive(Debug, Error)]
pub enum SDKError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] mnemo_core::ConfigValidationError),

    /// Error raised by the core layer or a collaborator
    #[error(transparent)]
    Core(#[from] mnemo_core::Error),

    /// Invalid operation
    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SDKError {
    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Check if this error is a rejected snapshot
    pub fn is_snapshot_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_snapshot_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SDKError::invalid_operation("cannot learn an empty vector");
        assert!(matches!(err, SDKError::InvalidOperation { .. }));
        assert!(err.to_string().contains("empty vector"));
        assert!(!err.is_snapshot_error());
    }

    #[test]
    fn test_core_errors_pass_through() {
        let err: SDKError = mnemo_core::Error::SamplesNotSequence.into();
        assert!(err.is_snapshot_error());
        assert!(err.to_string().contains("samples"));
    }
}
