//! Error types for mnemo-core.

use thiserror::Error;

/// Result type alias using mnemo-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for mnemo operations
#[derive(Error, Debug)]
pub enum Error {
    // Snapshot import errors
    #[error("Snapshot is missing: expected an object with `clusters` and `samples`, got null")]
    SnapshotMissing,

    #[error("Snapshot must be a JSON object, got {0}")]
    SnapshotNotObject(String),

    #[error("Snapshot field `clusters` must be an array")]
    ClustersNotSequence,

    #[error("Snapshot field `samples` must be an array")]
    SamplesNotSequence,

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    // Collaborator errors
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Create a backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Check if this error came from a snapshot shape violation
    pub fn is_snapshot_error(&self) -> bool {
        matches!(
            self,
            Self::SnapshotMissing
                | Self::SnapshotNotObject(_)
                | Self::ClustersNotSequence
                | Self::SamplesNotSequence
                | Self::MalformedSnapshot(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_errors_are_distinct() {
        let missing = Error::SnapshotMissing.to_string();
        let clusters = Error::ClustersNotSequence.to_string();
        let samples = Error::SamplesNotSequence.to_string();

        assert!(missing.contains("null"));
        assert!(clusters.contains("clusters"));
        assert!(samples.contains("samples"));
        assert_ne!(clusters, samples);
    }

    #[test]
    fn test_is_snapshot_error() {
        assert!(Error::ClustersNotSequence.is_snapshot_error());
        assert!(!Error::backend("down").is_snapshot_error());
        assert!(Error::backend("down").to_string().contains("down"));
    }
}
