/// Error type for question persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store refused or failed to write the question.
    #[error("Failed to save question")]
    SaveFailed,

    /// The store refused or failed to delete the question.
    #[error("Failed to remove question")]
    RemoveFailed,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored questions are malformed: {0}")]
    Serialization(String),

    /// Adapter-specific failure.
    #[error("Storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StorageError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}

/// Error type for answer submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The backend did not accept the answers.
    #[error("Failed to save answers")]
    Rejected,

    /// Adapter-specific failure.
    #[error("Submission backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl SubmitError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}
