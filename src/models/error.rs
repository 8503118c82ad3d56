use std::path::PathBuf;

/// Conditions that stop the review of one document (or the batch setup).
///
/// Template violations are not errors; they are recorded in the
/// [`ErrorSession`](crate::report::ErrorSession).
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupted notebook: {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("Ran out of cells at #{position}: {path}")]
    SequenceExhausted { path: PathBuf, position: usize },

    #[error("Invalid manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("Invalid config: {0}")]
    Config(String),
}

impl ReviewError {
    /// Whether this error aborts only the current document
    pub fn is_document_fatal(&self) -> bool {
        matches!(
            self,
            ReviewError::Io { .. }
                | ReviewError::Corrupted { .. }
                | ReviewError::SequenceExhausted { .. }
        )
    }
}
