//! Error types for CommentLens

/// Result type alias using CommentLens's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for CommentLens operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scorer failed to build or evaluate
    #[error("classifier error: {0}")]
    Classifier(String),

    /// A comment could not be analyzed as a whole
    #[error("analysis failed for comment {comment_id}: {reason}")]
    Analysis { comment_id: String, reason: String },

    /// The external toxicity service failed or is unavailable
    #[error("external service error: {0}")]
    External(String),

    /// Comment store errors
    #[error("store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new analysis error for a comment
    pub fn analysis(comment_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Analysis {
            comment_id: comment_id.into(),
            reason: reason.into(),
        }
    }

    /// Create a new external service error
    pub fn external(msg: impl Into<String>) -> Self {
        Self::External(msg.into())
    }

    /// Create a new store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
