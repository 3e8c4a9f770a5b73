use thiserror::Error;

/// Unified error type for release pipeline operations
#[derive(Error, Debug)]
pub enum SemrelError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Release store error: {0}")]
    Store(String),

    #[error("Build failed for target '{target}': {reason}")]
    Build { target: String, reason: String },

    #[error("Release '{tag}' is already published")]
    PublishConflict { tag: String },

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in the release pipeline
pub type Result<T> = std::result::Result<T, SemrelError>;

impl SemrelError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemrelError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemrelError::Version(msg.into())
    }

    /// Create a release store error with context
    pub fn store(msg: impl Into<String>) -> Self {
        SemrelError::Store(msg.into())
    }

    /// Create a build error for a specific target
    pub fn build(target: impl Into<String>, reason: impl Into<String>) -> Self {
        SemrelError::Build {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        SemrelError::Hook(msg.into())
    }

    /// True when the error means the release already exists
    pub fn is_publish_conflict(&self) -> bool {
        matches!(self, SemrelError::PublishConflict { .. })
    }
}
