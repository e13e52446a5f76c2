use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Version record error: {0}")]
    Manifest(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("Version {candidate} is not greater than the last released tag {last_tag}")]
    NonMonotonic { candidate: String, last_tag: String },

    #[error("Version mismatch: version record is {recorded}, latest tag is {tag}")]
    TagMismatch { recorded: String, tag: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml_edit::TomlError),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a version record error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a changelog error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ReleaseError::Changelog(msg.into())
    }

    /// Wrap an I/O failure on a specific file so the path shows up in the message
    pub fn file(action: &str, path: &std::path::Path, source: std::io::Error) -> Self {
        ReleaseError::Io(std::io::Error::new(
            source.kind(),
            format!("failed to {} {}: {}", action, path.display(), source),
        ))
    }
}
