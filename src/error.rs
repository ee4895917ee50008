use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for changeset operations
#[derive(Error, Debug)]
pub enum ChangesetError {
    #[error("Changeset directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Malformed changeset {}: {reason}", .path.display())]
    MalformedChangeset { path: PathBuf, reason: String },

    #[error("Changesets are not initialized: {} is missing", .0.display())]
    NotInitialized(PathBuf),

    #[error("Unknown module '{0}': no manifest with that name was found")]
    UnknownModule(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not serialize configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Convenience type alias for Results in changesets
pub type Result<T> = std::result::Result<T, ChangesetError>;

impl ChangesetError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ChangesetError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ChangesetError::Version(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ChangesetError::Manifest(msg.into())
    }

    /// Create a malformed changeset error for the given file
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ChangesetError::MalformedChangeset {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
