//! Domain error types
//!
//! This module defines the error hierarchy for Folio. All errors are
//! domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main Folio error type
///
/// This is the primary error type used throughout the application. The first
/// fatal error raised by an export stage is returned unchanged to the caller.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required input is missing before any stage starts (e.g. unknown template id)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The external asset loader failed
    #[error("Asset loading error: {0}")]
    AssetLoad(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Fatal template rendering errors (head markup)
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Archive creation errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl FolioError {
    /// Builds an I/O error that names the path involved
    pub fn io_at(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        FolioError::Io(format!("{}: {}", path.into().display(), err))
    }
}

/// Errors raised by a template while producing markup
///
/// Body render errors are recoverable (the route is written with an empty
/// body). Head render errors abort the export.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    /// Human-readable description
    pub message: String,
}

impl RenderError {
    /// Creates a new render error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Archive-specific errors
///
/// `EntryNotFound` is the benign warning class: an entry vanished between
/// listing and reading. Everything else is fatal.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Entry disappeared while the archive was being built
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// Failed to walk the workspace tree
    #[error("Failed to walk workspace: {0}")]
    Walk(String),

    /// The zip writer reported an error
    #[error("Zip error: {0}")]
    Zip(String),

    /// Failed to read an entry or write the archive file
    #[error("Archive I/O error: {0}")]
    Io(String),

    /// The blocking archive task panicked or was cancelled
    #[error("Archive task failed: {0}")]
    Task(String),
}

impl ArchiveError {
    /// Whether this error is the swallowed warning class
    pub fn is_warning(&self) -> bool {
        matches!(self, ArchiveError::EntryNotFound(_))
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => ArchiveError::Io(io.to_string()),
            other => ArchiveError::Zip(other.to_string()),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for FolioError {
    fn from(err: std::io::Error) -> Self {
        FolioError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FolioError {
    fn from(err: toml::de::Error) -> Self {
        FolioError::Configuration(format!("TOML parse error: {err}"))
    }
}
