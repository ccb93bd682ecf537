//! Error types for the release pipeline
//!
//! Every variant is terminal for a single invocation: nothing is retried
//! internally and the caller decides whether to run again.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the pipeline's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum Error {
    /// No install or target path could be resolved
    #[error("No installation path provided: {hint}")]
    MissingConfiguration { hint: String },

    /// The remote catalog could not be fetched or parsed
    #[error("Catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    /// Nothing in the catalog matched the selection criteria
    #[error("No asset matches {criteria}")]
    NotFound { criteria: String },

    /// The download was interrupted or failed mid-stream
    #[error("Download of {name} aborted: {reason}")]
    Aborted { name: String, reason: String },

    /// The downloaded byte count does not add up
    #[error("Download of {name} incomplete: expected {expected} bytes, got {actual} bytes")]
    Incomplete {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// The content hash differs from the published digest
    #[error("SHA256 mismatch for {name}: expected {expected}, got {actual}")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// An archive entry failed its integrity check
    #[error("Archive {archive} is corrupted, first bad entry: {entry}")]
    CorruptArchive { archive: PathBuf, entry: String },

    /// The previous installation could not be removed
    #[error("Failed to remove existing installation at {path}: {source}")]
    InstallRemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unpacking the archive into the install root failed
    #[error("Failed to extract {archive}: {reason}")]
    ExtractionFailed { archive: PathBuf, reason: String },

    /// Executable bits could not be set on existing entry points
    #[error("Failed to set executable permission on: {}", paths.join(", "))]
    PermissionsFailed { paths: Vec<String> },

    /// HTTP client construction failed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error outside the download stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a catalog unavailable error
    pub fn catalog_unavailable(reason: impl Into<String>) -> Self {
        Self::CatalogUnavailable {
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(criteria: impl Into<String>) -> Self {
        Self::NotFound {
            criteria: criteria.into(),
        }
    }

    /// Create an aborted download error
    pub fn aborted(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Aborted {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an extraction error
    pub fn extraction_failed(archive: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ExtractionFailed {
            archive: archive.into(),
            reason: reason.to_string(),
        }
    }
}
