//! Unified error types for whatsarchive.
//!
//! This module provides a single [`ArchiveError`] enum covering the parser's
//! fallible helpers and every archive store operation.
//!
//! # Error Handling Philosophy
//!
//! - Per-line parse problems are never errors at the file level; they are
//!   counted in [`ParseStats`](crate::parser::ParseStats) instead
//! - Store failures are surfaced per operation with the path involved
//! - Nothing in the crate retries

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for whatsarchive operations.
///
/// # Example
///
/// ```rust
/// use whatsarchive::error::Result;
/// use whatsarchive::ParsedMessage;
///
/// fn my_function() -> Result<Vec<ParsedMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// The error type for all whatsarchive operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArchiveError {
    /// An I/O error occurred outside of a specific store operation,
    /// e.g. while reading an export file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The storage directories could not be created or accessed.
    ///
    /// Fatal for the operation that triggered initialization.
    #[error("Failed to initialize archive storage at {}: {source}", path.display())]
    StorageInit {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A store operation failed on a specific record or directory.
    #[error("Failed to {operation} {}: {source}", path.display())]
    Storage {
        /// What the store was doing ("write", "read", "list", ...)
        operation: &'static str,
        /// Path the operation targeted
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A date/time pair did not form a valid timestamp.
    #[error("Invalid timestamp '{input}'. Expected format: {expected}")]
    InvalidTimestamp {
        /// The composed date/time text
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// No archive exists under the requested name.
    #[error("No archive named '{name}'")]
    NotFound {
        /// The display name that was looked up
        name: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ArchiveError {
    /// Creates a storage-initialization error.
    pub fn storage_init(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArchiveError::StorageInit {
            path: path.into(),
            source,
        }
    }

    /// Creates a storage error for one operation on one path.
    pub fn storage(operation: &'static str, path: &Path, source: io::Error) -> Self {
        ArchiveError::Storage {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates an invalid timestamp error.
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        ArchiveError::InvalidTimestamp {
            input: input.into(),
            expected: "M/D/YY, H:MM[:SS]",
        }
    }

    /// Creates a not-found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        ArchiveError::NotFound { name: name.into() }
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    /// Returns `true` if this is an I/O error.
    pub fn is_io(&self) -> bool {
        matches!(self, ArchiveError::Io(_))
    }

    /// Returns `true` if storage could not be initialized.
    pub fn is_storage_init(&self) -> bool {
        matches!(self, ArchiveError::StorageInit { .. })
    }

    /// Returns `true` if a store operation failed.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ArchiveError::Storage { .. } | ArchiveError::StorageInit { .. }
        )
    }

    /// Returns `true` if this is an invalid timestamp error.
    pub fn is_invalid_timestamp(&self) -> bool {
        matches!(self, ArchiveError::InvalidTimestamp { .. })
    }

    /// Returns `true` if no archive was found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArchiveError::NotFound { .. })
    }
}
