//! Error types for presentdeck.
//!
//! This module defines all error types used throughout the presentdeck crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for presentdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// The store could not be opened or created.
    #[error("store unavailable at {path}: {source}")]
    StoreUnavailable {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A record failed validation at the store boundary.
    #[error("invalid record: {message}")]
    InvalidRecord {
        /// Description of the validation failure.
        message: String,
    },

    // === Presentation Errors ===
    /// No presentation metadata exists for the given id.
    #[error("presentation not found: {id}")]
    PresentationNotFound {
        /// The presentation id that was looked up.
        id: String,
    },

    /// An asset bundle is missing one or more payloads.
    #[error("incomplete assets: {message}")]
    IncompleteAssets {
        /// Which slot is missing.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for presentdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid record error.
    #[must_use]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Create an incomplete assets error.
    #[must_use]
    pub fn incomplete_assets(message: impl Into<String>) -> Self {
        Self::IncompleteAssets {
            message: message.into(),
        }
    }

    /// Create a presentation not found error.
    #[must_use]
    pub fn presentation_not_found(id: impl Into<String>) -> Self {
        Self::PresentationNotFound { id: id.into() }
    }

    /// Check if this error means the store could not be opened.
    ///
    /// A database directory that cannot be created counts as well.
    #[must_use]
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::DirectoryCreate { .. }
        )
    }

    /// Check if this error is a missing presentation.
    #[must_use]
    pub fn is_presentation_not_found(&self) -> bool {
        matches!(self, Self::PresentationNotFound { .. })
    }
}
