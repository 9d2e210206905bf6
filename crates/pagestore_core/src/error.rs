//! Error types for pagestore core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in record store operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage or connection error.
    #[error("storage error: {0}")]
    Storage(#[from] pagestore_storage::StorageError),

    /// Field codec error.
    #[error("codec error: {0}")]
    Codec(#[from] pagestore_codec::CodecError),

    /// I/O error from moving an on-disk payload.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The record failed its own validation predicate.
    #[error("record `{key}` failed validation")]
    Validation {
        /// Key of the rejected record.
        key: String,
    },

    /// The record's key does not exist.
    #[error("key `{key}` doesn't exist: can't {action}")]
    NotFound {
        /// The missing key.
        key: String,
        /// The operation that required it.
        action: &'static str,
    },

    /// The record's key already exists.
    #[error("key `{key}` already exists: can't {action}")]
    DuplicateKey {
        /// The occupied key.
        key: String,
        /// The operation that was refused.
        action: &'static str,
    },

    /// A partial update would have moved the record to another key.
    #[error("changes would move `{from}` to `{to}`; use rename")]
    KeyChanged {
        /// Key before the changes.
        from: String,
        /// Key after the changes.
        to: String,
    },

    /// Every candidate name was already taken.
    #[error("no free name for `{stem}` after {attempts} attempts")]
    ExhaustedNamespace {
        /// Name stem that was probed.
        stem: &'static str,
        /// Number of candidates tried.
        attempts: usize,
    },

    /// A multi-step rename stopped after mutating storage.
    #[error("rename `{from}` -> `{to}` stopped at {step}: {source}")]
    PartialFailure {
        /// Key before the rename.
        from: String,
        /// Key after the rename.
        to: String,
        /// The step that failed.
        step: &'static str,
        /// The underlying error.
        #[source]
        source: Box<CoreError>,
    },
}

impl CoreError {
    /// Creates a validation error.
    pub fn validation(key: impl Into<String>) -> Self {
        Self::Validation { key: key.into() }
    }

    /// Creates a not-found error.
    pub fn not_found(key: impl Into<String>, action: &'static str) -> Self {
        Self::NotFound {
            key: key.into(),
            action,
        }
    }

    /// Creates a duplicate-key error.
    pub fn duplicate_key(key: impl Into<String>, action: &'static str) -> Self {
        Self::DuplicateKey {
            key: key.into(),
            action,
        }
    }

    /// Returns true for [`CoreError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the store could not be reached.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Storage(err) if err.is_connection_error())
    }
}
