//! Error types for storage operations.

use std::time::Duration;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while talking to the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Opening a connection to the store failed.
    #[error("connection failed: {message}")]
    Connection {
        /// Description of the failure.
        message: String,
    },

    /// No pooled connection became available before the deadline.
    #[error("timed out after {waited:?} waiting for a pooled connection")]
    PoolTimeout {
        /// How long the caller waited.
        waited: Duration,
    },

    /// A command was issued against a key holding another type.
    #[error("wrong type for key `{key}`: expected {expected}")]
    WrongType {
        /// The offending key.
        key: String,
        /// The type the command expected.
        expected: &'static str,
    },

    /// A command required a key that does not exist.
    #[error("no such key: `{key}`")]
    NoSuchKey {
        /// The missing key.
        key: String,
    },

    /// A counter held a value that is not an integer.
    #[error("value at `{key}` is not an integer")]
    NotAnInteger {
        /// The counter key.
        key: String,
    },

    /// The requested database index does not exist.
    #[error("database index {index} out of range")]
    InvalidDatabase {
        /// The requested index.
        index: i64,
    },

    /// A destructive namespace operation was attempted outside isolated mode.
    #[error("refusing to clear the production namespace")]
    NotIsolated,

    /// The Redis client reported an error.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl StorageError {
    /// Creates a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a wrong-type error.
    pub fn wrong_type(key: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            key: key.into(),
            expected,
        }
    }

    /// Creates a missing-key error.
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::NoSuchKey { key: key.into() }
    }

    /// Returns true if this error means the store could not be reached.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        match self {
            Self::Connection { .. } | Self::PoolTimeout { .. } => true,
            Self::Redis(err) => err.is_io_error() || err.is_connection_dropped(),
            _ => false,
        }
    }
}
