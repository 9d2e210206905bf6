//! Key-value command set and connector trait definitions.

use crate::error::StorageResult;
use std::collections::HashMap;

/// A single connection to a key-value store.
///
/// The command set is deliberately closed: hashes hold records, sets hold
/// registration indexes and plain values hold counters. Every method maps
/// onto one store command with Redis semantics.
///
/// # Invariants
///
/// - `hgetall` on a missing key returns an empty map, never an error
/// - hashes and sets that become empty cease to exist
/// - `rename` fails with [`crate::StorageError::NoSuchKey`] when the source is missing
/// - `incr` is atomic with respect to every other connection
///
/// # Implementors
///
/// - [`super::InMemoryConnection`] - For testing
/// - [`super::RedisConnection`] - For a networked Redis server
pub trait Connection: Send {
    /// Returns every field of the hash stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-hash value or the command fails.
    fn hgetall(&mut self, key: &str) -> StorageResult<HashMap<String, String>>;

    /// Sets the given fields of the hash at `key`, creating it if needed.
    ///
    /// Fields not named in `fields` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-hash value or the command fails.
    fn hset_multiple(&mut self, key: &str, fields: &[(String, String)]) -> StorageResult<()>;

    /// Returns true if `key` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    fn exists(&mut self, key: &str) -> StorageResult<bool>;

    /// Deletes `key`, returning true if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    fn del(&mut self, key: &str) -> StorageResult<bool>;

    /// Renames `from` to `to`, overwriting `to` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `from` does not exist or the command fails.
    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()>;

    /// Adds `member` to the set at `key`, returning true if it was new.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-set value or the command fails.
    fn sadd(&mut self, key: &str, member: &str) -> StorageResult<bool>;

    /// Removes `member` from the set at `key`, returning true if it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-set value or the command fails.
    fn srem(&mut self, key: &str, member: &str) -> StorageResult<bool>;

    /// Returns every member of the set at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-set value or the command fails.
    fn smembers(&mut self, key: &str) -> StorageResult<Vec<String>>;

    /// Returns true if `member` belongs to the set at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-set value or the command fails.
    fn sismember(&mut self, key: &str, member: &str) -> StorageResult<bool>;

    /// Atomically increments the integer at `key` and returns the new value.
    ///
    /// A missing key counts as zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an integer or the command fails.
    fn incr(&mut self, key: &str) -> StorageResult<i64>;

    /// Checks that the store answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn ping(&mut self) -> StorageResult<()>;

    /// Returns false once the connection is known to be unusable.
    ///
    /// Closed connections are dropped instead of being returned to the pool.
    fn is_open(&self) -> bool {
        true
    }
}

/// Database-wide commands reserved for the [`crate::ConnectionManager`].
///
/// Pooled connections only expose [`Connection`], so callers holding a
/// [`crate::PooledConnection`] can neither switch databases nor flush one.
pub trait ServerCommands: Send {
    /// Switches this connection to database `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the command fails.
    fn select(&mut self, index: i64) -> StorageResult<()>;

    /// Removes every key of the currently selected database.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    fn flushdb(&mut self) -> StorageResult<()>;
}

/// Opens new connections to one key-value store.
pub trait Connector: Send + Sync {
    /// The connection type produced by this connector.
    type Connection: Connection + ServerCommands + 'static;

    /// Opens a fresh connection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::Connection`] if the store cannot be reached.
    fn connect(&self) -> StorageResult<Self::Connection>;

    /// Describes the target for log output.
    fn describe(&self) -> String;
}
