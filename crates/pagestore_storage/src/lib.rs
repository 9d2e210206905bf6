//! # pagestore storage
//!
//! Key-value connection layer for pagestore.
//!
//! This crate is the lowest layer of the workspace. It knows nothing about
//! records, field tables or registration sets; it only speaks a small,
//! closed set of key-value commands (hashes, sets, counters) and manages
//! the connections those commands travel over.
//!
//! ## Design Principles
//!
//! - The command set is fixed by the [`Connection`] trait
//! - Backends are interchangeable behind [`Connector`]
//! - One [`ConnectionManager`] per process, passed down explicitly
//! - Isolated (test) traffic is confined to its own database index
//! - Database-wide commands ([`ServerCommands`]) are reserved for the manager
//!
//! ## Available Backends
//!
//! - [`InMemoryConnector`] - For tests and ephemeral stores
//! - [`RedisConnector`] - For a networked Redis server
//!
//! ## Example
//!
//! ```rust
//! use pagestore_storage::{Connection, ConnectionManager, InMemoryConnector, PoolConfig};
//!
//! let manager = ConnectionManager::new(InMemoryConnector::new(), PoolConfig::isolated());
//! let mut conn = manager.acquire().unwrap();
//! conn.sadd("users", "user:alice").unwrap();
//! assert!(conn.sismember("users", "user:alice").unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod connection;
mod error;
mod manager;
mod memory;
mod remote;

pub use config::{PoolConfig, DEFAULT_ISOLATED_DATABASE};
pub use connection::{Connection, Connector, ServerCommands};
pub use error::{StorageError, StorageResult};
pub use manager::{ConnectionManager, PoolStatus, PooledConnection};
pub use memory::{InMemoryConnection, InMemoryConnector};
pub use remote::{RedisConnection, RedisConnector};
