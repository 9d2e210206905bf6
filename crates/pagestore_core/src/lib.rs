//! # pagestore core
//!
//! Generic record persistence for a multi-tenant site builder.
//!
//! Every entity (users, pages, files, domains) implements [`Model`] and is
//! handed to a [`RecordStore`], which stores it as one hash per record plus
//! membership in a per-type registration set. The store provides:
//!
//! - Load, save, insert and delete of whole records
//! - Partial updates from a JSON change map ([`RecordStore::update_with_changes`])
//! - Listing through the registration set ([`RecordStore::list`])
//! - Monotonic key allocation ([`RecordStore::allocate_key`])
//! - Free-name generation and renames for name-keyed records ([`Renamable`])
//!
//! ## Storage Layout
//!
//! ```text
//! pages:acme:index.md   hash   {domain: acme, name: index.md, markdown: ...}
//! pages:acme            set    {pages:acme:index.md, ...}
//! key:pages             int    last allocated id
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use pagestore_core::{Config, RecordStore};
//!
//! let store = RecordStore::in_memory(Config::isolated());
//! store.insert(&page)?;
//! for page in store.list(Page::for_domain("acme"))?.into_records() {
//!     println!("{}", page.name);
//! }
//! ```
//!
//! ## Consistency
//!
//! Cross-key sequences (insert's hash write then set add, rename's moves)
//! are not atomic. Rename surfaces a partially applied sequence as
//! [`CoreError::PartialFailure`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod iter;
mod keys;
mod model;
mod rename;
mod store;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use iter::RecordIter;
pub use keys::{candidate_name, counter_key};
pub use model::{Model, Renamable};
pub use store::RecordStore;

pub use pagestore_storage::{
    ConnectionManager, Connector, InMemoryConnector, PoolConfig, RedisConnector,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
