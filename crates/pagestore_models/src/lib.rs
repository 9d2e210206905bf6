//! # pagestore models
//!
//! The entities of a multi-tenant site builder, persisted through
//! [`pagestore_core::RecordStore`].
//!
//! | Type | Key | Registration set |
//! |------|-----|------------------|
//! | [`User`] | `user:<domain>` | `users` |
//! | [`Page`] | `pages:<domain>:<name>` | `pages:<domain>` |
//! | [`File`] | `files:<domain>:<name>` | `files:<domain>` |
//! | [`Domain`] | `domains:<external>` | `domains` |
//!
//! Pages and files are [`pagestore_core::Renamable`]: their name is part of
//! the key, so they are renamed through the store rather than saved under a
//! new name. Renaming a file also moves its payload on disk.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod domain;
mod file;
mod page;
mod user;
pub mod validate;

pub use domain::Domain;
pub use file::File;
pub use page::{Page, DEFAULT_PAGE_NAME};
pub use user::{User, SALT_LENGTH};
