//! # pagestore testkit
//!
//! Test utilities for pagestore.
//!
//! This crate provides:
//! - Isolated record stores with a scratch payload directory
//! - Sample entities that pass validation
//! - Property-based generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagestore_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_store() {
//!     with_test_store(|store| {
//!         store.insert(&sample_page("acme", "index.md")).unwrap();
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
