//! # pagestore codec
//!
//! Field descriptor tables and flat string-map encoding for pagestore.
//!
//! Records are stored as one hash per record: a flat map from external
//! field name to string. This crate converts between typed records and that
//! map using a static descriptor table per type instead of runtime type
//! inspection.
//!
//! ## Encoding Rules
//!
//! - Only fields listed in the type's table are persisted
//! - Booleans render as `true` / `false`
//! - Integers render in base 10
//! - Strings are stored verbatim
//! - Decoding skips names missing from storage
//!
//! ## Usage
//!
//! ```
//! use pagestore_codec::{decode, encode, field_table, Field, Schema};
//! use std::collections::HashMap;
//!
//! #[derive(Default)]
//! struct Note {
//!     title: String,
//!     pinned: bool,
//! }
//!
//! impl Schema for Note {
//!     fn fields() -> &'static [Field<Self>] {
//!         static FIELDS: &[Field<Note>] = field_table!(Note {
//!             "title" => title: Text,
//!             "pinned" => pinned: Bool,
//!         });
//!         FIELDS
//!     }
//! }
//!
//! let note = Note { title: "hello".into(), pinned: true };
//! let stored: HashMap<String, String> = encode(&note).into_iter().collect();
//! assert_eq!(stored["pinned"], "true");
//!
//! let mut loaded = Note::default();
//! decode(&stored, &mut loaded);
//! assert_eq!(loaded.title, "hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod changes;
mod decoder;
mod encoder;
mod error;
mod field;
mod value;

pub use changes::{apply_changes, AppliedChanges};
pub use decoder::decode;
pub use encoder::encode;
pub use error::{CodecError, CodecResult};
pub use field::{check_schema, Field, Schema};
pub use value::{FieldKind, FieldValue};
