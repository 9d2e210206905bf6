//! The model contract.

use pagestore_codec::Schema;
use serde_json::{Map, Value};
use std::io;

/// An entity that can be persisted by a [`crate::RecordStore`].
///
/// Implementors must provide:
/// - `key()`: the primary key, unique within the type
/// - `registration_key()`: the set every record of the type is listed in
/// - `validate()`: whether the current field values may be stored
/// - `make_default()`: fills defaults before a load overwrites stored fields
/// - `export()`: the fields safe to disclose outside the process
///
/// plus a field table via [`Schema`], which decides what is persisted.
///
/// Keys follow `<table>:<tenant-or-identity>[:<subkey>]` and registration
/// keys `<table>[:<tenant>]`.
///
/// # Example
///
/// ```rust
/// use pagestore_codec::{field_table, Field, Schema};
/// use pagestore_core::Model;
/// use serde_json::{json, Map, Value};
///
/// #[derive(Default, Clone)]
/// struct Alias {
///     external: String,
///     internal: String,
/// }
///
/// impl Schema for Alias {
///     fn fields() -> &'static [Field<Self>] {
///         static FIELDS: &[Field<Alias>] = field_table!(Alias {
///             "external" => external: Text,
///             "internal" => internal: Text,
///         });
///         FIELDS
///     }
/// }
///
/// impl Model for Alias {
///     fn key(&self) -> String {
///         format!("aliases:{}", self.external)
///     }
///
///     fn registration_key(&self) -> String {
///         "aliases".to_string()
///     }
///
///     fn validate(&self) -> bool {
///         !self.external.is_empty()
///     }
///
///     fn make_default(&mut self) {}
///
///     fn export(&self) -> Map<String, Value> {
///         let mut out = Map::new();
///         out.insert("external".into(), json!(self.external));
///         out
///     }
/// }
/// ```
pub trait Model: Schema {
    /// Returns the primary key of this record.
    fn key(&self) -> String;

    /// Returns the key of the set listing every record of this type.
    fn registration_key(&self) -> String;

    /// Returns true if the current field values may be persisted.
    fn validate(&self) -> bool;

    /// Fills type-defined defaults.
    ///
    /// Called before every load, so fields absent from storage keep these
    /// values rather than zero values.
    fn make_default(&mut self);

    /// Returns the externally visible projection of this record.
    ///
    /// Secrets (password hashes, salts) must never appear here.
    fn export(&self) -> Map<String, Value>;
}

/// A model whose primary key is derived from a mutable name.
///
/// Such records cannot simply be loaded, renamed and saved: the name is part
/// of the key. [`crate::RecordStore::rename`] moves them instead, and
/// [`crate::RecordStore::generate_name`] picks free names for new ones.
pub trait Renamable: Model {
    /// Stem of generated names.
    const NAME_STEM: &'static str = "untitled";

    /// Extension of generated names, including the dot.
    const NAME_EXTENSION: &'static str = ".md";

    /// Returns the identity-bearing name.
    fn name(&self) -> &str;

    /// Replaces the identity-bearing name.
    fn set_name(&mut self, name: String);

    /// Moves any out-of-band payload from name `from` to name `to`.
    ///
    /// Must leave the payload at `from` when it fails. The default does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns the I/O error that prevented the move.
    fn relocate(&self, _from: &str, _to: &str) -> io::Result<()> {
        Ok(())
    }
}
