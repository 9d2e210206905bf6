//! Field descriptor tables.

use crate::error::{CodecError, CodecResult};
use crate::value::{FieldKind, FieldValue};
use std::collections::HashSet;

/// Describes one persisted field of a record type `T`.
///
/// A table of these replaces runtime type inspection: the external name is
/// the hash field name in the store, and the accessors move values between
/// the struct and a [`FieldValue`]. Struct fields without a descriptor are
/// never persisted.
///
/// Tables are normally written with [`crate::field_table!`].
pub struct Field<T> {
    /// External (stored) name.
    pub name: &'static str,
    /// Kind of the field.
    pub kind: FieldKind,
    /// Reads the current value.
    pub get: fn(&T) -> FieldValue,
    /// Writes a value; only ever called with a value of `kind`.
    pub set: fn(&mut T, FieldValue),
}

impl<T> Field<T> {
    /// Reads this field from `record`.
    pub fn read(&self, record: &T) -> FieldValue {
        (self.get)(record)
    }

    /// Writes `value` into `record`.
    pub fn write(&self, record: &mut T, value: FieldValue) {
        debug_assert_eq!(value.kind(), self.kind);
        (self.set)(record, value);
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Types with a static field descriptor table.
pub trait Schema: Sized + 'static {
    /// Returns the descriptor table for this type.
    fn fields() -> &'static [Field<Self>];

    /// Looks up a descriptor by external name.
    fn field(name: &str) -> Option<&'static Field<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }
}

/// Checks that a type's field table is well formed.
///
/// Field kinds are closed at compile time, so the remaining table errors
/// are empty and repeated external names. Run once per type at registration.
///
/// # Errors
///
/// Returns [`CodecError::EmptyFieldName`] or [`CodecError::DuplicateField`].
pub fn check_schema<T: Schema>() -> CodecResult<()> {
    let type_name = std::any::type_name::<T>();
    let mut seen = HashSet::new();
    for field in T::fields() {
        if field.name.is_empty() {
            return Err(CodecError::EmptyFieldName { type_name });
        }
        if !seen.insert(field.name) {
            return Err(CodecError::DuplicateField {
                type_name,
                field: field.name,
            });
        }
    }
    Ok(())
}

/// Declares a static field descriptor table.
///
/// Each entry maps an external name to a struct field and its kind
/// (`Bool` for `bool`, `Int` for `i64`, `Text` for `String`).
///
/// ```rust
/// use pagestore_codec::{field_table, Field, Schema};
///
/// struct Page {
///     domain: String,
///     name: String,
///     views: i64,
///     cached: bool, // not persisted
/// }
///
/// impl Schema for Page {
///     fn fields() -> &'static [Field<Self>] {
///         static FIELDS: &[Field<Page>] = field_table!(Page {
///             "domain" => domain: Text,
///             "name" => name: Text,
///             "views" => views: Int,
///         });
///         FIELDS
///     }
/// }
///
/// assert_eq!(Page::fields().len(), 3);
/// ```
#[macro_export]
macro_rules! field_table {
    ($record:ty { $($name:literal => $field:ident : $kind:ident),* $(,)? }) => {
        &[$(
            $crate::Field::<$record> {
                name: $name,
                kind: $crate::FieldKind::$kind,
                get: |record: &$record| {
                    $crate::FieldValue::$kind(::std::clone::Clone::clone(&record.$field))
                },
                set: |record: &mut $record, value: $crate::FieldValue| {
                    if let $crate::FieldValue::$kind(value) = value {
                        record.$field = value;
                    }
                },
            }
        ),*]
    };
}
