//! Partial updates from loosely typed change sets.

use crate::error::{CodecError, CodecResult};
use crate::field::{Field, Schema};
use crate::value::FieldValue;
use serde_json::{Map, Value};

/// Changes applied to an in-memory record, with enough state to undo them.
pub struct AppliedChanges<T: 'static> {
    writes: Vec<(String, String)>,
    previous: Vec<(&'static Field<T>, FieldValue)>,
}

impl<T: 'static> AppliedChanges<T> {
    /// The `(name, canonical value)` pairs to persist.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    /// Returns true if no field of the record was named in the change set.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Restores every changed field of `record` to its previous value.
    pub fn rollback(self, record: &mut T) {
        for (field, value) in self.previous {
            field.write(record, value);
        }
    }
}

impl<T: 'static> std::fmt::Debug for AppliedChanges<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppliedChanges")
            .field("writes", &self.writes)
            .finish()
    }
}

/// Applies the entries of `changes` that name persisted fields of `record`.
///
/// Each value must be a JSON scalar. It is rendered to its string form,
/// parsed as the field's kind and written in canonical form. Names that do
/// not belong to the record are ignored. Either every matching change is
/// applied or, on the first bad value, none is.
///
/// # Errors
///
/// - [`CodecError::UnsupportedValue`] for `null`, arrays and objects
/// - [`CodecError::InvalidValue`] for scalars that do not parse as the field's kind
pub fn apply_changes<T: Schema>(
    record: &mut T,
    changes: &Map<String, Value>,
) -> CodecResult<AppliedChanges<T>> {
    let mut parsed = Vec::new();
    for field in T::fields() {
        if let Some(change) = changes.get(field.name) {
            let raw = scalar_text(field.name, change)?;
            parsed.push((field, field.kind.parse(field.name, &raw)?));
        }
    }

    let mut applied = AppliedChanges {
        writes: Vec::with_capacity(parsed.len()),
        previous: Vec::with_capacity(parsed.len()),
    };
    for (field, value) in parsed {
        applied.writes.push((field.name.to_string(), value.render()));
        applied.previous.push((field, field.read(record)));
        field.write(record, value);
    }
    Ok(applied)
}

fn scalar_text(field: &str, value: &Value) -> CodecResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(CodecError::unsupported_value(field, "null")),
        Value::Array(_) => Err(CodecError::unsupported_value(field, "array")),
        Value::Object(_) => Err(CodecError::unsupported_value(field, "object")),
    }
}
