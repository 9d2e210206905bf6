//! Field kinds and values.

use crate::error::{CodecError, CodecResult};
use std::fmt;

/// The closed set of kinds a persisted field may have.
///
/// There is deliberately no catch-all variant: a record field that is not a
/// boolean, an integer or a string cannot be declared in a field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Boolean, stored as `true` / `false`.
    Bool,
    /// Signed 64-bit integer, stored in base 10.
    Int,
    /// UTF-8 string, stored verbatim.
    Text,
}

impl FieldKind {
    /// Human-readable kind name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Bool => "boolean",
            FieldKind::Int => "integer",
            FieldKind::Text => "string",
        }
    }

    /// Parses a stored string into a value of this kind.
    ///
    /// Booleans accept the usual spellings (`1`, `t`, `true`, `TRUE`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidValue`] if `raw` is not a valid
    /// representation of this kind.
    pub fn parse(self, field: &str, raw: &str) -> CodecResult<FieldValue> {
        match self {
            FieldKind::Bool => match raw {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(FieldValue::Bool(true)),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(FieldValue::Bool(false)),
                _ => Err(CodecError::invalid_value(field, self.name(), raw)),
            },
            FieldKind::Int => raw
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| CodecError::invalid_value(field, self.name(), raw)),
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field value of one of the supported kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    Text(String),
}

impl FieldValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }

    /// Renders the canonical stored form.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}
