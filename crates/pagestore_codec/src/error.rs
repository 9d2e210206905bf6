//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding, decoding or applying changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A field table declares an empty external name.
    #[error("field table for {type_name} contains an empty field name")]
    EmptyFieldName {
        /// The record type.
        type_name: &'static str,
    },

    /// A field table declares the same external name twice.
    #[error("field table for {type_name} declares `{field}` more than once")]
    DuplicateField {
        /// The record type.
        type_name: &'static str,
        /// The repeated name.
        field: &'static str,
    },

    /// A value could not be parsed as the field's kind.
    #[error("invalid value for field `{field}`: expected {expected}, got `{value}`")]
    InvalidValue {
        /// The external field name.
        field: String,
        /// The expected kind.
        expected: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A change carried a value with no scalar string form.
    #[error("unsupported value for field `{field}`: {found}")]
    UnsupportedValue {
        /// The external field name.
        field: String,
        /// Description of the value found.
        found: &'static str,
    },
}

impl CodecError {
    /// Create an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        expected: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            expected,
            value: value.into(),
        }
    }

    /// Create an unsupported value error.
    pub fn unsupported_value(field: impl Into<String>, found: &'static str) -> Self {
        Self::UnsupportedValue {
            field: field.into(),
            found,
        }
    }
}
