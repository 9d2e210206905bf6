//! Record to flat string map encoding.

use crate::field::Schema;

/// Encodes every persisted field of `record` into `(name, value)` pairs.
///
/// Pairs follow the order of the type's field table. Values are in their
/// canonical stored form.
pub fn encode<T: Schema>(record: &T) -> Vec<(String, String)> {
    T::fields()
        .iter()
        .map(|field| (field.name.to_string(), field.read(record).render()))
        .collect()
}
