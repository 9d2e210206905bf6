//! Flat string map to record decoding.

use crate::field::Schema;
use std::collections::HashMap;
use tracing::warn;

/// Decodes a stored field map into `record`.
///
/// Only names present in both the type's field table and `stored` are
/// touched. Absent names keep whatever the record already holds (normally
/// the defaults filled in before loading), which lets older records load
/// after fields are added. A stored value that does not parse as its
/// field's kind is skipped with a warning.
///
/// Returns the number of fields written.
pub fn decode<T: Schema>(stored: &HashMap<String, String>, record: &mut T) -> usize {
    let mut written = 0;
    for field in T::fields() {
        let Some(raw) = stored.get(field.name) else {
            continue;
        };
        match field.kind.parse(field.name, raw) {
            Ok(value) => {
                field.write(record, value);
                written += 1;
            }
            Err(err) => warn!(
                record_type = std::any::type_name::<T>(),
                error = %err,
                "skipping undecodable stored field"
            ),
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, field_table, Field};

    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        name: String,
        age: i64,
        banned: bool,
    }

    impl Schema for Account {
        fn fields() -> &'static [Field<Self>] {
            static FIELDS: &[Field<Account>] = field_table!(Account {
                "name" => name: Text,
                "age" => age: Int,
                "banned" => banned: Bool,
            });
            FIELDS
        }
    }

    fn defaults() -> Account {
        Account {
            name: "Johnny Appleseed".into(),
            age: 34,
            banned: false,
        }
    }

    fn stored(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_names_keep_defaults() {
        let mut account = defaults();
        let written = decode(&stored(&[("age", "99")]), &mut account);
        assert_eq!(written, 1);
        assert_eq!(account.age, 99);
        assert_eq!(account.name, "Johnny Appleseed");
    }

    #[test]
    fn unknown_stored_names_are_ignored() {
        let mut account = defaults();
        decode(&stored(&[("legacy", "x"), ("banned", "true")]), &mut account);
        assert!(account.banned);
    }

    #[test]
    fn unparsable_values_are_skipped() {
        let mut account = defaults();
        let written = decode(&stored(&[("age", "old"), ("name", "Ada")]), &mut account);
        assert_eq!(written, 1);
        assert_eq!(account.age, 34);
        assert_eq!(account.name, "Ada");
    }

    #[test]
    fn decode_restores_encoded_record() {
        let original = Account {
            name: "Test Testerson".into(),
            age: 112,
            banned: true,
        };
        let map: HashMap<String, String> = encode(&original).into_iter().collect();

        let mut loaded = defaults();
        decode(&map, &mut loaded);
        assert_eq!(loaded, original);
    }
}
