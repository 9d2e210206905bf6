//! Record store behavior over the in-memory backend.

use pagestore_codec::{field_table, Field, Schema};
use pagestore_core::{Config, CoreError, Model, RecordStore};
use pagestore_storage::{Connection, InMemoryConnector, PoolConfig};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct TestRecord {
    id: String,
    long_name: String,
    error: bool,
    age: i64,
}

impl TestRecord {
    fn new(id: impl Into<String>) -> Self {
        let mut record = Self {
            id: id.into(),
            long_name: String::new(),
            error: false,
            age: 0,
        };
        record.make_default();
        record
    }
}

impl Schema for TestRecord {
    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<TestRecord>] = field_table!(TestRecord {
            "id" => id: Text,
            "long_name" => long_name: Text,
            "error" => error: Bool,
            "age" => age: Int,
        });
        FIELDS
    }
}

impl Model for TestRecord {
    fn key(&self) -> String {
        format!("test:{}", self.id)
    }

    fn registration_key(&self) -> String {
        "tests".to_string()
    }

    fn validate(&self) -> bool {
        !self.error
    }

    fn make_default(&mut self) {
        self.long_name = "Johnny Appleseed".to_string();
        self.error = false;
        self.age = 34;
    }

    fn export(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("long_name".into(), json!(self.long_name));
        out.insert("age".into(), json!(self.age));
        out
    }
}

fn store() -> RecordStore<InMemoryConnector> {
    RecordStore::in_memory(Config::isolated())
}

#[test]
fn insert_then_list_then_delete() {
    let store = store();
    let mut ids = Vec::new();
    for n in 0..5 {
        let id = store.make_key_for_table("test").unwrap();
        let mut record = TestRecord::new(id.trim_start_matches("test:"));
        record.age = n;
        store.insert(&record).unwrap();
        ids.push(record.key());
    }

    let listed = store.list(TestRecord::new("")).unwrap().into_records();
    assert_eq!(listed.len(), 5);
    let listed_keys: HashSet<String> = listed.iter().map(Model::key).collect();
    assert_eq!(listed_keys, ids.iter().cloned().collect());

    for record in &listed {
        assert!(store.delete(record).unwrap());
    }
    assert_eq!(store.list(TestRecord::new("")).unwrap().count(), 0);
}

#[test]
fn save_after_insert_overwrites_fields() {
    let store = store();
    let mut record = TestRecord::new("overwrite");
    store.insert(&record).unwrap();

    record.long_name = "Johnny Carson".into();
    record.age = 97;
    store.save(&record).unwrap();

    let mut loaded = TestRecord::new("overwrite");
    store.load(&mut loaded).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn failed_validation_changes_nothing() {
    let store = store();
    let mut record = TestRecord::new("valid");
    store.insert(&record).unwrap();

    record.error = true;
    record.age = 1;
    assert!(matches!(store.save(&record), Err(CoreError::Validation { .. })));

    let mut loaded = TestRecord::new("valid");
    store.load(&mut loaded).unwrap();
    assert_eq!(loaded.age, 34);
    assert!(!loaded.error);
}

#[test]
fn update_with_changes_keeps_other_fields() {
    let store = store();
    let mut record = TestRecord::new("update");
    record.long_name = "Test Testerson".into();
    store.insert(&record).unwrap();

    let changes = json!({"age": 112, "unknown": "ignored"});
    store
        .update_with_changes(&mut record, changes.as_object().unwrap())
        .unwrap();

    let mut loaded = TestRecord::new("update");
    store.load(&mut loaded).unwrap();
    assert_eq!(loaded.age, 112);
    assert_eq!(loaded.long_name, "Test Testerson");
}

#[test]
fn update_with_bad_value_is_a_codec_error() {
    let store = store();
    let mut record = TestRecord::new("typed");
    store.insert(&record).unwrap();

    let changes = json!({"age": "old"});
    let err = store
        .update_with_changes(&mut record, changes.as_object().unwrap())
        .unwrap_err();
    assert!(matches!(err, CoreError::Codec(_)));
    assert_eq!(record.age, 34);
}

#[test]
fn undecodable_stored_fields_keep_defaults() {
    let store = store();
    {
        let mut conn = store.manager().acquire().unwrap();
        conn.hset_multiple(
            "test:corrupt",
            &[
                ("id".into(), "corrupt".into()),
                ("age".into(), "forty".into()),
                ("error".into(), "maybe".into()),
            ],
        )
        .unwrap();
    }

    let mut loaded = TestRecord::new("corrupt");
    store.load(&mut loaded).unwrap();
    assert_eq!(loaded.age, 34);
    assert!(!loaded.error);
}

#[test]
fn allocated_keys_are_unique_across_threads() {
    let store = RecordStore::in_memory(
        Config::isolated().pool(PoolConfig::isolated().size(4).wait_timeout(Duration::from_secs(10))),
    );

    let mut all: Vec<i64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (0..50)
                        .map(|_| store.allocate_key("pages").unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    all.sort_unstable();
    assert_eq!(all, (1..=400).collect::<Vec<_>>());
}

#[test]
fn counters_are_per_table() {
    let store = store();
    assert_eq!(store.allocate_key("pages").unwrap(), 1);
    assert_eq!(store.allocate_key("pages").unwrap(), 2);
    assert_eq!(store.make_key_for_table("users").unwrap(), "users:1");
}

#[test]
fn clear_all_is_refused_in_production() {
    let store = RecordStore::in_memory(Config::default());
    store.insert(&TestRecord::new("kept")).unwrap();

    assert!(store.clear_all().is_err());
    assert!(store.exists(&TestRecord::new("kept")).unwrap());
}

#[test]
fn clear_all_wipes_isolated_namespace() {
    let store = store();
    store.insert(&TestRecord::new("gone")).unwrap();

    store.clear_all().unwrap();
    assert!(!store.exists(&TestRecord::new("gone")).unwrap());
}

proptest! {
    #[test]
    fn insert_load_round_trip(
        id in "[a-z0-9]{1,12}",
        long_name in ".{0,40}",
        age in any::<i64>(),
    ) {
        let store = store();
        let mut record = TestRecord::new(id.clone());
        record.long_name = long_name;
        record.age = age;
        store.insert(&record).unwrap();

        let mut loaded = TestRecord::new(id);
        store.load(&mut loaded).unwrap();
        prop_assert_eq!(loaded, record);
    }

    #[test]
    fn second_insert_is_always_rejected(id in "[a-z]{1,8}", age in 0i64..200) {
        let store = store();
        let mut record = TestRecord::new(id.clone());
        store.insert(&record).unwrap();

        record.age = age;
        let rejected = matches!(store.insert(&record), Err(CoreError::DuplicateKey { .. }));
        prop_assert!(rejected);
        prop_assert_eq!(store.registered_keys(&record).unwrap().len(), 1);
    }
}
