//! Name generation and renames for name-keyed records.

use pagestore_codec::{field_table, Field, Schema};
use pagestore_core::{Config, CoreError, Model, RecordStore, Renamable};
use pagestore_storage::{
    Connection, Connector, InMemoryConnection, InMemoryConnector, ServerCommands, StorageError,
    StorageResult,
};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A record keyed by folder and name whose payload lives outside the store.
#[derive(Debug, Clone, Default)]
struct Note {
    folder: String,
    name: String,
    body: String,
    payloads: Arc<Mutex<Vec<String>>>,
    refuse_moves: bool,
    moves_left: Arc<Mutex<Option<usize>>>,
}

impl Note {
    fn new(folder: &str, name: &str) -> Self {
        Self {
            folder: folder.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Schema for Note {
    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<Note>] = field_table!(Note {
            "folder" => folder: Text,
            "name" => name: Text,
            "body" => body: Text,
        });
        FIELDS
    }
}

impl Model for Note {
    fn key(&self) -> String {
        format!("notes:{}:{}", self.folder, self.name)
    }

    fn registration_key(&self) -> String {
        format!("notes:{}", self.folder)
    }

    fn validate(&self) -> bool {
        !self.name.is_empty() && !self.name.contains(':')
    }

    fn make_default(&mut self) {
        self.body = "(empty)".to_string();
    }

    fn export(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("name".into(), json!(self.name));
        out
    }
}

impl Renamable for Note {
    const NAME_STEM: &'static str = "note";
    const NAME_EXTENSION: &'static str = ".txt";

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn relocate(&self, from: &str, to: &str) -> io::Result<()> {
        if self.refuse_moves {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        if let Some(left) = self.moves_left.lock().as_mut() {
            if *left == 0 {
                return Err(io::Error::other("payload store went away"));
            }
            *left -= 1;
        }
        let mut payloads = self.payloads.lock();
        let Some(slot) = payloads.iter_mut().find(|p| p.as_str() == from) else {
            return Err(io::Error::new(io::ErrorKind::NotFound, from.to_string()));
        };
        *slot = to.to_string();
        Ok(())
    }
}

fn store() -> RecordStore<InMemoryConnector> {
    RecordStore::in_memory(Config::isolated().name_attempts(10))
}

fn stored_note(store: &RecordStore<InMemoryConnector>, name: &str) -> Note {
    let mut note = Note::new("work", name);
    note.payloads.lock().push(name.to_string());
    note.body = format!("body of {name}");
    store.insert(&note).unwrap();
    note
}

#[test]
fn rename_moves_record_and_registration() {
    let store = store();
    let mut note = stored_note(&store, "draft.txt");

    store.rename(&mut note, "final.txt").unwrap();

    let mut old = Note::new("work", "draft.txt");
    assert!(store.load(&mut old).unwrap_err().is_not_found());

    let mut new = Note::new("work", "final.txt");
    store.load(&mut new).unwrap();
    assert_eq!(new.body, "body of draft.txt");
    assert_eq!(new.name, "final.txt");

    assert_eq!(store.registered_keys(&note).unwrap(), vec!["notes:work:final.txt"]);
    assert_eq!(*note.payloads.lock(), vec!["final.txt".to_string()]);
}

#[test]
fn rename_to_same_name_is_a_save() {
    let store = store();
    let mut note = stored_note(&store, "same.txt");
    note.body = "edited".into();

    store.rename(&mut note, "same.txt").unwrap();

    let mut loaded = Note::new("work", "same.txt");
    store.load(&mut loaded).unwrap();
    assert_eq!(loaded.body, "edited");
    assert_eq!(*note.payloads.lock(), vec!["same.txt".to_string()]);
}

#[test]
fn invalid_new_name_aborts_before_storage() {
    let store = store();
    let mut note = stored_note(&store, "keep.txt");

    let err = store.rename(&mut note, "bad:name").unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(note.name, "bad:name");

    assert!(store.exists(&Note::new("work", "keep.txt")).unwrap());
    assert_eq!(*note.payloads.lock(), vec!["keep.txt".to_string()]);
}

#[test]
fn rename_onto_existing_record_is_refused() {
    let store = store();
    let mut first = stored_note(&store, "a.txt");
    stored_note(&store, "b.txt");

    let err = store.rename(&mut first, "b.txt").unwrap_err();
    assert!(matches!(err, CoreError::DuplicateKey { action: "rename", .. }));

    let mut b = Note::new("work", "b.txt");
    store.load(&mut b).unwrap();
    assert_eq!(b.body, "body of b.txt");
    assert!(store.exists(&Note::new("work", "a.txt")).unwrap());
}

#[test]
fn rename_of_unsaved_record_is_not_found() {
    let store = store();
    let mut note = Note::new("work", "ghost.txt");

    let err = store.rename(&mut note, "real.txt").unwrap_err();
    assert!(err.is_not_found());
    assert!(!store.exists(&note).unwrap());
}

#[test]
fn failed_payload_move_leaves_storage_untouched() {
    let store = store();
    let mut note = stored_note(&store, "locked.txt");
    note.refuse_moves = true;

    let err = store.rename(&mut note, "moved.txt").unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));

    assert!(store.exists(&Note::new("work", "locked.txt")).unwrap());
    assert!(!store.exists(&Note::new("work", "moved.txt")).unwrap());
    assert_eq!(
        store.registered_keys(&note).unwrap(),
        vec!["notes:work:locked.txt"]
    );
}

#[test]
fn generated_names_skip_taken_candidates() {
    let store = store();
    let mut first = Note::new("work", "");
    assert_eq!(store.generate_name(&mut first).unwrap(), "note.txt");
    store.insert(&first).unwrap();

    let mut second = Note::new("work", "");
    assert_eq!(store.generate_name(&mut second).unwrap(), "note_1.txt");
    assert_eq!(second.name, "note_1.txt");

    let mut elsewhere = Note::new("home", "");
    assert_eq!(store.generate_name(&mut elsewhere).unwrap(), "note.txt");
}

#[test]
fn name_generation_is_bounded() {
    let store = store();
    for _ in 0..10 {
        let mut note = Note::new("full", "");
        store.generate_name(&mut note).unwrap();
        store.insert(&note).unwrap();
    }

    let mut overflow = Note::new("full", "kept");
    let err = store.generate_name(&mut overflow).unwrap_err();
    assert!(matches!(
        err,
        CoreError::ExhaustedNamespace {
            stem: "note",
            attempts: 10
        }
    ));
    assert_eq!(overflow.name, "kept");
}

/// Commands that can be made to fail on demand.
#[derive(Clone, Default)]
struct Faults {
    failing: Arc<Mutex<HashSet<&'static str>>>,
    refuse_connect: Arc<AtomicBool>,
}

impl Faults {
    fn fail(&self, command: &'static str) {
        self.failing.lock().insert(command);
    }

    fn check(&self, command: &'static str) -> StorageResult<()> {
        if self.failing.lock().contains(command) {
            return Err(StorageError::connection(format!("{command}: connection reset")));
        }
        Ok(())
    }
}

/// In-memory connector whose connections fail selected commands.
#[derive(Clone, Default)]
struct FaultyConnector {
    inner: InMemoryConnector,
    faults: Faults,
}

struct FaultyConnection {
    inner: InMemoryConnection,
    faults: Faults,
}

impl Connector for FaultyConnector {
    type Connection = FaultyConnection;

    fn connect(&self) -> StorageResult<FaultyConnection> {
        if self.faults.refuse_connect.load(Ordering::SeqCst) {
            return Err(StorageError::connection("connection refused"));
        }
        Ok(FaultyConnection {
            inner: self.inner.connect()?,
            faults: self.faults.clone(),
        })
    }

    fn describe(&self) -> String {
        "faulty".to_string()
    }
}

impl Connection for FaultyConnection {
    fn hgetall(&mut self, key: &str) -> StorageResult<HashMap<String, String>> {
        self.faults.check("hgetall")?;
        self.inner.hgetall(key)
    }

    fn hset_multiple(&mut self, key: &str, fields: &[(String, String)]) -> StorageResult<()> {
        self.faults.check("hset")?;
        self.inner.hset_multiple(key, fields)
    }

    fn exists(&mut self, key: &str) -> StorageResult<bool> {
        self.faults.check("exists")?;
        self.inner.exists(key)
    }

    fn del(&mut self, key: &str) -> StorageResult<bool> {
        self.faults.check("del")?;
        self.inner.del(key)
    }

    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()> {
        self.faults.check("rename")?;
        self.inner.rename(from, to)
    }

    fn sadd(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.faults.check("sadd")?;
        self.inner.sadd(key, member)
    }

    fn srem(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.faults.check("srem")?;
        self.inner.srem(key, member)
    }

    fn smembers(&mut self, key: &str) -> StorageResult<Vec<String>> {
        self.faults.check("smembers")?;
        self.inner.smembers(key)
    }

    fn sismember(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.faults.check("sismember")?;
        self.inner.sismember(key, member)
    }

    fn incr(&mut self, key: &str) -> StorageResult<i64> {
        self.faults.check("incr")?;
        self.inner.incr(key)
    }

    fn ping(&mut self) -> StorageResult<()> {
        self.faults.check("ping")?;
        self.inner.ping()
    }
}

impl ServerCommands for FaultyConnection {
    fn select(&mut self, index: i64) -> StorageResult<()> {
        self.inner.select(index)
    }

    fn flushdb(&mut self) -> StorageResult<()> {
        self.inner.flushdb()
    }
}

fn faulty_store() -> (RecordStore<FaultyConnector>, Faults) {
    let connector = FaultyConnector::default();
    let faults = connector.faults.clone();
    (RecordStore::with_connector(connector, Config::isolated()), faults)
}

fn inserted_note(store: &RecordStore<FaultyConnector>, name: &str) -> Note {
    let note = Note::new("work", name);
    note.payloads.lock().push(name.to_string());
    store.insert(&note).unwrap();
    note
}

fn failed_step(err: &CoreError) -> Option<&'static str> {
    match err {
        CoreError::PartialFailure { step, .. } => Some(*step),
        _ => None,
    }
}

#[test]
fn unregister_failure_is_partial() {
    let (store, faults) = faulty_store();
    let mut note = inserted_note(&store, "a.txt");
    faults.fail("srem");

    let err = store.rename(&mut note, "b.txt").unwrap_err();
    assert_eq!(failed_step(&err), Some("unregister old key"));
    assert!(store.exists(&Note::new("work", "b.txt")).unwrap());
    assert!(!store.exists(&Note::new("work", "a.txt")).unwrap());
    assert_eq!(
        store.registered_keys(&note).unwrap(),
        vec!["notes:work:a.txt"]
    );
}

#[test]
fn register_failure_is_partial() {
    let (store, faults) = faulty_store();
    let mut note = inserted_note(&store, "a.txt");
    faults.fail("sadd");

    let err = store.rename(&mut note, "b.txt").unwrap_err();
    assert_eq!(failed_step(&err), Some("register new key"));
    assert!(store.registered_keys(&note).unwrap().is_empty());
}

#[test]
fn save_failure_after_move_is_partial() {
    let (store, faults) = faulty_store();
    let mut note = inserted_note(&store, "a.txt");
    faults.fail("hset");

    let err = store.rename(&mut note, "b.txt").unwrap_err();
    assert_eq!(failed_step(&err), Some("save record"));
    match err {
        CoreError::PartialFailure { from, to, source, .. } => {
            assert_eq!(from, "notes:work:a.txt");
            assert_eq!(to, "notes:work:b.txt");
            assert!(source.is_connection_error());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        store.registered_keys(&note).unwrap(),
        vec!["notes:work:b.txt"]
    );
}

#[test]
fn refused_key_move_restores_payload() {
    let (store, faults) = faulty_store();
    let mut note = inserted_note(&store, "a.txt");
    faults.fail("rename");

    let err = store.rename(&mut note, "b.txt").unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert!(err.is_connection_error());
    assert_eq!(*note.payloads.lock(), vec!["a.txt".to_string()]);
    assert!(store.exists(&Note::new("work", "a.txt")).unwrap());
    assert_eq!(
        store.registered_keys(&note).unwrap(),
        vec!["notes:work:a.txt"]
    );
}

#[test]
fn failed_payload_restore_is_partial() {
    let (store, faults) = faulty_store();
    let mut note = inserted_note(&store, "a.txt");
    *note.moves_left.lock() = Some(1);
    faults.fail("rename");

    let err = store.rename(&mut note, "b.txt").unwrap_err();
    assert_eq!(failed_step(&err), Some("restore payload"));
    assert_eq!(*note.payloads.lock(), vec!["b.txt".to_string()]);
    assert!(store.exists(&Note::new("work", "a.txt")).unwrap());
}

#[test]
fn unreachable_store_is_a_recoverable_error() {
    let (store, faults) = faulty_store();
    faults.refuse_connect.store(true, Ordering::SeqCst);

    let err = store.insert(&Note::new("work", "a.txt")).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert!(err.is_connection_error());

    faults.refuse_connect.store(false, Ordering::SeqCst);
    store.insert(&Note::new("work", "a.txt")).unwrap();
    assert_eq!(store.manager().status().open, 1);
}
