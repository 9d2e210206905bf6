//! In-memory key-value backend for testing.

use crate::connection::{Connection, Connector, ServerCommands};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Number of databases an in-memory store exposes, matching a stock Redis server.
const DATABASE_COUNT: i64 = 16;

#[derive(Debug, Clone)]
enum Entry {
    Hash(HashMap<String, String>),
    Set(BTreeSet<String>),
    Text(String),
}

type Keyspace = HashMap<String, Entry>;

#[derive(Debug, Default)]
struct Shared {
    databases: RwLock<HashMap<i64, Keyspace>>,
}

/// An in-memory key-value store.
///
/// This connector keeps every database in process memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Connections opened from clones of the same connector share one keyspace,
/// so a connection manager over an `InMemoryConnector` behaves like a pool of
/// connections to a single server.
///
/// # Example
///
/// ```rust
/// use pagestore_storage::{Connection, Connector, InMemoryConnector};
///
/// let connector = InMemoryConnector::new();
/// let mut a = connector.connect().unwrap();
/// let mut b = connector.connect().unwrap();
/// a.incr("key:pages").unwrap();
/// assert_eq!(b.incr("key:pages").unwrap(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    shared: Arc<Shared>,
}

impl InMemoryConnector {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys held in database `index`.
    ///
    /// Useful for testing and debugging.
    #[must_use]
    pub fn key_count(&self, index: i64) -> usize {
        self.shared
            .databases
            .read()
            .get(&index)
            .map_or(0, HashMap::len)
    }
}

impl Connector for InMemoryConnector {
    type Connection = InMemoryConnection;

    fn connect(&self) -> StorageResult<InMemoryConnection> {
        Ok(InMemoryConnection {
            shared: Arc::clone(&self.shared),
            database: 0,
        })
    }

    fn describe(&self) -> String {
        "memory://".to_string()
    }
}

/// A connection to an [`InMemoryConnector`] store.
#[derive(Debug)]
pub struct InMemoryConnection {
    shared: Arc<Shared>,
    database: i64,
}

impl InMemoryConnection {
    /// Returns the database index this connection currently addresses.
    #[must_use]
    pub fn database(&self) -> i64 {
        self.database
    }

    fn read<T>(&self, f: impl FnOnce(Option<&Keyspace>) -> T) -> T {
        let databases = self.shared.databases.read();
        f(databases.get(&self.database))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Keyspace) -> T) -> T {
        let mut databases = self.shared.databases.write();
        f(databases.entry(self.database).or_default())
    }
}

impl Connection for InMemoryConnection {
    fn hgetall(&mut self, key: &str) -> StorageResult<HashMap<String, String>> {
        self.read(|space| match space.and_then(|s| s.get(key)) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(fields)) => Ok(fields.clone()),
            Some(_) => Err(StorageError::wrong_type(key, "hash")),
        })
    }

    fn hset_multiple(&mut self, key: &str, fields: &[(String, String)]) -> StorageResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        self.write(|space| {
            let entry = space
                .entry(key.to_string())
                .or_insert_with(|| Entry::Hash(HashMap::new()));
            match entry {
                Entry::Hash(hash) => {
                    for (name, value) in fields {
                        hash.insert(name.clone(), value.clone());
                    }
                    Ok(())
                }
                _ => Err(StorageError::wrong_type(key, "hash")),
            }
        })
    }

    fn exists(&mut self, key: &str) -> StorageResult<bool> {
        Ok(self.read(|space| space.is_some_and(|s| s.contains_key(key))))
    }

    fn del(&mut self, key: &str) -> StorageResult<bool> {
        Ok(self.write(|space| space.remove(key).is_some()))
    }

    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()> {
        self.write(|space| {
            let entry = space
                .remove(from)
                .ok_or_else(|| StorageError::no_such_key(from))?;
            space.insert(to.to_string(), entry);
            Ok(())
        })
    }

    fn sadd(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.write(|space| {
            let entry = space
                .entry(key.to_string())
                .or_insert_with(|| Entry::Set(BTreeSet::new()));
            match entry {
                Entry::Set(set) => Ok(set.insert(member.to_string())),
                _ => Err(StorageError::wrong_type(key, "set")),
            }
        })
    }

    fn srem(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.write(|space| {
            let (removed, now_empty) = match space.get_mut(key) {
                None => return Ok(false),
                Some(Entry::Set(set)) => (set.remove(member), set.is_empty()),
                Some(_) => return Err(StorageError::wrong_type(key, "set")),
            };
            if now_empty {
                space.remove(key);
            }
            Ok(removed)
        })
    }

    fn smembers(&mut self, key: &str) -> StorageResult<Vec<String>> {
        self.read(|space| match space.and_then(|s| s.get(key)) {
            None => Ok(Vec::new()),
            Some(Entry::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(StorageError::wrong_type(key, "set")),
        })
    }

    fn sismember(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.read(|space| match space.and_then(|s| s.get(key)) {
            None => Ok(false),
            Some(Entry::Set(set)) => Ok(set.contains(member)),
            Some(_) => Err(StorageError::wrong_type(key, "set")),
        })
    }

    fn incr(&mut self, key: &str) -> StorageResult<i64> {
        self.write(|space| {
            let entry = space
                .entry(key.to_string())
                .or_insert_with(|| Entry::Text("0".to_string()));
            match entry {
                Entry::Text(text) => {
                    let current: i64 = text.parse().map_err(|_| StorageError::NotAnInteger {
                        key: key.to_string(),
                    })?;
                    let next = current.checked_add(1).ok_or_else(|| {
                        StorageError::NotAnInteger {
                            key: key.to_string(),
                        }
                    })?;
                    *text = next.to_string();
                    Ok(next)
                }
                _ => Err(StorageError::wrong_type(key, "string")),
            }
        })
    }

    fn ping(&mut self) -> StorageResult<()> {
        Ok(())
    }
}

impl ServerCommands for InMemoryConnection {
    fn select(&mut self, index: i64) -> StorageResult<()> {
        if !(0..DATABASE_COUNT).contains(&index) {
            return Err(StorageError::InvalidDatabase { index });
        }
        self.database = index;
        Ok(())
    }

    fn flushdb(&mut self) -> StorageResult<()> {
        self.shared.databases.write().remove(&self.database);
        Ok(())
    }
}
