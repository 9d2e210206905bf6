//! Record store: load, save, insert, delete and partial updates.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::model::Model;
use pagestore_codec::{apply_changes, check_schema, decode, encode, AppliedChanges};
use pagestore_storage::{
    Connection, ConnectionManager, Connector, InMemoryConnector, RedisConnector,
};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::any::TypeId;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteMode {
    Insert,
    Save,
}

/// Persists [`Model`] records in a key-value store.
///
/// Each record is one hash at its primary key; each record type has a
/// registration set listing the primary keys of its records. Only
/// [`Self::insert`] adds to that set and only [`Self::delete`] (or a rename)
/// removes from it.
///
/// Every operation acquires one pooled connection for its duration. The
/// existence checks in `save`/`insert` are read-then-write and are not
/// atomic against concurrent writers of the same key.
///
/// # Example
///
/// ```rust,ignore
/// let store = RecordStore::connect(Config::default())?;
///
/// let mut page = Page::new("acme", "index.md");
/// page.markdown = "# Hi".into();
/// store.insert(&page)?;
///
/// let mut loaded = Page::new("acme", "index.md");
/// store.load(&mut loaded)?;
/// ```
pub struct RecordStore<C: Connector> {
    manager: ConnectionManager<C>,
    config: Config,
    registered: RwLock<HashSet<TypeId>>,
}

impl RecordStore<RedisConnector> {
    /// Opens a store backed by the Redis server at `config.url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid. Connections themselves are
    /// opened lazily.
    pub fn connect(config: Config) -> CoreResult<Self> {
        let connector =
            RedisConnector::open(&config.url)?.connect_timeout(config.pool.wait_timeout);
        Ok(Self::with_connector(connector, config))
    }
}

impl RecordStore<InMemoryConnector> {
    /// Opens a store over a fresh in-memory keyspace.
    pub fn in_memory(config: Config) -> Self {
        Self::with_connector(InMemoryConnector::new(), config)
    }
}

impl<C: Connector> RecordStore<C> {
    /// Opens a store over an arbitrary connector.
    pub fn with_connector(connector: C, config: Config) -> Self {
        Self {
            manager: ConnectionManager::new(connector, config.pool.clone()),
            config,
            registered: RwLock::new(HashSet::new()),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the connection manager.
    pub fn manager(&self) -> &ConnectionManager<C> {
        &self.manager
    }

    /// Wipes the isolated namespace.
    ///
    /// # Errors
    ///
    /// Fails without deleting anything when the store is not isolated.
    pub fn clear_all(&self) -> CoreResult<()> {
        Ok(self.manager.clear_all()?)
    }

    /// Loads `m` from its own key.
    ///
    /// # Errors
    ///
    /// See [`Self::load_from_key`].
    pub fn load<M: Model>(&self, m: &mut M) -> CoreResult<()> {
        let key = m.key();
        self.load_from_key(m, &key)
    }

    /// Loads the record stored at `key` into `m`.
    ///
    /// Defaults are filled first, so fields missing from storage keep their
    /// type-defined values. Fields outside the type's table are untouched.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if nothing is stored at `key`
    /// - [`CoreError::Storage`] if the store cannot be reached
    pub fn load_from_key<M: Model>(&self, m: &mut M, key: &str) -> CoreResult<()> {
        self.register::<M>()?;
        m.make_default();

        let stored = self.manager.acquire()?.hgetall(key)?;
        if stored.is_empty() {
            return Err(CoreError::not_found(key, "load"));
        }
        decode(&stored, m);
        Ok(())
    }

    /// Overwrites an existing record.
    ///
    /// Registration is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if `m.validate()` is false
    /// - [`CoreError::NotFound`] if the record does not exist yet
    pub fn save<M: Model>(&self, m: &M) -> CoreResult<()> {
        let mut conn = self.manager.acquire()?;
        self.write_record(&mut *conn, m, WriteMode::Save)?;
        Ok(())
    }

    /// Creates a new record and registers its key.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if `m.validate()` is false
    /// - [`CoreError::DuplicateKey`] if the key is already taken; the stored
    ///   record is left unmodified
    pub fn insert<M: Model>(&self, m: &M) -> CoreResult<()> {
        let mut conn = self.manager.acquire()?;
        let key = self.write_record(&mut *conn, m, WriteMode::Insert)?;
        conn.sadd(&m.registration_key(), &key)?;
        Ok(())
    }

    /// Removes a record and its registration.
    ///
    /// Returns true if the record's hash existed. A registration that is
    /// already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub fn delete<M: Model>(&self, m: &M) -> CoreResult<bool> {
        let key = m.key();
        let mut conn = self.manager.acquire()?;
        let existed = conn.del(&key)?;
        conn.srem(&m.registration_key(), &key)?;
        debug!(key = %key, existed, "deleted record");
        Ok(existed)
    }

    /// Applies `changes` to `m` and persists only the changed fields.
    ///
    /// `changes` maps external field names to JSON scalars; names that are
    /// not persisted fields of `M` are ignored. Untouched fields are neither
    /// read nor rewritten in storage.
    ///
    /// On any error `m` is restored to its previous values and storage is
    /// left as it was.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Codec`] if a value does not fit its field
    /// - [`CoreError::Validation`] if the merged record fails validation
    /// - [`CoreError::KeyChanged`] if the changes would alter the primary key
    /// - [`CoreError::NotFound`] if the record does not exist
    pub fn update_with_changes<M: Model>(
        &self,
        m: &mut M,
        changes: &Map<String, Value>,
    ) -> CoreResult<()> {
        self.register::<M>()?;
        let key = m.key();
        let applied = apply_changes(m, changes)?;

        match self.persist_changes(m, &key, &applied) {
            Ok(()) => Ok(()),
            Err(err) => {
                applied.rollback(m);
                Err(err)
            }
        }
    }

    fn persist_changes<M: Model>(
        &self,
        m: &M,
        key: &str,
        applied: &AppliedChanges<M>,
    ) -> CoreResult<()> {
        if !m.validate() {
            return Err(CoreError::validation(key));
        }
        let moved_to = m.key();
        if moved_to != key {
            return Err(CoreError::KeyChanged {
                from: key.to_string(),
                to: moved_to,
            });
        }

        let mut conn = self.manager.acquire()?;
        if !conn.exists(key)? {
            return Err(CoreError::not_found(key, "update"));
        }
        conn.hset_multiple(key, applied.writes())?;
        debug!(key = %key, fields = applied.writes().len(), "updated record fields");
        Ok(())
    }

    /// Returns true if `m`'s hash exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub fn exists<M: Model>(&self, m: &M) -> CoreResult<bool> {
        self.exists_key(&m.key())
    }

    /// Returns true if anything is stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub fn exists_key(&self, key: &str) -> CoreResult<bool> {
        Ok(self.manager.acquire()?.exists(key)?)
    }

    /// Returns the members of `m`'s registration set, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub fn registered_keys<M: Model>(&self, m: &M) -> CoreResult<Vec<String>> {
        Ok(self.manager.acquire()?.smembers(&m.registration_key())?)
    }

    /// Validates, checks existence and writes every persisted field.
    pub(crate) fn write_record<M: Model>(
        &self,
        conn: &mut dyn Connection,
        m: &M,
        mode: WriteMode,
    ) -> CoreResult<String> {
        self.register::<M>()?;
        let key = m.key();
        if !m.validate() {
            return Err(CoreError::validation(key));
        }

        let exists = conn.exists(&key)?;
        match mode {
            WriteMode::Insert if exists => return Err(CoreError::duplicate_key(key, "insert")),
            WriteMode::Save if !exists => return Err(CoreError::not_found(key, "save")),
            _ => {}
        }

        conn.hset_multiple(&key, &encode(m))?;
        debug!(key = %key, ?mode, "wrote record");
        Ok(key)
    }

    /// Checks a record type's field table the first time the type is used.
    pub(crate) fn register<M: Model>(&self) -> CoreResult<()> {
        let type_id = TypeId::of::<M>();
        if self.registered.read().contains(&type_id) {
            return Ok(());
        }
        check_schema::<M>()?;
        self.registered.write().insert(type_id);
        debug!(
            record_type = std::any::type_name::<M>(),
            "registered record type"
        );
        Ok(())
    }
}
