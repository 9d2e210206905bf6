//! Iteration over every registered record of a type.

use crate::error::CoreResult;
use crate::model::Model;
use crate::store::RecordStore;
use pagestore_storage::Connector;
use tracing::{debug, warn};

/// Walks the registration set of a record type, loading one record per step.
///
/// The member list is snapshotted when the iterator is created; the records
/// themselves are loaded lazily. Members whose load fails (for example a key
/// deleted after the snapshot) are skipped.
///
/// Loaded records are written into one reused buffer, so `next` lends a
/// reference valid until the following call. Use [`RecordIter::into_records`]
/// to collect owned copies.
pub struct RecordIter<'a, C: Connector, M: Model + Clone> {
    store: &'a RecordStore<C>,
    keys: Vec<String>,
    position: usize,
    prototype: M,
    current: M,
}

impl<C: Connector> RecordStore<C> {
    /// Returns an iterator over every registered record of `prototype`'s type.
    ///
    /// `prototype` supplies the registration key (which may be tenant
    /// scoped) and the starting state of each loaded record.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration set cannot be read.
    pub fn list<M: Model + Clone>(&self, prototype: M) -> CoreResult<RecordIter<'_, C, M>> {
        self.register::<M>()?;
        let keys = self.registered_keys(&prototype)?;
        debug!(
            registration_key = %prototype.registration_key(),
            count = keys.len(),
            "listing records"
        );
        Ok(RecordIter {
            store: self,
            keys,
            position: 0,
            current: prototype.clone(),
            prototype,
        })
    }
}

impl<'a, C: Connector, M: Model + Clone> RecordIter<'a, C, M> {
    /// Number of keys in the snapshot.
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    /// The snapshotted keys, sorted.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The most recently loaded record.
    pub fn value(&self) -> &M {
        &self.current
    }

    /// Advances to the next loadable record and returns it.
    ///
    /// Returns `None` once the snapshot is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&M> {
        while self.position < self.keys.len() {
            let key = &self.keys[self.position];
            self.position += 1;

            self.current.clone_from(&self.prototype);
            match self.store.load_from_key(&mut self.current, key) {
                Ok(()) => return Some(&self.current),
                Err(err) if err.is_not_found() => {
                    debug!(key = %key, "registered record vanished; skipping");
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "failed to load registered record; skipping");
                }
            }
        }
        None
    }

    /// Loads every remaining record into owned values.
    pub fn into_records(mut self) -> Vec<M> {
        let mut records = Vec::with_capacity(self.keys.len() - self.position);
        while let Some(record) = self.next() {
            records.push(record.clone());
        }
        records
    }
}
