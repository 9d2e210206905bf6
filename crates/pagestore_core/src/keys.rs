//! Unique key allocation and free-name generation.

use crate::error::{CoreError, CoreResult};
use crate::model::Renamable;
use crate::store::RecordStore;
use pagestore_storage::{Connection, Connector};
use tracing::{debug, warn};

/// Returns the counter key backing [`RecordStore::allocate_key`].
pub fn counter_key(table: &str) -> String {
    format!("key:{table}")
}

/// Returns the `index`-th candidate name for a stem and extension.
///
/// Index 0 is the bare stem; later indices append `_<index>`.
pub fn candidate_name(stem: &str, extension: &str, index: usize) -> String {
    if index == 0 {
        format!("{stem}{extension}")
    } else {
        format!("{stem}_{index}{extension}")
    }
}

impl<C: Connector> RecordStore<C> {
    /// Returns the next integer from the counter for `table`.
    ///
    /// Counters start at 1 and never repeat, even across concurrent callers
    /// and processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub fn allocate_key(&self, table: &str) -> CoreResult<i64> {
        let value = self.manager().acquire()?.incr(&counter_key(table))?;
        debug!(table, value, "allocated key");
        Ok(value)
    }

    /// Allocates a fresh primary key of the form `<table>:<n>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    pub fn make_key_for_table(&self, table: &str) -> CoreResult<String> {
        Ok(format!("{table}:{}", self.allocate_key(table)?))
    }

    /// Picks the first free name for `m` and assigns it.
    ///
    /// Candidates are `<stem><ext>`, `<stem>_1<ext>`, `<stem>_2<ext>` and so
    /// on, up to the configured attempt ceiling. A candidate is free when no
    /// record exists at the key it produces. The check is not a reservation:
    /// a concurrent writer may still claim the name before `m` is inserted.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ExhaustedNamespace`] if every candidate is taken; the
    ///   record's name is restored
    /// - [`CoreError::Storage`] if the store cannot be reached
    pub fn generate_name<M: Renamable>(&self, m: &mut M) -> CoreResult<String> {
        let original = m.name().to_string();
        let attempts = self.config().name_attempts;
        let mut conn = self.manager().acquire()?;

        for index in 0..attempts {
            let candidate = candidate_name(M::NAME_STEM, M::NAME_EXTENSION, index);
            m.set_name(candidate.clone());
            match conn.exists(&m.key()) {
                Ok(false) => {
                    debug!(name = %candidate, "generated free name");
                    return Ok(candidate);
                }
                Ok(true) => {}
                Err(err) => {
                    m.set_name(original);
                    return Err(err.into());
                }
            }
        }

        m.set_name(original);
        warn!(stem = M::NAME_STEM, attempts, "no free name left");
        Err(CoreError::ExhaustedNamespace {
            stem: M::NAME_STEM,
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_follow_stem_pattern() {
        assert_eq!(candidate_name("untitled", ".md", 0), "untitled.md");
        assert_eq!(candidate_name("untitled", ".md", 1), "untitled_1.md");
        assert_eq!(candidate_name("untitled", ".md", 9), "untitled_9.md");
    }

    #[test]
    fn counter_keys_are_namespaced() {
        assert_eq!(counter_key("pages"), "key:pages");
    }
}
