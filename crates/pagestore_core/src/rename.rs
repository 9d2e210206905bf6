//! Moving a record from one name-derived key to another.

use crate::error::{CoreError, CoreResult};
use crate::model::Renamable;
use crate::store::{RecordStore, WriteMode};
use pagestore_storage::{Connection, Connector};
use tracing::{error, info, warn};

impl<C: Connector> RecordStore<C> {
    /// Renames `m` to `new_name`, moving its stored record and registration.
    ///
    /// Steps, in order:
    ///
    /// 1. set the new name and validate
    /// 2. relocate any out-of-band payload ([`Renamable::relocate`])
    /// 3. move the stored hash to the new key
    /// 4. swap the registration set membership
    /// 5. overwrite the record at the new key with `m`'s current fields
    ///
    /// If the new name produces the same key, this is a plain save.
    ///
    /// The steps are not atomic. A failure before step 3 leaves storage
    /// untouched (the payload is moved back if step 3 itself fails). A
    /// failure after that returns [`CoreError::PartialFailure`] naming the
    /// step; the store may then list the old key, the new key, or neither.
    ///
    /// On any error `m` keeps the new name; callers should reload it.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Validation`] if the renamed record is invalid
    /// - [`CoreError::NotFound`] if the record is not stored at its old key
    /// - [`CoreError::DuplicateKey`] if a record already exists at the new key
    /// - [`CoreError::Io`] if the payload cannot be relocated
    /// - [`CoreError::PartialFailure`] as described above
    pub fn rename<M: Renamable>(&self, m: &mut M, new_name: &str) -> CoreResult<()> {
        self.register::<M>()?;
        let old_key = m.key();
        let old_name = m.name().to_string();

        m.set_name(new_name.to_string());
        let new_key = m.key();
        if !m.validate() {
            return Err(CoreError::validation(new_key));
        }

        let mut conn = self.manager().acquire()?;
        if new_key == old_key {
            self.write_record(&mut *conn, &*m, WriteMode::Save)?;
            return Ok(());
        }

        if !conn.exists(&old_key)? {
            return Err(CoreError::not_found(old_key, "rename"));
        }
        if conn.exists(&new_key)? {
            return Err(CoreError::duplicate_key(new_key, "rename"));
        }

        m.relocate(&old_name, new_name)?;

        if let Err(err) = conn.rename(&old_key, &new_key) {
            if let Err(undo) = m.relocate(new_name, &old_name) {
                error!(
                    from = %old_key,
                    to = %new_key,
                    error = %undo,
                    "payload left at new name after failed rename"
                );
                return Err(partial(&old_key, &new_key, "restore payload", undo.into()));
            }
            warn!(from = %old_key, to = %new_key, error = %err, "rename refused");
            return Err(err.into());
        }

        let registration = m.registration_key();
        conn.srem(&registration, &old_key)
            .map_err(|err| partial(&old_key, &new_key, "unregister old key", err.into()))?;
        conn.sadd(&registration, &new_key)
            .map_err(|err| partial(&old_key, &new_key, "register new key", err.into()))?;
        self.write_record(&mut *conn, &*m, WriteMode::Save)
            .map_err(|err| partial(&old_key, &new_key, "save record", err))?;

        info!(from = %old_key, to = %new_key, "renamed record");
        Ok(())
    }
}

fn partial(from: &str, to: &str, step: &'static str, source: CoreError) -> CoreError {
    error!(from, to, step, error = %source, "rename stopped part way");
    CoreError::PartialFailure {
        from: from.to_string(),
        to: to.to_string(),
        step,
        source: Box::new(source),
    }
}
