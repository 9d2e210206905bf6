//! Connection manager: a bounded pool of store connections.

use crate::config::PoolConfig;
use crate::connection::{Connection, Connector, ServerCommands};
use crate::error::{StorageError, StorageResult};
use parking_lot::{Condvar, Mutex};
use std::ops::{Deref, DerefMut};
use std::time::Instant;
use tracing::{debug, error, info};

struct PoolState<T> {
    idle: Vec<T>,
    open: usize,
}

/// Owns every connection to one key-value store.
///
/// The manager hands out exclusive connections through [`Self::acquire`];
/// a connection goes back to the pool when its [`PooledConnection`] guard
/// is dropped, on success and error paths alike.
///
/// # Isolation
///
/// In isolated mode every freshly opened connection issues
/// `SELECT <isolated_database>` before it is handed out, so test traffic
/// never touches the production database. [`Self::clear_all`] is only
/// permitted in isolated mode.
///
/// # Thread Safety
///
/// `ConnectionManager` is `Send + Sync` and is meant to be shared by every
/// request worker, typically behind an `Arc` or inside a longer-lived store.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    config: PoolConfig,
    size: usize,
    state: Mutex<PoolState<C::Connection>>,
    available: Condvar,
}

/// A point-in-time view of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Maximum number of connections.
    pub size: usize,
    /// Connections currently open (idle or checked out).
    pub open: usize,
    /// Connections waiting in the pool.
    pub idle: usize,
}

impl<C: Connector> ConnectionManager<C> {
    /// Creates a manager over `connector`.
    ///
    /// Connections are opened lazily, on first demand.
    pub fn new(connector: C, config: PoolConfig) -> Self {
        let size = config.size.max(1);
        info!(
            target_store = %connector.describe(),
            size,
            isolated = config.isolated,
            "connection manager ready"
        );
        Self {
            connector,
            size,
            config,
            state: Mutex::new(PoolState {
                idle: Vec::new(),
                open: 0,
            }),
            available: Condvar::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Returns the underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Returns true if connections are confined to the isolated database.
    pub fn is_isolated(&self) -> bool {
        self.config.isolated
    }

    /// Returns current pool occupancy.
    pub fn status(&self) -> PoolStatus {
        let state = self.state.lock();
        PoolStatus {
            size: self.size,
            open: state.open,
            idle: state.idle.len(),
        }
    }

    /// Acquires an exclusive connection.
    ///
    /// Reuses an idle connection when one exists, opens a new one while the
    /// pool is below its size, and otherwise waits up to the configured
    /// timeout for another caller to release one.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Connection`] if a new connection cannot be opened
    /// - [`StorageError::PoolTimeout`] if the pool stays exhausted until the deadline
    pub fn acquire(&self) -> StorageResult<PooledConnection<'_, C>> {
        let deadline = Instant::now() + self.config.wait_timeout;
        let mut state = self.state.lock();

        loop {
            if let Some(conn) = state.idle.pop() {
                return Ok(PooledConnection::new(self, conn));
            }

            if state.open < self.size {
                state.open += 1;
                drop(state);
                return match self.open_connection() {
                    Ok(conn) => Ok(PooledConnection::new(self, conn)),
                    Err(err) => {
                        self.state.lock().open -= 1;
                        self.available.notify_one();
                        Err(err)
                    }
                };
            }

            if self.available.wait_until(&mut state, deadline).timed_out()
                && state.idle.is_empty()
                && state.open >= self.size
            {
                return Err(StorageError::PoolTimeout {
                    waited: self.config.wait_timeout,
                });
            }
        }
    }

    /// Removes every key in the isolated database.
    ///
    /// Used to reset test environments between runs.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotIsolated`] when the manager is in
    /// production mode; nothing is deleted in that case.
    pub fn clear_all(&self) -> StorageResult<()> {
        if !self.config.isolated {
            error!(
                target_store = %self.connector.describe(),
                "clear_all invoked outside isolated mode"
            );
            return Err(StorageError::NotIsolated);
        }

        let mut conn = self.acquire()?;
        let backend = conn.backend_mut();
        backend.select(self.config.isolated_database)?;
        backend.flushdb()?;
        info!(
            database = self.config.isolated_database,
            "isolated namespace cleared"
        );
        Ok(())
    }

    fn open_connection(&self) -> StorageResult<C::Connection> {
        let mut conn = self.connector.connect()?;
        if self.config.isolated {
            conn.select(self.config.isolated_database)?;
        }
        debug!(target_store = %self.connector.describe(), "opened connection");
        Ok(conn)
    }

    fn release(&self, conn: C::Connection) {
        let mut state = self.state.lock();
        if conn.is_open() {
            state.idle.push(conn);
        } else {
            state.open -= 1;
            debug!("discarding closed connection");
        }
        drop(state);
        self.available.notify_one();
    }
}

/// An exclusive connection borrowed from a [`ConnectionManager`].
///
/// Dereferences to the [`Connection`] command set only; database-wide
/// [`ServerCommands`] stay with the manager. Returned to the pool on drop.
///
/// ```rust,compile_fail
/// use pagestore_storage::{ConnectionManager, InMemoryConnector, PoolConfig, ServerCommands};
///
/// let manager = ConnectionManager::new(InMemoryConnector::new(), PoolConfig::default());
/// let mut conn = manager.acquire().unwrap();
/// conn.flushdb().unwrap();
/// ```
pub struct PooledConnection<'a, C: Connector> {
    manager: &'a ConnectionManager<C>,
    conn: Option<C::Connection>,
}

impl<'a, C: Connector> PooledConnection<'a, C> {
    fn new(manager: &'a ConnectionManager<C>, conn: C::Connection) -> Self {
        Self {
            manager,
            conn: Some(conn),
        }
    }

    fn backend(&self) -> &C::Connection {
        self.conn
            .as_ref()
            .expect("pooled connection is present until drop")
    }

    fn backend_mut(&mut self) -> &mut C::Connection {
        self.conn
            .as_mut()
            .expect("pooled connection is present until drop")
    }
}

impl<C: Connector> Deref for PooledConnection<'_, C> {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        self.backend()
    }
}

impl<C: Connector> DerefMut for PooledConnection<'_, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.backend_mut()
    }
}

impl<C: Connector> Drop for PooledConnection<'_, C> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.manager.release(conn);
        }
    }
}
