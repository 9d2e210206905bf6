//! Connection manager configuration.

use std::time::Duration;

/// Database index reserved for isolated (test) traffic.
pub const DEFAULT_ISOLATED_DATABASE: i64 = 15;

/// Configuration for a [`crate::ConnectionManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of open connections.
    pub size: usize,

    /// How long `acquire` waits for a free connection before failing.
    pub wait_timeout: Duration,

    /// Whether connections are confined to the isolated database.
    pub isolated: bool,

    /// Database index selected by every connection in isolated mode.
    pub isolated_database: i64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: 10,
            wait_timeout: Duration::from_secs(5),
            isolated: false,
            isolated_database: DEFAULT_ISOLATED_DATABASE,
        }
    }
}

impl PoolConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a default configuration in isolated mode.
    #[must_use]
    pub fn isolated() -> Self {
        Self::default().with_isolation(true)
    }

    /// Sets the maximum number of open connections.
    #[must_use]
    pub const fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Sets how long `acquire` may wait.
    #[must_use]
    pub const fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Enables or disables isolated mode.
    #[must_use]
    pub const fn with_isolation(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    /// Sets the database index used in isolated mode.
    #[must_use]
    pub const fn isolated_database(mut self, index: i64) -> Self {
        self.isolated_database = index;
        self
    }
}
