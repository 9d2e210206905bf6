//! Record store configuration.

use pagestore_storage::PoolConfig;
use std::path::PathBuf;

/// Configuration for opening a record store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address of the key-value store.
    pub url: String,

    /// Connection manager settings.
    pub pool: PoolConfig,

    /// Ceiling on candidates tried when generating a free record name.
    pub name_attempts: usize,

    /// Directory holding uploaded file payloads.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            pool: PoolConfig::default(),
            name_attempts: 10,
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a default configuration confined to the isolated namespace.
    #[must_use]
    pub fn isolated() -> Self {
        Self::default().pool(PoolConfig::isolated())
    }

    /// Sets the store address.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the connection manager settings.
    #[must_use]
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Sets the name generation ceiling.
    #[must_use]
    pub fn name_attempts(mut self, attempts: usize) -> Self {
        self.name_attempts = attempts;
        self
    }

    /// Sets the payload directory.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}
