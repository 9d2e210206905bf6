//! Redis backend.

use crate::connection::{Connection, Connector, ServerCommands};
use crate::error::{StorageError, StorageResult};
use redis::ConnectionLike;
use std::collections::HashMap;
use std::time::Duration;

/// Opens connections to a Redis server.
///
/// # Example
///
/// ```rust,no_run
/// use pagestore_storage::{ConnectionManager, PoolConfig, RedisConnector};
///
/// let connector = RedisConnector::open("redis://127.0.0.1:6379").unwrap();
/// let manager = ConnectionManager::new(connector, PoolConfig::default());
/// let mut conn = manager.acquire().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RedisConnector {
    client: redis::Client,
    url: String,
    connect_timeout: Duration,
}

impl RedisConnector {
    /// Default time allowed for establishing a TCP connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a connector for the server at `url`.
    ///
    /// No connection is made until [`Connector::connect`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connection`] if `url` is not a valid Redis URL.
    pub fn open(url: &str) -> StorageResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| StorageError::connection(format!("invalid url `{url}`: {e}")))?;
        Ok(Self {
            client,
            url: url.to_string(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Sets the timeout used when opening connections.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Connector for RedisConnector {
    type Connection = RedisConnection;

    fn connect(&self) -> StorageResult<RedisConnection> {
        let inner = self
            .client
            .get_connection_with_timeout(self.connect_timeout)
            .map_err(|e| StorageError::connection(format!("{}: {e}", self.url)))?;
        Ok(RedisConnection { inner })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// A connection to a Redis server.
pub struct RedisConnection {
    inner: redis::Connection,
}

impl RedisConnection {
    fn query<T: redis::FromRedisValue>(&mut self, cmd: &redis::Cmd) -> StorageResult<T> {
        Ok(cmd.query(&mut self.inner)?)
    }
}

impl Connection for RedisConnection {
    fn hgetall(&mut self, key: &str) -> StorageResult<HashMap<String, String>> {
        self.query(redis::cmd("HGETALL").arg(key))
    }

    fn hset_multiple(&mut self, key: &str, fields: &[(String, String)]) -> StorageResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        self.query(redis::cmd("HSET").arg(key).arg(fields))
    }

    fn exists(&mut self, key: &str) -> StorageResult<bool> {
        self.query(redis::cmd("EXISTS").arg(key))
    }

    fn del(&mut self, key: &str) -> StorageResult<bool> {
        let removed: i64 = self.query(redis::cmd("DEL").arg(key))?;
        Ok(removed > 0)
    }

    fn rename(&mut self, from: &str, to: &str) -> StorageResult<()> {
        match self.query::<()>(redis::cmd("RENAME").arg(from).arg(to)) {
            Err(StorageError::Redis(e)) if is_no_such_key(&e) => {
                Err(StorageError::no_such_key(from))
            }
            other => other,
        }
    }

    fn sadd(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.query(redis::cmd("SADD").arg(key).arg(member))
    }

    fn srem(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.query(redis::cmd("SREM").arg(key).arg(member))
    }

    fn smembers(&mut self, key: &str) -> StorageResult<Vec<String>> {
        let mut members: Vec<String> = self.query(redis::cmd("SMEMBERS").arg(key))?;
        members.sort();
        Ok(members)
    }

    fn sismember(&mut self, key: &str, member: &str) -> StorageResult<bool> {
        self.query(redis::cmd("SISMEMBER").arg(key).arg(member))
    }

    fn incr(&mut self, key: &str) -> StorageResult<i64> {
        self.query(redis::cmd("INCR").arg(key))
    }

    fn ping(&mut self) -> StorageResult<()> {
        let _: String = self.query(&redis::cmd("PING"))?;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }
}

impl ServerCommands for RedisConnection {
    fn select(&mut self, index: i64) -> StorageResult<()> {
        self.query(redis::cmd("SELECT").arg(index))
    }

    fn flushdb(&mut self) -> StorageResult<()> {
        self.query(&redis::cmd("FLUSHDB"))
    }
}

/// Returns true for the server's reply to `RENAME` of a missing key.
fn is_no_such_key(err: &redis::RedisError) -> bool {
    err.kind() == redis::ErrorKind::ResponseError
        && err
            .detail()
            .is_some_and(|detail| detail.eq_ignore_ascii_case("no such key"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        let result = RedisConnector::open("not a url");
        assert!(matches!(result, Err(StorageError::Connection { .. })));
    }

    #[test]
    fn describes_target() {
        let connector = RedisConnector::open("redis://127.0.0.1:6379").unwrap();
        assert_eq!(connector.describe(), "redis://127.0.0.1:6379");
    }

    #[test]
    fn only_missing_source_maps_to_no_such_key() {
        let missing = redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "An error was signalled by the server",
            "no such key".to_string(),
        ));
        assert!(is_no_such_key(&missing));

        let readonly = redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "An error was signalled by the server",
            "You can't write against a read only replica.".to_string(),
        ));
        assert!(!is_no_such_key(&readonly));

        let io = redis::RedisError::from((redis::ErrorKind::IoError, "connection reset"));
        assert!(!is_no_such_key(&io));
    }

    #[test]
    #[ignore = "requires a running Redis server"]
    fn live_server_round_trip() {
        let connector = RedisConnector::open("redis://127.0.0.1:6379").unwrap();
        let mut conn = connector.connect().unwrap();
        conn.select(15).unwrap();
        conn.flushdb().unwrap();

        conn.hset_multiple("pages:acme:index.md", &[("name".into(), "index.md".into())])
            .unwrap();
        assert!(conn.exists("pages:acme:index.md").unwrap());
        conn.rename("pages:acme:index.md", "pages:acme:home.md").unwrap();
        assert_eq!(conn.hgetall("pages:acme:home.md").unwrap()["name"], "index.md");
        assert!(matches!(
            conn.rename("pages:acme:index.md", "x"),
            Err(StorageError::NoSuchKey { .. })
        ));
        conn.flushdb().unwrap();
    }
}
