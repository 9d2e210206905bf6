//! Test fixtures and store helpers.

use pagestore_core::{Config, RecordStore};
use pagestore_models::{Domain, File, Page, User};
use pagestore_storage::InMemoryConnector;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// An isolated in-memory store with a scratch payload directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestStore {
    /// The store instance.
    pub store: RecordStore<InMemoryConnector>,
    data_dir: TempDir,
}

impl TestStore {
    /// Creates a store confined to the isolated namespace.
    pub fn new() -> Self {
        Self::with_config(Config::isolated())
    }

    /// Creates a store from `config`, replacing its payload directory.
    pub fn with_config(config: Config) -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp directory");
        let config = config.data_dir(data_dir.path());
        Self {
            store: RecordStore::in_memory(config),
            data_dir,
        }
    }

    /// Returns the payload directory.
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Inserts a file record and writes its payload.
    pub fn insert_file(&self, domain: &str, name: &str, contents: &[u8]) -> File {
        let mut file = File::new(domain, name, self.data_dir());
        file.hash = format!("{:x}", contents.len());
        file.size = contents.len() as i64;
        fs::write(file.path(), contents).expect("Failed to write payload");
        self.store.insert(&file).expect("Failed to insert file");
        file
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestStore {
    type Target = RecordStore<InMemoryConnector>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a fresh isolated store.
///
/// # Example
///
/// ```rust,ignore
/// use pagestore_testkit::with_test_store;
///
/// #[test]
/// fn my_test() {
///     with_test_store(|store| {
///         assert_eq!(store.allocate_key("pages").unwrap(), 1);
///     });
/// }
/// ```
pub fn with_test_store<F, R>(f: F) -> R
where
    F: FnOnce(&TestStore) -> R,
{
    let store = TestStore::new();
    f(&store)
}

/// A page that passes validation.
pub fn sample_page(domain: &str, name: &str) -> Page {
    let mut page = Page::new(domain, name);
    page.markdown = format!("# {name}");
    page.html = format!("<h1>{name}</h1>");
    page
}

/// A user that passes validation.
pub fn sample_user(domain: &str) -> User {
    let mut user = User::new();
    user.name = format!("Owner of {domain}");
    user.email = format!("owner@{domain}.example.com");
    user.domain = domain.to_string();
    user
}

/// A custom domain mapping that passes validation.
pub fn sample_domain(external: &str, internal: &str) -> Domain {
    Domain::new(external, internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagestore_core::Model;

    #[test]
    fn samples_validate() {
        assert!(sample_page("acme", "index.md").validate());
        assert!(sample_user("acme").validate());
        assert!(sample_domain("www.acme.com", "acme").validate());
    }

    #[test]
    fn file_fixture_writes_payload() {
        let store = TestStore::new();
        let file = store.insert_file("acme", "cv.pdf", b"resume");
        assert!(file.path().starts_with(store.data_dir()));
        assert_eq!(fs::read(file.path()).unwrap(), b"resume");
        assert!(store.exists(&file).unwrap());
    }

    #[test]
    fn stores_are_independent() {
        let a = TestStore::new();
        let b = TestStore::new();
        a.insert(&sample_page("acme", "index.md")).unwrap();
        assert!(!b.exists(&sample_page("acme", "index.md")).unwrap());
    }
}
