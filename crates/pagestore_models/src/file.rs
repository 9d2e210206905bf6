//! Uploaded files.

use crate::validate::{is_valid_domain, is_valid_filename, sanitize_filename};
use pagestore_codec::{field_table, Field, Schema};
use pagestore_core::{Model, Renamable};
use serde_json::{json, Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A file uploaded by a tenant, such as a resume or an image.
///
/// The record holds metadata only. The payload lives on disk at
/// [`File::path`], which is derived from the domain, content hash and name;
/// renaming the record moves the payload too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    /// File name, part of the key.
    pub name: String,
    /// Content hash.
    pub hash: String,
    /// Size in bytes.
    pub size: i64,
    /// Owning tenant.
    pub domain: String,
    /// Directory holding payloads. Not persisted.
    pub data_dir: PathBuf,
}

impl File {
    /// Creates a file handle for `domain`/`name` with payloads under `data_dir`.
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Creates a listing prototype for every file of `domain`.
    pub fn for_domain(domain: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self::new(domain, "", data_dir)
    }

    /// Where the payload is stored.
    pub fn path(&self) -> PathBuf {
        self.path_for(&self.name)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}-{}-{}", self.domain, self.hash, name))
    }

    /// Sets the name with every illegal character removed.
    pub fn set_name_safely(&mut self, name: &str) {
        self.name = sanitize_filename(name);
    }
}

impl Schema for File {
    fn fields() -> &'static [Field<Self>] {
        static FIELDS: &[Field<File>] = field_table!(File {
            "name" => name: Text,
            "hash" => hash: Text,
            "size" => size: Int,
            "domain" => domain: Text,
        });
        FIELDS
    }
}

impl Model for File {
    fn key(&self) -> String {
        format!("files:{}:{}", self.domain, self.name)
    }

    fn registration_key(&self) -> String {
        format!("files:{}", self.domain)
    }

    fn validate(&self) -> bool {
        if !is_valid_domain(&self.domain) {
            debug!(file = %self.name, domain = %self.domain, "illegal domain");
            return false;
        }
        if !is_valid_filename(&self.name) {
            debug!(file = %self.name, "illegal filename");
            return false;
        }
        true
    }

    fn make_default(&mut self) {}

    fn export(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("name".into(), json!(self.name));
        out
    }
}

impl Renamable for File {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Moves the payload. Refuses to replace an existing payload.
    fn relocate(&self, from: &str, to: &str) -> io::Result<()> {
        let source = self.path_for(from);
        let target = self.path_for(to);
        if target.exists() {
            warn!(target = %target.display(), "payload already exists at new path");
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", target.display()),
            ));
        }
        move_payload(&source, &target)
    }
}

fn move_payload(source: &Path, target: &Path) -> io::Result<()> {
    fs::rename(source, target).map_err(|err| {
        warn!(
            from = %source.display(),
            to = %target.display(),
            error = %err,
            "failed to move payload"
        );
        err
    })?;
    debug!(from = %source.display(), to = %target.display(), "moved payload");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_combines_domain_hash_and_name() {
        let mut file = File::new("acme", "cv.pdf", "/srv/data");
        file.hash = "abc123".into();
        assert_eq!(file.path(), PathBuf::from("/srv/data/acme-abc123-cv.pdf"));
    }

    #[test]
    fn safe_names_always_validate() {
        let mut file = File::new("acme", "", "./data");
        file.set_name_safely("my résumé (final).pdf");
        assert_eq!(file.name, "myrsumfinal.pdf");
        assert!(file.validate());
    }

    #[test]
    fn data_dir_is_not_persisted() {
        assert!(File::fields().iter().all(|f| f.name != "data_dir"));
    }

    #[test]
    fn relocate_moves_payload() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = File::new("acme", "a.txt", dir.path());
        file.hash = "h".into();
        fs::write(file.path(), b"payload").unwrap();

        file.relocate("a.txt", "b.txt").unwrap();
        assert!(!dir.path().join("acme-h-a.txt").exists());
        assert_eq!(fs::read(dir.path().join("acme-h-b.txt")).unwrap(), b"payload");
    }

    #[test]
    fn relocate_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::new("acme", "a.txt", dir.path());
        fs::write(dir.path().join("acme--a.txt"), b"one").unwrap();
        fs::write(dir.path().join("acme--b.txt"), b"two").unwrap();

        let err = file.relocate("a.txt", "b.txt").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(dir.path().join("acme--a.txt")).unwrap(), b"one");
    }
}
