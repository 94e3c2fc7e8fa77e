//! Persistence of generated documents. The batch only sees
//! [`DocumentStore`]; the server writes to disk and serves the directory.

use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::error::{EngineError, Result};

/// Where generated documents end up.
pub trait DocumentStore {
    /// Persists `bytes` under `file_name` and returns a URL for it.
    fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

/// Writes documents into a directory that is served under `url_prefix`.
#[derive(Debug, Clone)]
pub struct DiskDocumentStore {
    dir: PathBuf,
    url_prefix: String,
}

impl DiskDocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: "/files".to_string(),
        }
    }

    pub fn with_url_prefix(mut self, prefix: &str) -> Self {
        self.url_prefix = prefix.trim_end_matches('/').to_string();
        self
    }
}

impl DocumentStore for DiskDocumentStore {
    fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            EngineError::PersistenceFailure(format!("{}: {}", self.dir.display(), e))
        })?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)
            .map_err(|e| EngineError::PersistenceFailure(format!("{}: {}", path.display(), e)))?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(format!("{}/{}", self.url_prefix, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskDocumentStore::new(dir.path().join("out"));
        let url = store.persist("carta_1.txt", b"Hola").unwrap();
        assert_eq!(url, "/files/carta_1.txt");
        assert_eq!(fs::read(dir.path().join("out/carta_1.txt")).unwrap(), b"Hola");
    }

    #[test]
    fn unwritable_directory_is_a_persistence_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let store = DiskDocumentStore::new(&blocker).with_url_prefix("/docs/");
        let err = store.persist("a.txt", b"y").unwrap_err();
        assert!(matches!(err, EngineError::PersistenceFailure(_)));
    }
}
