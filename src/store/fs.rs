//! Filesystem-backed blob store.
//!
//! Keys are slash-separated relative paths resolved under a root
//! directory, e.g. key `guesses/jane.json` lives at
//! `<root>/guesses/jane.json`.

use super::{BlobStore, StoreError, StoreResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blob store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. The directory is created lazily
    /// on first `put`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory this store resolves keys under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path under the root, refusing path traversal.
    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() || key.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(StoreError::Unavailable {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "invalid key"),
            });
        }
        Ok(self.root.join(key))
    }

    fn unavailable(key: &str, source: io::Error) -> StoreError {
        StoreError::Unavailable {
            key: key.to_string(),
            source,
        }
    }
}

impl BlobStore for FsBlobStore {
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        if prefix.split('/').any(|part| part == "..") {
            return Err(Self::unavailable(
                prefix,
                io::Error::new(io::ErrorKind::InvalidInput, "invalid prefix"),
            ));
        }

        // Split the prefix into the directory to scan and a leading
        // filename fragment to match within it.
        let (dir_part, name_part) = match prefix.rfind('/') {
            Some(idx) => (&prefix[..idx], &prefix[idx + 1..]),
            None => ("", prefix),
        };

        let dir = if dir_part.is_empty() {
            self.root.clone()
        } else {
            self.root.join(dir_part)
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            // A store nobody has written to yet has no keys at all.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No directory for prefix '{}' yet", prefix);
                return Ok(Vec::new());
            }
            Err(e) => return Err(Self::unavailable(prefix, e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Self::unavailable(prefix, e))?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(name_part) {
                continue;
            }
            if dir_part.is_empty() {
                keys.push(name);
            } else {
                keys.push(format!("{}/{}", dir_part, name));
            }
        }

        keys.sort();
        Ok(keys)
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.resolve(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(Self::unavailable(key, e)),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::unavailable(key, e))?;
        }
        fs::write(&path, bytes).map_err(|e| Self::unavailable(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_get_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        store.put("guesses/jane.json", b"[]").unwrap();
        assert_eq!(store.get("guesses/jane.json").unwrap(), b"[]");
    }

    #[test]
    fn test_get_missing_key_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store.get("guesses/nobody.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_put_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        store.put("guesses/jane.json", b"old").unwrap();
        store.put("guesses/jane.json", b"new").unwrap();
        assert_eq!(store.get("guesses/jane.json").unwrap(), b"new");
    }

    #[test]
    fn test_list_is_sorted_and_prefix_filtered() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        store.put("guesses/zoe.json", b"[]").unwrap();
        store.put("guesses/abe.json", b"[]").unwrap();
        store.put("other/jane.json", b"[]").unwrap();

        let keys = store.list("guesses/").unwrap();
        assert_eq!(keys, vec!["guesses/abe.json", "guesses/zoe.json"]);
    }

    #[test]
    fn test_list_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        assert!(store.list("guesses/").unwrap().is_empty());
    }

    #[test]
    fn test_traversal_key_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        assert!(store.get("../outside.json").is_err());
        assert!(store.put("guesses/../../escape.json", b"x").is_err());
    }
}
