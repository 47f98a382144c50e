//! In-memory blob store.
//!
//! Backs the repository tests; keeps blobs in a sorted map so `list`
//! order matches what a real object store returns.

use super::{BlobStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Blob store holding everything in a process-local map.
#[derive(Debug, Default)]
#[allow(dead_code)] // Exercised by store and repository tests
pub struct MemoryBlobStore {
    blobs: Mutex<BTreeMap<String, Vec<u8>>>,
}

#[allow(dead_code)] // Exercised by store and repository tests
impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.lock().expect("store lock poisoned").len()
    }
}

impl BlobStore for MemoryBlobStore {
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let blobs = self.blobs.lock().expect("store lock poisoned");
        Ok(blobs
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let blobs = self.blobs.lock().expect("store lock poisoned");
        blobs.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let mut blobs = self.blobs.lock().expect("store lock poisoned");
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
