//! Per-submitter guess shards.
//!
//! Every submitter identity owns at most one shard: a JSON array of
//! guesses at `guesses/<normalized-id>.json`. Submissions append to the
//! shard by reading it, concatenating, and rewriting it wholesale.
//!
//! The read-modify-write is deliberately not transactional. Two
//! overlapping appends for the *same* identity race, and the later
//! write wins over the earlier one's read. Submitter collisions are
//! rare and guesses are low-stakes, so this is an accepted limitation
//! of the storage contract, not something this layer papers over.

use crate::models::{normalize_submitter_id, Guess};
use crate::store::{BlobStore, StoreError};
use thiserror::Error;
use tracing::{debug, warn};

/// Key prefix all shards live under.
pub const SHARD_PREFIX: &str = "guesses/";

/// File extension shards are stored with.
pub const SHARD_EXT: &str = ".json";

/// Failures in the repository layer.
#[derive(Debug, Error)]
pub enum RepoError {
    /// An existing shard could not be parsed while appending. The shard
    /// is left untouched and the new guesses are not persisted.
    #[error("shard {key} is unreadable; refusing to overwrite it")]
    CorruptShard {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The submitter identity normalized to an empty string, so no
    /// shard key can be derived.
    #[error("submitter id is empty after normalization")]
    InvalidSubmitter,

    /// A shard failed to serialize before writing.
    #[error("failed to encode shard {key}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Storage key for a normalized submitter id.
pub fn shard_key(submitter_id: &str) -> String {
    format!("{}{}{}", SHARD_PREFIX, submitter_id, SHARD_EXT)
}

/// Repository of guesses, sharded per submitter identity.
pub struct GuessRepository<S> {
    store: S,
}

impl<S: BlobStore> GuessRepository<S> {
    /// Create a repository over the given blob store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Direct access to the underlying store.
    #[allow(dead_code)] // Used by tests to inspect raw shard bytes
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load every guess from every shard, in key-listing order.
    ///
    /// Order is stable per shard (submission order) but not globally
    /// time-ordered across shards. A shard that fails to parse is
    /// skipped with a warning so one bad file never hides everyone
    /// else's guesses. An empty store yields an empty vec.
    pub fn load_all(&self) -> Result<Vec<Guess>, RepoError> {
        let keys = self.store.list(SHARD_PREFIX)?;
        let mut guesses = Vec::new();

        for key in keys {
            if !key.ends_with(SHARD_EXT) {
                debug!("Ignoring non-shard key: {}", key);
                continue;
            }

            let bytes = match self.store.get(&key) {
                Ok(bytes) => bytes,
                // Listed a moment ago but gone now; nothing to merge.
                Err(StoreError::NotFound { .. }) => continue,
                Err(e) => return Err(e.into()),
            };

            match serde_json::from_slice::<Vec<Guess>>(&bytes) {
                Ok(mut shard) => guesses.append(&mut shard),
                Err(e) => {
                    warn!("Skipping unreadable shard {}: {}", key, e);
                }
            }
        }

        Ok(guesses)
    }

    /// Append guesses to the submitter's shard, creating it on first use.
    ///
    /// Reads the existing shard (`NotFound` means an empty shard),
    /// concatenates the new guesses at the end, and rewrites the file
    /// wholesale. If the existing content does not parse, the append is
    /// aborted with [`RepoError::CorruptShard`] before anything is
    /// written; the unreadable shard keeps its prior bytes and the new
    /// guesses are not persisted.
    pub fn append(&self, submitter_id: &str, guesses: &[Guess]) -> Result<(), RepoError> {
        let id = normalize_submitter_id(submitter_id);
        if id.is_empty() {
            return Err(RepoError::InvalidSubmitter);
        }
        let key = shard_key(&id);

        let mut shard = match self.store.get(&key) {
            Ok(bytes) => serde_json::from_slice::<Vec<Guess>>(&bytes).map_err(|source| {
                RepoError::CorruptShard {
                    key: key.clone(),
                    source,
                }
            })?,
            Err(StoreError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        shard.extend_from_slice(guesses);

        // Pretty-printed so the shard files stay human-diffable.
        let bytes = serde_json::to_vec_pretty(&shard).map_err(|source| RepoError::Encode {
            key: key.clone(),
            source,
        })?;

        self.store.put(&key, &bytes)?;
        debug!("Shard {} now holds {} guesses", key, shard.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Arrival;
    use crate::store::MemoryBlobStore;

    fn guess(guesser: &str, baby: &str, weight: f64, arrival: Arrival) -> Guess {
        Guess {
            guesser_name: guesser.to_string(),
            baby_name: baby.to_string(),
            weight,
            arrival,
        }
    }

    fn repo() -> GuessRepository<MemoryBlobStore> {
        GuessRepository::new(MemoryBlobStore::new())
    }

    #[test]
    fn test_load_all_empty_store() {
        assert!(repo().load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_then_load_includes_guess_once() {
        let repo = repo();
        let g = guess("Jane", "Sam", 7.5, Arrival::Early);

        repo.append("Jane", std::slice::from_ref(&g)).unwrap();

        let all = repo.load_all().unwrap();
        assert_eq!(all, vec![g]);
    }

    #[test]
    fn test_submitter_id_is_normalized_into_shard_key() {
        let repo = repo();
        repo.append(" Jane ", &[guess("Jane", "Sam", 7.5, Arrival::Early)])
            .unwrap();

        assert!(repo.store().get("guesses/jane.json").is_ok());
    }

    #[test]
    fn test_sequential_appends_same_id_yield_union_in_order() {
        let repo = repo();
        let first = guess("Jane", "Sam", 7.5, Arrival::Early);
        let second = guess("Jane", "Max", 7.5, Arrival::Late);

        repo.append("Jane", std::slice::from_ref(&first)).unwrap();
        repo.append("jane", std::slice::from_ref(&second)).unwrap();

        let all = repo.load_all().unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[test]
    fn test_different_submitters_get_different_shards() {
        let repo = repo();
        repo.append("Jane", &[guess("Jane", "Sam", 7.5, Arrival::Early)])
            .unwrap();
        repo.append("Bob", &[guess("Bob", "Ada", 6.0, Arrival::OnTime)])
            .unwrap();

        assert_eq!(repo.store().len(), 2);
        assert_eq!(repo.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_load_all_skips_corrupt_shard_but_keeps_the_rest() {
        let repo = repo();
        repo.append("Jane", &[guess("Jane", "Sam", 7.5, Arrival::Early)])
            .unwrap();
        repo.store()
            .put("guesses/bob.json", b"this is not json")
            .unwrap();

        let all = repo.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].guesser_name, "Jane");
    }

    #[test]
    fn test_load_all_ignores_keys_without_shard_extension() {
        let repo = repo();
        repo.store().put("guesses/readme.txt", b"hello").unwrap();

        assert!(repo.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_onto_corrupt_shard_fails_and_writes_nothing() {
        let repo = repo();
        let broken = b"{not a shard";
        repo.store().put("guesses/bob.json", broken).unwrap();

        let err = repo
            .append("Bob", &[guess("Bob", "Ada", 6.0, Arrival::OnTime)])
            .unwrap_err();
        assert!(matches!(err, RepoError::CorruptShard { .. }));

        // The unreadable shard must be left byte-identical.
        assert_eq!(repo.store().get("guesses/bob.json").unwrap(), broken);
    }

    #[test]
    fn test_append_empty_submitter_rejected() {
        let err = repo()
            .append("   ", &[guess("x", "y", 7.0, Arrival::Late)])
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidSubmitter));
    }

    #[test]
    fn test_load_all_from_fixture_shards() {
        use crate::store::FsBlobStore;

        let root = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");
        let repo = GuessRepository::new(FsBlobStore::new(root));

        // jane.json parses; broken.json is skipped.
        let all = repo.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].baby_name, "Sam");
        assert_eq!(all[1].baby_name, "Max");
    }

    #[test]
    fn test_append_onto_corrupt_fixture_shard_leaves_file_unchanged() {
        use crate::store::FsBlobStore;
        use std::fs;

        // Copy the fixtures into a scratch directory so a regression
        // cannot scribble over the checked-in files.
        let dir = tempfile::TempDir::new().unwrap();
        let scratch = dir.path().join("guesses");
        fs::create_dir_all(&scratch).unwrap();
        let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/guesses/broken.json");
        fs::copy(fixture, scratch.join("broken.json")).unwrap();

        let repo = GuessRepository::new(FsBlobStore::new(dir.path()));
        let err = repo
            .append("Broken", &[guess("Broken", "Ada", 6.0, Arrival::OnTime)])
            .unwrap_err();
        assert!(matches!(err, RepoError::CorruptShard { .. }));

        let after = fs::read(scratch.join("broken.json")).unwrap();
        assert_eq!(after, fs::read(fixture).unwrap());
    }

    #[test]
    fn test_shard_wire_format_is_pretty_json_array() {
        let repo = repo();
        repo.append("Jane", &[guess("Jane", "Sam", 7.5, Arrival::OnTime)])
            .unwrap();

        let bytes = repo.store().get("guesses/jane.json").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("\"guesserName\": \"Jane\""));
        assert!(text.contains("\"arrival\": \"On-time\""));
    }
}
