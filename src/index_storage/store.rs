use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use super::metadata::CacheMap;
use super::persistence::{get_index_path, load_cache, remove_cache, save_cache};
use crate::models::SessionFile;

/// Result of checking discovered files against the persisted cache
#[derive(Debug, Default)]
pub struct Partition {
    /// Entries whose stored identity matches the file as discovered
    pub valid: CacheMap,
    /// Files with no entry, or whose entry is out of date
    pub stale: Vec<SessionFile>,
}

/// Diagnostic view of the persisted cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub exists: bool,
    pub size_on_disk: u64,
    pub total_entries: usize,
    pub valid_entries: usize,
}

/// Persistent per-file prompt cache living in one directory
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the cache, degrading to empty on any failure. Never errors.
    fn load_or_empty(&self) -> CacheMap {
        match load_cache(&self.dir) {
            Ok(Some(entries)) => entries,
            Ok(None) => CacheMap::new(),
            Err(e) => {
                warn!(
                    dir = %self.dir.display(),
                    error = %format!("{:#}", e),
                    "ignoring unreadable prompt cache"
                );
                CacheMap::new()
            }
        }
    }

    /// Split `files` into those served by a valid cache entry and those that must be parsed
    pub fn partition(&self, files: &[SessionFile]) -> Partition {
        let mut cache = self.load_or_empty();
        let mut partition = Partition::default();

        for file in files {
            let key = file.identity.cache_key();
            match cache.remove(&key) {
                Some(entry) if entry.identity == file.identity => {
                    partition.valid.insert(key, entry);
                }
                _ => partition.stale.push(file.clone()),
            }
        }

        debug!(
            valid = partition.valid.len(),
            stale = partition.stale.len(),
            dropped = cache.len(),
            "partitioned session files against cache"
        );
        partition
    }

    /// Union `fresh` into `existing` and persist the result.
    ///
    /// The union always happens; the error only reports that persisting failed.
    pub fn merge(&self, existing: &mut CacheMap, fresh: CacheMap) -> Result<()> {
        existing.extend(fresh);
        save_cache(&self.dir, existing)
    }

    /// Delete the persisted cache; the next load starts cold
    pub fn invalidate_all(&self) -> Result<()> {
        remove_cache(&self.dir)
    }

    /// Size and entry counts; re-stats every cached file to count valid entries
    pub fn stats(&self) -> CacheStats {
        let index_path = get_index_path(&self.dir);
        let Ok(metadata) = fs::metadata(&index_path) else {
            return CacheStats::default();
        };

        let cache = match load_cache(&self.dir) {
            Ok(Some(entries)) => entries,
            _ => return CacheStats::default(),
        };

        let valid_entries = cache.values().filter(|entry| entry.is_valid()).count();
        CacheStats {
            exists: true,
            size_on_disk: metadata.len(),
            total_entries: cache.len(),
            valid_entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::index_storage::{CacheEntry, FileIdentity, get_index_path};

    /// Helper to create a session file and describe it as discovery would
    fn session_file(project_dir: &Path, name: &str, content: &str) -> SessionFile {
        fs::create_dir_all(project_dir).unwrap();
        let path = project_dir.join(name);
        fs::write(&path, content).unwrap();
        SessionFile {
            identity: FileIdentity::from_path(&path).unwrap(),
            project_dir: project_dir.to_path_buf(),
        }
    }

    fn entry_for(file: &SessionFile) -> CacheMap {
        let mut map = CacheMap::new();
        map.insert(
            file.identity.cache_key(),
            CacheEntry { identity: file.identity.clone(), prompts: vec![] },
        );
        map
    }

    #[test]
    fn test_partition_cold_cache_marks_everything_stale() {
        let data = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let files = vec![
            session_file(&data.path().join("a"), "s1.jsonl", "x"),
            session_file(&data.path().join("b"), "s2.jsonl", "y"),
        ];

        let store = CacheStore::new(cache.path());
        let partition = store.partition(&files);

        assert!(partition.valid.is_empty());
        assert_eq!(partition.stale, files);
    }

    #[test]
    fn test_partition_after_merge_splits_changed_files() {
        let data = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let store = CacheStore::new(cache.path());

        let unchanged = session_file(&data.path().join("a"), "s1.jsonl", "x");
        let changed = session_file(&data.path().join("a"), "s2.jsonl", "y");
        let mut existing = CacheMap::new();
        let mut fresh = entry_for(&unchanged);
        fresh.extend(entry_for(&changed));
        store.merge(&mut existing, fresh).unwrap();

        let changed_now = session_file(&data.path().join("a"), "s2.jsonl", "longer content");
        let partition = store.partition(&[unchanged.clone(), changed_now.clone()]);

        assert_eq!(partition.valid.len(), 1);
        assert!(partition.valid.contains_key(&unchanged.identity.cache_key()));
        assert_eq!(partition.stale, vec![changed_now]);
    }

    #[test]
    fn test_partition_corrupt_cache_is_cold() {
        let data = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let store = CacheStore::new(cache.path());
        let file = session_file(&data.path().join("a"), "s1.jsonl", "x");
        store.merge(&mut CacheMap::new(), entry_for(&file)).unwrap();

        fs::write(get_index_path(cache.path()), b"\x00garbage").unwrap();

        let partition = store.partition(std::slice::from_ref(&file));
        assert!(partition.valid.is_empty());
        assert_eq!(partition.stale.len(), 1);
    }

    #[test]
    fn test_stats_counts_valid_entries() {
        let data = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let store = CacheStore::new(cache.path());
        assert_eq!(store.stats(), CacheStats::default());

        let keep = session_file(&data.path().join("a"), "s1.jsonl", "x");
        let gone = session_file(&data.path().join("a"), "s2.jsonl", "y");
        let mut fresh = entry_for(&keep);
        fresh.extend(entry_for(&gone));
        store.merge(&mut CacheMap::new(), fresh).unwrap();
        fs::remove_file(gone.path()).unwrap();

        let stats = store.stats();
        assert!(stats.exists);
        assert!(stats.size_on_disk > 0);
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.valid_entries, 1);
    }

    #[test]
    fn test_invalidate_all_starts_cold() {
        let data = TempDir::new().unwrap();
        let cache = TempDir::new().unwrap();
        let store = CacheStore::new(cache.path());
        let file = session_file(&data.path().join("a"), "s1.jsonl", "x");
        store.merge(&mut CacheMap::new(), entry_for(&file)).unwrap();

        store.invalidate_all().unwrap();

        assert!(!store.stats().exists);
        assert_eq!(store.partition(std::slice::from_ref(&file)).stale.len(), 1);
    }
}
