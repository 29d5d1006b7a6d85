//! Cache persistence: load/save with atomic writes

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bincode::config;
use chrono::Utc;
use serde::Serialize;

use super::metadata::{CACHE_VERSION, CacheFile, CacheMap, CacheMetadata};

const APP_CACHE_DIR: &str = "ai-prompt-history";

/// Largest cache body we will read. Also the decode limit, so a corrupt length
/// prefix fails with an error instead of a huge allocation.
pub const MAX_CACHE_BYTES: usize = 256 * 1024 * 1024;

/// Borrowing twin of [`CacheFile`] so saving never clones the entries
#[derive(Serialize)]
struct CacheFileRef<'a> {
    version: u32,
    entries: &'a CacheMap,
}

/// Get platform-specific cache directory
///
/// - macOS: `~/Library/Caches/ai-prompt-history/`
/// - Linux: `~/.cache/ai-prompt-history/`
/// - Windows: `%LOCALAPPDATA%\ai-prompt-history\`
pub fn default_cache_dir() -> Result<PathBuf> {
    let cache_base = dirs::cache_dir().context("Failed to get platform cache directory")?;
    Ok(cache_base.join(APP_CACHE_DIR))
}

/// Get path to the binary entries file
pub fn get_index_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(format!("prompt-cache-v{}.bin", CACHE_VERSION))
}

/// Get path to the metadata file
pub fn get_metadata_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(format!("prompt-cache-v{}.meta.json", CACHE_VERSION))
}

/// Load cached entries from `cache_dir`
///
/// Returns `Ok(None)` if either file is missing (cold start). Returns an error if the
/// files exist but cannot be read or decoded, or disagree with each other.
pub fn load_cache(cache_dir: &Path) -> Result<Option<CacheMap>> {
    let metadata_path = get_metadata_path(cache_dir);
    let index_path = get_index_path(cache_dir);

    if !metadata_path.exists() || !index_path.exists() {
        return Ok(None);
    }

    let metadata_json =
        fs::read_to_string(&metadata_path).context("Failed to read cache metadata file")?;
    let metadata: CacheMetadata =
        serde_json::from_str(&metadata_json).context("Failed to parse cache metadata JSON")?;
    if metadata.version != CACHE_VERSION {
        bail!("Cache version mismatch (expected {}, found {})", CACHE_VERSION, metadata.version);
    }

    let index_len = fs::metadata(&index_path).context("Failed to stat cache index file")?.len();
    if index_len > MAX_CACHE_BYTES as u64 {
        bail!("Cache index is {} bytes, over the {} byte limit", index_len, MAX_CACHE_BYTES);
    }

    let index_bytes = fs::read(&index_path).context("Failed to read cache index file")?;
    let (file, consumed): (CacheFile, usize) = bincode::serde::decode_from_slice(
        &index_bytes,
        config::standard().with_limit::<MAX_CACHE_BYTES>(),
    )
    .context("Failed to deserialize cache index")?;

    if consumed != index_bytes.len() {
        bail!("Cache index has {} trailing bytes", index_bytes.len() - consumed);
    }
    if file.version != CACHE_VERSION {
        bail!("Cache index version mismatch (expected {}, found {})", CACHE_VERSION, file.version);
    }
    if file.entries.len() != metadata.entry_count {
        bail!(
            "Cache index holds {} entries but metadata expects {}",
            file.entries.len(),
            metadata.entry_count
        );
    }

    Ok(Some(file.entries))
}

/// Save entries atomically (temp file + rename), binary body first, metadata last
pub fn save_cache(cache_dir: &Path, entries: &CacheMap) -> Result<()> {
    fs::create_dir_all(cache_dir).context("Failed to create cache directory")?;

    let index_path = get_index_path(cache_dir);
    let index_temp = index_path.with_extension("bin.tmp");
    let index_bytes = bincode::serde::encode_to_vec(
        CacheFileRef { version: CACHE_VERSION, entries },
        config::standard(),
    )
    .context("Failed to serialize cache index")?;
    fs::write(&index_temp, index_bytes).context("Failed to write cache index temp file")?;
    fs::rename(&index_temp, &index_path).context("Failed to rename cache index temp file")?;

    let metadata_path = get_metadata_path(cache_dir);
    let metadata_temp = metadata_path.with_extension("json.tmp");
    let metadata =
        CacheMetadata { version: CACHE_VERSION, entry_count: entries.len(), written_at: Utc::now() };
    let metadata_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize cache metadata")?;
    fs::write(&metadata_temp, metadata_json).context("Failed to write cache metadata temp file")?;
    fs::rename(&metadata_temp, &metadata_path)
        .context("Failed to rename cache metadata temp file")?;

    Ok(())
}

/// Delete both cache files; files that are already gone are fine
pub fn remove_cache(cache_dir: &Path) -> Result<()> {
    for path in [get_index_path(cache_dir), get_metadata_path(cache_dir)] {
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to remove cache file: {}", path.display()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::index_storage::{CacheEntry, FileIdentity};
    use crate::models::PromptRecord;

    fn sample_entries() -> CacheMap {
        let identity = FileIdentity {
            path: PathBuf::from("/p/proj/s1.jsonl"),
            mtime_secs: 1_700_000_000,
            mtime_nanos: 123,
            size: 42,
        };
        let prompt = PromptRecord {
            id: "s1_u1".to_string(),
            text: "hello".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap(),
            project_path: PathBuf::from("/p/proj"),
        };
        let mut entries = CacheMap::new();
        entries.insert(identity.cache_key(), CacheEntry { identity, prompts: vec![prompt] });
        entries
    }

    #[test]
    fn test_load_missing_cache_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_cache(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let entries = sample_entries();

        save_cache(dir.path(), &entries).unwrap();
        let loaded = load_cache(dir.path()).unwrap().expect("cache should exist");

        assert_eq!(loaded, entries);
        assert!(!dir.path().join("prompt-cache-v1.bin.tmp").exists());
        assert!(!dir.path().join("prompt-cache-v1.meta.json.tmp").exists());
    }

    #[test]
    fn test_truncated_index_is_error() {
        let dir = TempDir::new().unwrap();
        save_cache(dir.path(), &sample_entries()).unwrap();

        let index_path = get_index_path(dir.path());
        let bytes = fs::read(&index_path).unwrap();
        fs::write(&index_path, &bytes[..bytes.len() / 2]).unwrap();

        assert!(load_cache(dir.path()).is_err());
    }

    #[test]
    fn test_oversized_length_prefix_is_error() {
        let dir = TempDir::new().unwrap();
        save_cache(dir.path(), &sample_entries()).unwrap();

        // version 1, one entry, then a key whose length claims 2^60 bytes
        let mut body = vec![1u8, 1, 0xFD];
        body.extend_from_slice(&(1u64 << 60).to_le_bytes());
        body.extend_from_slice(b"abc");
        fs::write(get_index_path(dir.path()), body).unwrap();

        let err = load_cache(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to deserialize cache index"));
    }

    #[test]
    fn test_count_mismatch_is_error() {
        let dir = TempDir::new().unwrap();
        save_cache(dir.path(), &sample_entries()).unwrap();
        // Simulate a crash between the two renames: body from a new run, metadata from an old one
        save_cache(dir.path(), &CacheMap::new()).unwrap();
        let stale_meta = fs::read_to_string(get_metadata_path(dir.path())).unwrap();
        save_cache(dir.path(), &sample_entries()).unwrap();
        fs::write(get_metadata_path(dir.path()), stale_meta).unwrap();

        let err = load_cache(dir.path()).unwrap_err();
        assert!(err.to_string().contains("metadata expects"));
    }

    #[test]
    fn test_remove_cache_tolerates_missing_files() {
        let dir = TempDir::new().unwrap();
        remove_cache(dir.path()).unwrap();

        save_cache(dir.path(), &sample_entries()).unwrap();
        remove_cache(dir.path()).unwrap();
        assert!(!get_index_path(dir.path()).exists());
        assert!(!get_metadata_path(dir.path()).exists());
    }
}
