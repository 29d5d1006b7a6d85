//! Cache metadata structures for staleness detection

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::PromptRecord;

/// Cache schema version for invalidation on format changes
pub const CACHE_VERSION: u32 = 1;

/// Hex key derived from a session file's absolute path
pub type CacheKey = String;

/// Persisted entries indexed by [`CacheKey`]
pub type CacheMap = HashMap<CacheKey, CacheEntry>;

/// Path, modification time and size of a session file.
///
/// Two identities are equal only if all of them match exactly. This is a weak
/// freshness check: a rewrite that keeps both the mtime and the size is invisible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub mtime_secs: i64,
    pub mtime_nanos: u32,
    pub size: u64,
}

impl FileIdentity {
    /// Create identity from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
        Self::from_metadata(path, &metadata)
    }

    pub fn from_metadata(path: &Path, metadata: &fs::Metadata) -> Result<Self> {
        let mtime = metadata
            .modified()
            .with_context(|| format!("Failed to read modification time: {}", path.display()))?;
        let (mtime_secs, mtime_nanos) = split_system_time(mtime);

        Ok(Self { path: path.to_path_buf(), mtime_secs, mtime_nanos, size: metadata.len() })
    }

    /// Cache key for this file (content-independent)
    pub fn cache_key(&self) -> CacheKey {
        cache_key_for(&self.path)
    }

    /// Check if the file is gone or has changed (mtime or size differs)
    pub fn is_stale(&self) -> bool {
        match Self::from_path(&self.path) {
            Ok(current) => current != *self,
            Err(_) => true,
        }
    }
}

/// First 16 bytes of the SHA-256 of the path, hex encoded.
///
/// Unlike `DefaultHasher` this is stable across toolchains, which matters for a key
/// that outlives the process.
pub fn cache_key_for(path: &Path) -> CacheKey {
    let mut hex = format!("{:x}", Sha256::digest(path.to_string_lossy().as_bytes()));
    hex.truncate(32);
    hex
}

fn split_system_time(time: SystemTime) -> (i64, u32) {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => (d.as_secs() as i64, d.subsec_nanos()),
        Err(e) => {
            // Before the epoch: represent as negative seconds with a non-negative nanos part
            let d = e.duration();
            if d.subsec_nanos() == 0 {
                (-(d.as_secs() as i64), 0)
            } else {
                (-(d.as_secs() as i64) - 1, 1_000_000_000 - d.subsec_nanos())
            }
        }
    }
}

/// Parsed prompts of one session file, plus the identity they were parsed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub identity: FileIdentity,
    pub prompts: Vec<PromptRecord>,
}

impl CacheEntry {
    /// Check if the file still exists unchanged
    pub fn is_valid(&self) -> bool {
        !self.identity.is_stale()
    }
}

/// Binary cache body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    pub version: u32,
    pub entries: CacheMap,
}

/// JSON sidecar written after the binary body; a count mismatch marks a torn write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub version: u32,
    pub entry_count: usize,
    pub written_at: DateTime<Utc>,
}
