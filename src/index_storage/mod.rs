//! Persistent per-file prompt cache
//!
//! Caches parsed prompts to disk keyed by session file path, so unchanged files are
//! never re-parsed. Uses a two-file approach, both named with [`CACHE_VERSION`]:
//! - `prompt-cache-v1.bin`: Bincode-serialized `{ CacheKey -> CacheEntry }`
//! - `prompt-cache-v1.meta.json`: JSON metadata (version, entry count, write time)
//!
//! Freshness is judged by mtime + size only, never by content. A rewrite that keeps
//! both is served from the cache. This keeps the unchanged-file path free of reads.
//!
//! Cache location: see [`default_cache_dir`].

pub mod metadata;
pub mod persistence;
pub mod store;

pub use metadata::{
    CACHE_VERSION, CacheEntry, CacheFile, CacheKey, CacheMap, CacheMetadata, FileIdentity,
    cache_key_for,
};
pub use persistence::{
    MAX_CACHE_BYTES, default_cache_dir, get_index_path, get_metadata_path, load_cache, save_cache,
};
pub use store::{CacheStats, CacheStore, Partition};
