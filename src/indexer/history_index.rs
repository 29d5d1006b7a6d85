use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::HistoryConfig;
use crate::index_storage::{CacheMap, CacheStats, CacheStore, default_cache_dir};
use crate::indexer::ingest::ingest_files;
use crate::indexer::project_discovery::{discover_session_files, list_project_names};
use crate::models::PromptRecord;

/// Whether an index currently holds a snapshot.
///
/// Loading happens entirely inside [`HistoryIndex::load_all`], which borrows the
/// index mutably, so no caller can observe an index mid-load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPhase {
    Empty,
    Loaded,
}

/// What the most recent load from disk did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub files_discovered: usize,
    pub cache_hits: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub cache_persisted: bool,
    /// Set when parsing succeeded but the cache could not be written
    pub cache_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub cache_enabled: bool,
    pub cache: Option<CacheStats>,
    pub in_memory_count: Option<usize>,
}

/// Time-ordered view over every prompt under a Claude projects directory
///
/// Built once per process by the driver and passed to whoever needs it. The first
/// access loads from disk (through the persistent cache when enabled) and keeps the
/// result in memory; later calls reuse it until a forced reload or [`clear_cache`].
///
/// [`clear_cache`]: HistoryIndex::clear_cache
#[derive(Debug)]
pub struct HistoryIndex {
    config: HistoryConfig,
    store: Option<CacheStore>,
    snapshot: Option<Arc<[PromptRecord]>>,
    last_report: Option<LoadReport>,
}

impl HistoryIndex {
    /// # Errors
    ///
    /// Returns an error if `config.workers` is zero.
    pub fn new(config: HistoryConfig) -> Result<Self> {
        if config.workers == 0 {
            bail!("Worker count must be at least 1");
        }

        let store = if config.use_cache {
            let dir = match &config.cache_dir {
                Some(dir) => Some(dir.clone()),
                None => match default_cache_dir() {
                    Ok(dir) => Some(dir),
                    Err(e) => {
                        warn!(error = %e, "no cache directory available, running without cache");
                        None
                    }
                },
            };
            dir.map(CacheStore::new)
        } else {
            None
        };

        Ok(Self { config, store, snapshot: None, last_report: None })
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    pub fn phase(&self) -> IndexPhase {
        if self.snapshot.is_some() { IndexPhase::Loaded } else { IndexPhase::Empty }
    }

    /// Report for the most recent load that went to disk
    pub fn last_report(&self) -> Option<&LoadReport> {
        self.last_report.as_ref()
    }

    /// All prompts, newest first
    ///
    /// Returns the in-memory snapshot when there is one, unless `force_reload`.
    /// Otherwise discovers session files, reuses valid cache entries, parses the rest
    /// in parallel, persists the refreshed cache if anything was parsed, and sorts.
    /// Never fails: unreadable files, a corrupt cache or a failed cache write all
    /// degrade to fewer records or a cold cache.
    pub fn load_all(&mut self, force_reload: bool) -> Arc<[PromptRecord]> {
        if !force_reload && let Some(snapshot) = &self.snapshot {
            return Arc::clone(snapshot);
        }

        let (records, report) = self.load_from_disk();
        let snapshot: Arc<[PromptRecord]> = records.into();
        self.snapshot = Some(Arc::clone(&snapshot));
        self.last_report = Some(report);
        snapshot
    }

    fn load_from_disk(&self) -> (Vec<PromptRecord>, LoadReport) {
        let files = discover_session_files(&self.config.projects_dir());
        let mut report = LoadReport { files_discovered: files.len(), ..Default::default() };

        let (mut entries, stale) = match &self.store {
            Some(store) => {
                let partition = store.partition(&files);
                (partition.valid, partition.stale)
            }
            None => (CacheMap::new(), files.clone()),
        };
        report.cache_hits = entries.len();

        if !stale.is_empty() {
            let output = ingest_files(&stale, self.config.workers).unwrap_or_else(|e| {
                warn!(error = %e, "ingestion rejected its input");
                Default::default()
            });
            report.files_parsed = output.entries.len();
            report.files_failed = output.failed.len();

            match &self.store {
                Some(store) => match store.merge(&mut entries, output.entries) {
                    Ok(()) => report.cache_persisted = true,
                    Err(e) => {
                        let message = format!("Failed to save prompt cache: {:#}", e);
                        warn!(dir = %store.dir().display(), "{}", message);
                        report.cache_warning = Some(message);
                    }
                },
                None => entries.extend(output.entries),
            }
        }

        // Assemble in discovery order so ties keep a stable, repeatable order
        let mut records = Vec::new();
        for file in &files {
            if let Some(entry) = entries.remove(&file.identity.cache_key()) {
                records.extend(entry.prompts);
            }
        }
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        info!(
            records = records.len(),
            files = report.files_discovered,
            cache_hits = report.cache_hits,
            parsed = report.files_parsed,
            failed = report.files_failed,
            "loaded prompt history"
        );

        (records, report)
    }

    /// Prompts whose project path contains any of `names` (or none of them, with `exclude`)
    ///
    /// Matching is plain substring containment on the full project path, so `"test"`
    /// also matches `latest-app`.
    pub fn filter_by_projects(&mut self, names: &[&str], exclude: bool) -> Vec<PromptRecord> {
        let snapshot = self.load_all(false);
        snapshot
            .iter()
            .filter(|record| matches_any_project(record, names) != exclude)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over prompt text, after project filtering
    ///
    /// Empty `projects` means no include filter and empty `exclude_projects` means no
    /// exclude filter. An empty `query` returns the filtered set unchanged.
    pub fn search(
        &mut self,
        query: &str,
        projects: &[&str],
        exclude_projects: &[&str],
    ) -> Vec<PromptRecord> {
        let snapshot = self.load_all(false);
        let query = query.to_lowercase();

        snapshot
            .iter()
            .filter(|record| projects.is_empty() || matches_any_project(record, projects))
            .filter(|record| {
                exclude_projects.is_empty() || !matches_any_project(record, exclude_projects)
            })
            .filter(|record| query.is_empty() || record.text.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Names of all project directories, sorted
    pub fn list_project_names(&self) -> Vec<String> {
        list_project_names(&self.config.projects_dir())
    }

    /// Delete the persistent cache and drop the in-memory snapshot
    pub fn clear_cache(&mut self) {
        if let Some(store) = &self.store
            && let Err(e) = store.invalidate_all()
        {
            warn!(
                dir = %store.dir().display(),
                error = %format!("{:#}", e),
                "failed to clear prompt cache"
            );
        }
        self.snapshot = None;
        self.last_report = None;
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            cache_enabled: self.store.is_some(),
            cache: self.store.as_ref().map(CacheStore::stats),
            in_memory_count: self.snapshot.as_ref().map(|snapshot| snapshot.len()),
        }
    }

    /// Directory of the persistent cache, if caching is enabled
    pub fn cache_dir(&self) -> Option<&Path> {
        self.store.as_ref().map(CacheStore::dir)
    }
}

fn matches_any_project(record: &PromptRecord, names: &[&str]) -> bool {
    let path = record.project_path.to_string_lossy();
    names.iter().any(|name| path.contains(name))
}
