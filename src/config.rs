//! Runtime configuration for the history index
//!
//! The index never reads configuration files itself. Front ends build a
//! [`HistoryConfig`] however they like (the bundled CLI uses flags on top of
//! [`HistoryConfig::from_env`]) and hand it to `HistoryIndex::new`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::indexer::ingest::DEFAULT_WORKERS;
use crate::utils::get_claude_dir;

pub const DEFAULT_MAX_RESULTS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// The `~/.claude` directory; sessions live under its `projects/`
    pub claude_dir: PathBuf,
    /// Where the persistent cache lives; `None` means the platform cache directory
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// How many results a front end should show
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Width of the parse pool
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_use_cache() -> bool {
    true
}

impl HistoryConfig {
    pub fn new(claude_dir: impl Into<PathBuf>) -> Self {
        Self {
            claude_dir: claude_dir.into(),
            cache_dir: None,
            max_results: DEFAULT_MAX_RESULTS,
            workers: DEFAULT_WORKERS,
            use_cache: true,
        }
    }

    /// Defaults rooted at `$HOME/.claude`
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(get_claude_dir()?))
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.claude_dir.join("projects")
    }
}
