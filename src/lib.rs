//! AI Prompt History - Search the prompts you typed into Claude Code
//!
//! This library reads Claude Code's per-project session logs stored under
//! `~/.claude/projects/` and serves the user prompts in them. It supports:
//!
//! - Parsing user turns out of session `.jsonl` files
//! - A persistent per-file cache so unchanged files are never re-parsed
//! - Parsing changed files in parallel on a bounded worker pool
//! - An in-memory, newest-first snapshot with project filters and text search
//!
//! # Example
//!
//! ```no_run
//! use ai_prompt_history::{HistoryConfig, HistoryIndex};
//!
//! let mut index = HistoryIndex::new(HistoryConfig::from_env()?)?;
//! let prompts = index.load_all(false);
//! println!("Loaded {} prompts", prompts.len());
//! for prompt in index.search("fix", &[], &["scratch"]) {
//!     println!("{} {}", prompt.timestamp, prompt.text);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod index_storage;
pub mod indexer;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use config::HistoryConfig;
pub use index_storage::{CacheStats, CacheStore};
pub use indexer::{HistoryIndex, IndexPhase, IndexStats, LoadReport, ingest_files};
pub use models::{PromptRecord, SessionFile};
pub use parsers::parse_session_file;
pub use utils::format_path_with_tilde;
