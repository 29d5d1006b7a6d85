//! Loading and querying Claude Code prompt history
//!
//! # Error Handling Strategy
//!
//! Loading degrades instead of failing:
//!
//! - **Line-level failures**: skipped by the session parser.
//!
//! - **File-level failures**: a session file that cannot be opened or read is logged
//!   at the ingestion task boundary and contributes no prompts. Its siblings are
//!   unaffected, and it is retried on the next load because it never gets a cache entry.
//!
//! - **Cache failures**: an unreadable cache is treated as empty (every file is parsed);
//!   a failed cache write is logged and reported in [`LoadReport::cache_warning`] while
//!   the freshly parsed prompts are still returned.
//!
//! - **Missing projects directory**: an empty history, not an error.
//!
//! Only invalid configuration (zero workers) is returned as an error.

pub mod history_index;
pub mod ingest;
pub mod project_discovery;

pub use history_index::{HistoryIndex, IndexPhase, IndexStats, LoadReport};
pub use ingest::{DEFAULT_WORKERS, IngestOutput, ingest_files};
pub use project_discovery::{discover_session_files, list_project_names};
