use std::path::PathBuf;

use anyhow::{Result, bail};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::index_storage::{CacheEntry, CacheMap};
use crate::models::{PromptRecord, SessionFile};
use crate::parsers::parse_session_file;

/// Default width of the parse pool. The work is bound by file I/O, so a small
/// constant is enough even for thousands of files.
pub const DEFAULT_WORKERS: usize = 4;

/// Freshly parsed session files
#[derive(Debug, Default)]
pub struct IngestOutput {
    /// One entry per successfully parsed file, keyed like the persistent cache
    pub entries: CacheMap,
    /// Files that could not be opened or read
    pub failed: Vec<PathBuf>,
}

impl IngestOutput {
    /// All parsed records, in no particular order
    pub fn records(&self) -> impl Iterator<Item = &PromptRecord> {
        self.entries.values().flat_map(|entry| entry.prompts.iter())
    }
}

type FileResult = (SessionFile, Result<Vec<PromptRecord>>);

fn parse_one(file: &SessionFile) -> FileResult {
    (file.clone(), parse_session_file(file.path(), &file.project_dir))
}

/// Parse `files` on a pool of exactly `workers` threads
///
/// The pool lives only for this call; the caller blocks until every file is done.
/// A file that fails to open or read is logged, listed in [`IngestOutput::failed`],
/// and contributes nothing; it never affects the other files.
///
/// # Errors
///
/// Returns an error only if `workers` is zero.
pub fn ingest_files(files: &[SessionFile], workers: usize) -> Result<IngestOutput> {
    if workers == 0 {
        bail!("Worker count must be at least 1");
    }
    if files.is_empty() {
        return Ok(IngestOutput::default());
    }

    let results: Vec<FileResult> = match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("prompt-ingest-{}", i))
        .build()
    {
        Ok(pool) => pool.install(|| files.par_iter().map(parse_one).collect()),
        Err(e) => {
            warn!(error = %e, "could not start parse pool, parsing on the current thread");
            files.iter().map(parse_one).collect()
        }
    };

    let mut output = IngestOutput::default();
    for (file, result) in results {
        match result {
            Ok(prompts) => {
                let key = file.identity.cache_key();
                output.entries.insert(key, CacheEntry { identity: file.identity, prompts });
            }
            Err(e) => {
                warn!(
                    path = %file.path().display(),
                    error = %format!("{:#}", e),
                    "failed to read session file"
                );
                output.failed.push(file.identity.path);
            }
        }
    }

    debug!(
        parsed = output.entries.len(),
        failed = output.failed.len(),
        workers,
        "ingested session files"
    );
    Ok(output)
}
