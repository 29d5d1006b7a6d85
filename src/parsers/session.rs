use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::models::{PromptRecord, SessionLine};

const ENTRY_TYPE_USER: &str = "user";

/// Parse a session JSONL file into the user prompts it contains
///
/// Every line is decoded on its own. Lines that are not valid JSON, are not user
/// turns, or lack a timestamp or text are skipped. Only failing to open or read the
/// file is an error, and the caller treats that file as contributing nothing.
pub fn parse_session_file(path: &Path, project_dir: &Path) -> Result<Vec<PromptRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;

    let file_stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();

    let reader = BufReader::new(file);
    let mut prompts = Vec::new();
    let mut skipped_count = 0;

    for line in reader.lines() {
        let line = line
            .with_context(|| format!("Failed to read line from session file: {}", path.display()))?;

        if line.trim().is_empty() {
            continue;
        }

        // Pre-filter on the type tag so assistant turns and snapshots are never fully decoded
        let value = match serde_json::from_str::<Value>(&line) {
            Ok(value) => value,
            Err(_) => {
                skipped_count += 1;
                continue;
            }
        };
        if value.get("type").and_then(Value::as_str) != Some(ENTRY_TYPE_USER) {
            continue;
        }

        let entry = match serde_json::from_value::<SessionLine>(value) {
            Ok(entry) => entry,
            Err(_) => {
                skipped_count += 1;
                continue;
            }
        };

        match prompt_from_line(entry, &file_stem, project_dir) {
            Some(prompt) => prompts.push(prompt),
            None => skipped_count += 1,
        }
    }

    if skipped_count > 0 {
        debug!(
            path = %path.display(),
            prompts = prompts.len(),
            skipped = skipped_count,
            "skipped unusable lines in session file"
        );
    }

    Ok(prompts)
}

fn prompt_from_line(entry: SessionLine, file_stem: &str, project_dir: &Path) -> Option<PromptRecord> {
    let timestamp = entry.timestamp?;
    let text = entry.message?.content?.normalize()?;
    if text.is_empty() {
        return None;
    }

    Some(PromptRecord {
        id: format!("{}_{}", file_stem, entry.uuid.unwrap_or_default()),
        text,
        timestamp,
        project_path: project_dir.to_path_buf(),
    })
}
