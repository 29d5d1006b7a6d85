//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ai_prompt_history::HistoryConfig;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for creating test .claude directory structures
pub struct ClaudeDirBuilder {
    temp_dir: TempDir,
}

impl ClaudeDirBuilder {
    /// Create a new builder with an empty .claude directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a project directory holding the given session files
    pub fn with_project(self, name: &str, session_files: &[SessionFileBuilder]) -> Self {
        let project_dir = self.temp_dir.path().join("projects").join(name);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for session_file in session_files {
            session_file.create_in(&project_dir);
        }

        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ClaudeDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a session `.jsonl` file
pub struct SessionFileBuilder {
    filename: String,
    lines: Vec<String>,
}

impl SessionFileBuilder {
    pub fn new(filename: &str) -> Self {
        Self { filename: filename.to_string(), lines: Vec::new() }
    }

    pub fn with_entry(mut self, entry: SessionLineBuilder) -> Self {
        self.lines.push(entry.to_json());
        self
    }

    /// Add a line verbatim, for malformed input
    pub fn with_raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn create_in(&self, dir: &Path) -> PathBuf {
        let file_path = dir.join(&self.filename);
        fs::write(&file_path, self.lines.join("\n")).expect("Failed to write session file");
        file_path
    }
}

/// Builder for one line of a session file
pub struct SessionLineBuilder {
    entry_type: String,
    content: Value,
    timestamp: Option<String>,
    uuid: Option<String>,
}

impl SessionLineBuilder {
    /// A user turn with plain text content
    pub fn user() -> Self {
        Self {
            entry_type: "user".to_string(),
            content: json!("Test message"),
            timestamp: Some("2025-01-01T00:00:00Z".to_string()),
            uuid: Some("550e8400-e29b-41d4-a716-446655440001".to_string()),
        }
    }

    pub fn assistant() -> Self {
        Self {
            entry_type: "assistant".to_string(),
            content: json!([{"type": "text", "text": "Test response"}]),
            ..Self::user()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.content = json!(text);
        self
    }

    /// Set arbitrary `message.content`
    pub fn content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    pub fn to_json(&self) -> String {
        let mut line = json!({
            "type": self.entry_type,
            "message": { "role": self.entry_type, "content": self.content },
        });
        if let Some(timestamp) = &self.timestamp {
            line["timestamp"] = json!(timestamp);
        }
        if let Some(uuid) = &self.uuid {
            line["uuid"] = json!(uuid);
        }
        line.to_string()
    }
}

/// Two projects, three prompts: projA/s1 at T1 and T2, projB/s2 at T3, with T1 < T3 < T2
pub fn three_prompt_claude_dir() -> TempDir {
    ClaudeDirBuilder::new()
        .with_project(
            "projA",
            &[SessionFileBuilder::new("s1.jsonl")
                .with_entry(
                    SessionLineBuilder::user()
                        .text("hello")
                        .timestamp("2025-01-01T10:00:00Z")
                        .uuid("u1"),
                )
                .with_entry(SessionLineBuilder::assistant().timestamp("2025-01-01T10:00:05Z"))
                .with_entry(
                    SessionLineBuilder::user()
                        .text("fix bug")
                        .timestamp("2025-01-03T10:00:00Z")
                        .uuid("u2"),
                )],
        )
        .with_project(
            "projB",
            &[SessionFileBuilder::new("s2.jsonl").with_entry(
                SessionLineBuilder::user()
                    .content(json!([{"type": "text", "text": "add test"}]))
                    .timestamp("2025-01-02T10:00:00Z")
                    .uuid("u3"),
            )],
        )
        .build()
}

/// Config pointing at `claude_dir` with a private cache directory
pub fn config_for(claude_dir: &Path, cache_dir: &Path) -> HistoryConfig {
    HistoryConfig::new(claude_dir).with_cache_dir(cache_dir)
}

/// Bump a file's mtime well past its current value
pub fn touch_later(path: &Path) {
    let file = fs::OpenOptions::new().write(true).open(path).expect("Failed to open file");
    let later = std::time::SystemTime::now() + std::time::Duration::from_secs(60);
    file.set_modified(later).expect("Failed to set mtime");
}
