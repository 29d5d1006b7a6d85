use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single user-authored turn extracted from a session file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// `{file_stem}_{uuid}`; unique within the source file when every turn has a uuid
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Project directory that owns the session file
    pub project_path: PathBuf,
}

impl PromptRecord {
    /// Last component of the project directory
    pub fn project_name(&self) -> String {
        project_name_of(&self.project_path)
    }
}

pub(crate) fn project_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
