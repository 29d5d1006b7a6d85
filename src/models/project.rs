use std::path::{Path, PathBuf};

use crate::index_storage::FileIdentity;

/// A session file found during discovery, with the identity captured at that moment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    pub identity: FileIdentity,
    pub project_dir: PathBuf,
}

impl SessionFile {
    pub fn path(&self) -> &Path {
        &self.identity.path
    }
}
