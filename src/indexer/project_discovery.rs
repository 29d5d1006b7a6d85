use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

use crate::index_storage::FileIdentity;
use crate::models::SessionFile;

const SESSION_EXTENSION: &str = "jsonl";

/// Immediate subdirectories of `projects_dir`, sorted by name
fn project_dirs(projects_dir: &Path) -> Vec<walkdir::DirEntry> {
    if !projects_dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(projects_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry in projects directory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .collect()
}

/// Discover every session file under `projects_dir`
///
/// A project is any immediate subdirectory; a session file is any regular `*.jsonl`
/// file directly inside a project. Symlinks count as what they point to, and the
/// identity is that of the target. Nothing deeper is visited. Results are in
/// project-name then file-name order, and each carries its identity as of now.
///
/// Returns an empty Vec if the projects directory doesn't exist (not an error).
/// Entries that cannot be read or stat'ed are logged and skipped.
pub fn discover_session_files(projects_dir: &Path) -> Vec<SessionFile> {
    let mut files = Vec::new();

    for project in project_dirs(projects_dir) {
        let project_dir = project.path();

        let entries = WalkDir::new(project_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        project = %project_dir.display(),
                        error = %e,
                        "skipping unreadable project entry"
                    );
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(SESSION_EXTENSION)
            {
                continue;
            }

            let identity = match entry
                .metadata()
                .map_err(anyhow::Error::from)
                .and_then(|metadata| FileIdentity::from_metadata(path, &metadata))
            {
                Ok(identity) => identity,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %format!("{:#}", e),
                        "skipping session file without metadata"
                    );
                    continue;
                }
            };

            files.push(SessionFile { identity, project_dir: project_dir.to_path_buf() });
        }
    }

    files
}

/// Names of the immediate subdirectories of `projects_dir`, sorted
pub fn list_project_names(projects_dir: &Path) -> Vec<String> {
    project_dirs(projects_dir)
        .into_iter()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}
