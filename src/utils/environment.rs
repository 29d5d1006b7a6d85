use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable Claude Code itself honours for relocating `~/.claude`
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Get the Claude directory path: `$CLAUDE_CONFIG_DIR` if set, else `~/.claude`
pub fn get_claude_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CLAUDE_CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".claude"))
}
