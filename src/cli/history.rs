//! # History File Management
//!
//! Resolves where the shell keeps its line history. By default this is
//! `~/.btcli_history`.
//!
//! ## Configuration
//!
//! In order of precedence:
//!
//! 1. `--history <path>` or the `history` key of the rc file
//! 2. the `BTCLI_HISTORY` environment variable
//! 3. `$HOME/.btcli_history`
//!
//! An empty path at any level disables history persistence.
//!
//! ## Implementation
//!
//! The path is resolved once at startup and handed to rustyline, which does
//! the file I/O. Only lines that name a known command are recorded.

use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_HISTORY_FILE: &str = ".btcli_history";
pub const HISTORY_ENV_VAR: &str = "BTCLI_HISTORY";

pub fn history_path(configured: Option<&Path>) -> Option<PathBuf> {
    resolve(configured, env::var(HISTORY_ENV_VAR).ok(), home_dir())
}

/// Precedence rules without touching the process environment.
fn resolve(
    configured: Option<&Path>,
    from_env: Option<String>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = configured {
        return non_empty(path.to_path_buf());
    }

    if let Some(custom_path) = from_env {
        return non_empty(PathBuf::from(custom_path));
    }

    home.map(|home| home.join(DEFAULT_HISTORY_FILE))
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}
