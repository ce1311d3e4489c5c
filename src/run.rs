mod cli;
mod tui;

use std::path::PathBuf;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

/// Expand a leading `~/` to the home directory.
pub(crate) fn expand_path(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(rest)
        }
        None => PathBuf::from(path),
    }
}
