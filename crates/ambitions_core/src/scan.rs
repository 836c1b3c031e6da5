use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core_api::CoreError;

pub const SAVE_SUFFIX: &str = ".hsg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveEntry {
    pub path: PathBuf,
    /// Path relative to the scanned directory, `/`-separated.
    pub display_name: String,
}

/// Recursively collect `.hsg` files under `dir`, sorted by display name.
///
/// A missing `dir` yields an empty list. Subdirectories that cannot be read
/// are skipped with a warning.
pub fn scan_saves(dir: &Path) -> Result<Vec<SaveEntry>, CoreError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    let mut is_root = true;

    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) if is_root => return Err(CoreError::io("read directory", &current, e)),
            Err(e) => {
                warn!("skipping {}: {e}", current.display());
                continue;
            }
        };
        is_root = false;

        for entry in entries.filter_map(Result::ok) {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            // Symlinked directories are not followed.
            if file_type.is_dir() {
                pending.push(path);
            } else if (file_type.is_file() || path.is_file()) && is_save_file(&path) {
                let display_name = display_name(dir, &path);
                out.push(SaveEntry { path, display_name });
            }
        }
    }

    out.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });
    Ok(out)
}

/// Any file name ending in `.hsg`, case-insensitively, including a bare `.hsg`.
fn is_save_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|name| name.ends_with(SAVE_SUFFIX))
}

fn display_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
