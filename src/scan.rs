// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Errors that prevent a sample library from being scanned.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Library root not found: {0}")]
    NotFound(PathBuf),

    #[error("Library root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Hidden entries (dot files, macOS resource forks) are never samples.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extensions
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(extension))
        })
}

/// Recursively finds the audio files under root with one of the given extensions. The paths
/// are relative to root and sorted, so every run classifies files in the same order.
/// Unreadable entries are logged and skipped.
pub fn scan_library(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(err = %e, "Skipping unreadable library entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        match entry.path().strip_prefix(root) {
            Ok(relative) => paths.push(relative.to_path_buf()),
            Err(e) => warn!(path = ?entry.path(), err = %e, "Entry is outside the library root"),
        }
    }

    paths.sort();
    debug!(root = ?root, files = paths.len(), "Scanned sample library");
    Ok(paths)
}
