//! Input discovery.
//!
//! Resolves the `--input` argument into the list of files to process.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect the files to process.
///
/// A file path is returned as is. A directory is walked recursively in file
/// name order; files whose name starts with `.` are skipped, but hidden
/// directories are still descended into. Symlinks are not followed.
pub fn collect_input_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() || path.is_dir() {
            continue;
        }

        if is_hidden(entry.file_name()) {
            debug!("Skipping hidden file: {:?}", path);
            continue;
        }

        files.push(path.to_path_buf());
    }

    files
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
