//! Local tree enumeration.
//!
//! Walks an arbitrary-depth directory tree and yields one [`ArtifactEntry`]
//! per file whose extension the sync recognizes. Everything else is not an
//! artifact and is simply not enumerated.

use crate::artifact::ArtifactEntry;
use crate::translate::language_for_extension;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Enumerate all recognized artifacts under `root`, recursing through every
/// subdirectory.
///
/// Hidden (dot-prefixed) files and directories are skipped, as are
/// directories that cannot be read. A nonexistent root yields an empty
/// sequence; deciding whether that deserves a warning is the caller's call.
pub fn enumerate(root: &Path) -> Vec<ArtifactEntry> {
    let mut entries = Vec::new();
    if root.exists() {
        visit(root, &mut entries);
    }
    entries
}

fn visit(dir: &Path, out: &mut Vec<ArtifactEntry>) {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            debug!(directory = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };

    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(directory = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }

        if path.is_dir() {
            visit(&path, out);
            continue;
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Ok(language) = language_for_extension(&extension) {
            out.push(ArtifactEntry {
                directory: dir.to_path_buf(),
                path,
                language,
            });
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
