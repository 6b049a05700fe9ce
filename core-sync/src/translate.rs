//! Local-to-remote path translation.
//!
//! Pure functions mapping a local file path (relative to a sync root) to its
//! store-relative destination plus the content language detected from the
//! file extension. No state, no I/O.

use crate::artifact::RemotePath;
use crate::error::{Result, SyncError};
use remote_traits::Language;
use std::path::Path;

/// File extensions the sync recognizes as source artifacts.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &["py", "scala", "sql", "r"];

/// Map a file extension to its content language.
///
/// Lookup is case-insensitive. `py` is the one extension whose spelling
/// differs from its language tag; the rest match their tag name directly.
/// An extension outside the recognized set is a hard error, never a default.
pub fn language_for_extension(extension: &str) -> Result<Language> {
    match extension.to_ascii_uppercase().as_str() {
        "PY" => Ok(Language::Python),
        "SCALA" => Ok(Language::Scala),
        "SQL" => Ok(Language::Sql),
        "R" => Ok(Language::R),
        _ => Err(SyncError::UnknownExtension {
            extension: extension.to_string(),
        }),
    }
}

/// Translate a local file path into its remote destination and language.
///
/// The remote directory is the portion of `file`'s parent that lies strictly
/// below `root`, with local separators rewritten to `/`; a file directly in
/// `root` maps to the root of the remote namespace (empty directory).
pub fn translate(root: &Path, file: &Path) -> Result<(RemotePath, Language)> {
    let extension = file
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let language = language_for_extension(&extension)?;

    let name = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parent = file.parent().unwrap_or(root);
    let relative = parent
        .strip_prefix(root)
        .map_err(|_| SyncError::OutsideRoot {
            path: file.display().to_string(),
            root: root.display().to_string(),
        })?;

    // Rebuild from components so the result uses `/` whatever the local
    // platform's separator is.
    let directory = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    Ok((RemotePath { directory, name }, language))
}
