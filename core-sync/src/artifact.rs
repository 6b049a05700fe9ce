//! Data carriers for the sync pipeline.

use remote_traits::Language;
use std::path::PathBuf;

/// One local source artifact discovered under the sync root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactEntry {
    /// Full local path to the file.
    pub path: PathBuf,

    /// The file's containing directory.
    pub directory: PathBuf,

    /// Language detected from the file extension.
    pub language: Language,
}

/// Store-relative destination of an artifact.
///
/// `directory` uses `/` separators regardless of the local platform and is
/// empty for files that sit directly in the sync root. `name` is the file
/// name with its extension stripped; the store re-adds language-specific
/// suffixes on its own side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath {
    pub directory: String,
    pub name: String,
}

impl RemotePath {
    /// The full store-relative path for the artifact.
    pub fn full_path(&self) -> String {
        if self.directory.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.directory, self.name)
        }
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path_joins_with_slash() {
        let remote = RemotePath {
            directory: "a/b".to_string(),
            name: "x".to_string(),
        };
        assert_eq!(remote.full_path(), "a/b/x");
    }

    #[test]
    fn test_full_path_at_namespace_root() {
        let remote = RemotePath {
            directory: String::new(),
            name: "c".to_string(),
        };
        assert_eq!(remote.full_path(), "c");
    }
}
