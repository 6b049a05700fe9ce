//! Workspace Store Contract
//!
//! The remote hierarchical store holding uploaded source artifacts. This
//! module specifies only the contract; concrete providers implement it over
//! their own transport.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Source language of a workspace artifact.
///
/// This is the wire-level tag the store attaches to an imported artifact so
/// it can render and execute the content correctly. Detection from file
/// extensions is the sync core's concern, not this crate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    Python,
    Scala,
    Sql,
    R,
}

impl Language {
    /// Wire representation used by the store's import API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "PYTHON",
            Language::Scala => "SCALA",
            Language::Sql => "SQL",
            Language::R => "R",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remote workspace store.
///
/// Paths are store-relative, `/`-separated, with no leading slash; the empty
/// string names the root of the remote namespace.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Create a remote directory, including missing parents.
    ///
    /// Idempotent: calling this twice for the same path must not error and
    /// must not duplicate state, including when two callers race on the same
    /// directory.
    async fn create_directory(&self, path: &str) -> Result<()>;

    /// Write one artifact body to `path`.
    ///
    /// With `overwrite` set, an existing artifact at `path` is replaced
    /// unconditionally; there is no conflict detection.
    ///
    /// # Errors
    ///
    /// `RemoteError::Rejected` when the store refuses the write (invalid
    /// payload or path), `RemoteError::Unavailable` on transport failure.
    async fn write_artifact(
        &self,
        path: &str,
        content: Bytes,
        language: Language,
        overwrite: bool,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_wire_names() {
        assert_eq!(Language::Python.as_str(), "PYTHON");
        assert_eq!(Language::Scala.as_str(), "SCALA");
        assert_eq!(Language::Sql.as_str(), "SQL");
        assert_eq!(Language::R.as_str(), "R");
    }

    #[test]
    fn test_language_serializes_uppercase() {
        let json = serde_json::to_string(&Language::Python).unwrap();
        assert_eq!(json, "\"PYTHON\"");
    }
}
