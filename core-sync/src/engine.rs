//! Parallel upload engine.
//!
//! Orchestrates one sync run: enumerate the local tree, translate every
//! artifact to its remote destination, create each distinct remote directory
//! exactly once, then fan the uploads out across a bounded worker pool and
//! aggregate every outcome into a [`SyncReport`].
//!
//! ## Ordering
//!
//! Directory creation always completes before any upload into that directory
//! is dispatched, and never happens inside the parallel phase. Between
//! uploads there is no ordering: dispatch follows enumeration order,
//! completion order is unspecified.
//!
//! ## Failure isolation
//!
//! A failing upload never cancels or blocks sibling uploads. All failures are
//! collected; the run is reported failed when any artifact failed, but the
//! pool is always drained completely before the report is returned.
//!
//! Two distinct local files can legitimately map to the same remote path
//! (e.g. `x.py` and `x.sql` in one directory). Uploads are unconditional
//! overwrites, so the winner is undefined.

use crate::artifact::{ArtifactEntry, RemotePath};
use crate::error::{Result, SyncError};
use crate::{translate, walker};
use bytes::Bytes;
use remote_traits::{Language, WorkspaceStore};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// How many failure details a summary log prints before truncating.
const MAX_REPORTED_FAILURES: usize = 10;

/// Sync engine configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum concurrent upload workers.
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { concurrency: 20 }
    }
}

/// One artifact ready for upload. Created and consumed within a single
/// worker; tasks share no state with each other.
struct UploadTask {
    local_path: PathBuf,
    remote_path: RemotePath,
    language: Language,
    content: Bytes,
}

/// A single artifact's failure, with the original error preserved.
#[derive(Debug)]
pub struct TaskFailure {
    pub path: PathBuf,
    pub error: SyncError,
}

/// Aggregate outcome of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub uploaded: usize,
    pub failures: Vec<TaskFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Log the run summary: counts, plus the first few failure details.
    pub fn log_summary(&self) {
        if self.is_success() {
            info!("sync complete: {} artifacts uploaded", self.uploaded);
            return;
        }

        warn!(
            "sync finished with failures: {} uploaded, {} failed",
            self.uploaded,
            self.failures.len()
        );
        for failure in self.failures.iter().take(MAX_REPORTED_FAILURES) {
            warn!(path = %failure.path.display(), error = %failure.error, "artifact failed");
        }
        if self.failures.len() > MAX_REPORTED_FAILURES {
            warn!(
                "... and {} more failures",
                self.failures.len() - MAX_REPORTED_FAILURES
            );
        }
    }
}

/// The parallel upload engine.
pub struct SyncEngine {
    store: Arc<dyn WorkspaceStore>,
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn WorkspaceStore>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    /// Synchronize every recognized artifact under `root` into the store.
    ///
    /// A nonexistent root is not a failure: the run logs a warning and
    /// reports zero uploads, in case the caller simply has no artifacts yet.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub async fn sync(&self, root: &Path) -> SyncReport {
        if !root.exists() {
            warn!("no artifacts found at {}", root.display());
            return SyncReport::default();
        }

        let entries = walker::enumerate(root);
        info!(
            "copying {} artifacts from {} on {} workers",
            entries.len(),
            root.display(),
            self.config.concurrency
        );
        self.sync_entries(root, entries).await
    }

    async fn sync_entries(&self, root: &Path, entries: Vec<ArtifactEntry>) -> SyncReport {
        let mut failures = Vec::new();

        // Translate up front; a translation failure aborts only that entry,
        // before anything is dispatched.
        let mut planned = Vec::with_capacity(entries.len());
        for entry in entries {
            match translate::translate(root, &entry.path) {
                Ok((remote_path, language)) => planned.push((entry, remote_path, language)),
                Err(error) => failures.push(TaskFailure {
                    path: entry.path,
                    error,
                }),
            }
        }

        // Create every distinct remote directory before fan-out begins. The
        // store's create is idempotent; deduplication just keeps the call
        // count at one per directory.
        let directories: BTreeSet<&str> = planned
            .iter()
            .map(|(_, remote_path, _)| remote_path.directory.as_str())
            .collect();
        let mut directory_errors = HashMap::new();
        for directory in directories {
            debug!(directory = %directory, "creating remote directory if absent");
            if let Err(error) = self.store.create_directory(directory).await {
                warn!(directory = %directory, error = %error, "remote directory creation failed");
                directory_errors.insert(directory.to_string(), error);
            }
        }

        // Build tasks, reading each file fully into memory in one read.
        // Entries whose directory could not be created fail here instead of
        // being dispatched into a directory that does not exist.
        let mut tasks = Vec::with_capacity(planned.len());
        for (entry, remote_path, language) in planned {
            if let Some(error) = directory_errors.get(&remote_path.directory) {
                failures.push(TaskFailure {
                    path: entry.path,
                    error: SyncError::Remote(error.clone()),
                });
                continue;
            }
            match tokio::fs::read(&entry.path).await {
                Ok(bytes) => tasks.push(UploadTask {
                    local_path: entry.path,
                    remote_path,
                    language,
                    content: Bytes::from(bytes),
                }),
                Err(error) => failures.push(TaskFailure {
                    path: entry.path,
                    error: error.into(),
                }),
            }
        }

        // Fan out across the bounded pool. The semaphore is acquired before
        // spawning, so dispatch follows enumeration order and at most
        // `concurrency` uploads are in flight.
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut workers: JoinSet<(PathBuf, Result<()>)> = JoinSet::new();
        for task in tasks {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("upload semaphore closed");
            let store = Arc::clone(&self.store);
            workers.spawn(async move {
                let UploadTask {
                    local_path,
                    remote_path,
                    language,
                    content,
                } = task;
                info!(remote = %remote_path, language = %language, "writing remote artifact");
                let result = store
                    .write_artifact(&remote_path.full_path(), content, language, true)
                    .await;
                drop(permit);
                (local_path, result.map_err(SyncError::from))
            });
        }

        // Drain the pool completely; no task outcome goes unobserved.
        let mut uploaded = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((_, Ok(()))) => uploaded += 1,
                Ok((path, Err(error))) => failures.push(TaskFailure { path, error }),
                Err(join_error) => failures.push(TaskFailure {
                    path: PathBuf::new(),
                    error: SyncError::Worker(join_error.to_string()),
                }),
            }
        }

        SyncReport { uploaded, failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use remote_traits::RemoteError;
    use std::collections::HashSet;
    use std::fs;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum StoreCall {
        CreateDirectory(String),
        WriteArtifact {
            path: String,
            language: Language,
            overwrite: bool,
        },
    }

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<StoreCall>>,
        reject_paths: HashSet<String>,
        reject_directories: HashSet<String>,
    }

    impl RecordingStore {
        async fn calls(&self) -> Vec<StoreCall> {
            self.calls.lock().await.clone()
        }

        async fn written_paths(&self) -> HashSet<String> {
            self.calls()
                .await
                .into_iter()
                .filter_map(|call| match call {
                    StoreCall::WriteArtifact { path, .. } => Some(path),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl WorkspaceStore for RecordingStore {
        async fn create_directory(&self, path: &str) -> remote_traits::Result<()> {
            self.calls
                .lock()
                .await
                .push(StoreCall::CreateDirectory(path.to_string()));
            if self.reject_directories.contains(path) {
                return Err(RemoteError::Rejected {
                    status: 400,
                    message: "invalid directory".to_string(),
                });
            }
            Ok(())
        }

        async fn write_artifact(
            &self,
            path: &str,
            _content: Bytes,
            language: Language,
            overwrite: bool,
        ) -> remote_traits::Result<()> {
            self.calls.lock().await.push(StoreCall::WriteArtifact {
                path: path.to_string(),
                language,
                overwrite,
            });
            if self.reject_paths.contains(path) {
                return Err(RemoteError::Rejected {
                    status: 400,
                    message: "invalid payload".to_string(),
                });
            }
            Ok(())
        }
    }

    struct TempTree {
        root: PathBuf,
    }

    impl TempTree {
        fn new() -> Self {
            let root = std::env::temp_dir().join(format!("engine-test-{}", Uuid::new_v4()));
            fs::create_dir_all(&root).unwrap();
            Self { root }
        }

        fn file(&self, relative: &str, contents: &str) {
            let path = self.root.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
        }
    }

    impl Drop for TempTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    fn engine_with(store: Arc<RecordingStore>, concurrency: usize) -> SyncEngine {
        SyncEngine::new(store, SyncConfig { concurrency })
    }

    #[tokio::test]
    async fn test_end_to_end_call_sequence() {
        let tree = TempTree::new();
        tree.file("a/b/x.py", "print(1)");
        tree.file("c.scala", "object C");

        let store = Arc::new(RecordingStore::default());
        let report = engine_with(store.clone(), 4).sync(&tree.root).await;

        assert!(report.is_success());
        assert_eq!(report.uploaded, 2);

        let calls = store.calls().await;
        let creates: Vec<_> = calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::CreateDirectory(path) => Some(path.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(creates, vec!["".to_string(), "a/b".to_string()]);

        assert!(calls.contains(&StoreCall::WriteArtifact {
            path: "a/b/x".to_string(),
            language: Language::Python,
            overwrite: true,
        }));
        assert!(calls.contains(&StoreCall::WriteArtifact {
            path: "c".to_string(),
            language: Language::Scala,
            overwrite: true,
        }));

        // Every directory creation precedes every upload.
        let last_create = calls
            .iter()
            .rposition(|call| matches!(call, StoreCall::CreateDirectory(_)))
            .unwrap();
        let first_write = calls
            .iter()
            .position(|call| matches!(call, StoreCall::WriteArtifact { .. }))
            .unwrap();
        assert!(last_create < first_write);
    }

    #[tokio::test]
    async fn test_missing_root_is_a_warning_not_a_failure() {
        let missing = std::env::temp_dir().join(format!("engine-missing-{}", Uuid::new_v4()));
        let store = Arc::new(RecordingStore::default());

        let report = engine_with(store.clone(), 4).sync(&missing).await;

        assert!(report.is_success());
        assert_eq!(report.uploaded, 0);
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        let tree = TempTree::new();
        tree.file("one.py", "1");
        tree.file("two.py", "2");
        tree.file("three.py", "3");

        let store = Arc::new(RecordingStore {
            reject_paths: HashSet::from(["two".to_string()]),
            ..Default::default()
        });
        let report = engine_with(store.clone(), 4).sync(&tree.root).await;

        assert!(!report.is_success());
        assert_eq!(report.uploaded, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("two.py"));
        assert!(matches!(
            report.failures[0].error,
            SyncError::Remote(RemoteError::Rejected { .. })
        ));
    }

    #[tokio::test]
    async fn test_serial_and_parallel_runs_produce_the_same_artifacts() {
        let tree = TempTree::new();
        for i in 0..4 {
            tree.file(&format!("nested/d{}/f{}.py", i, i), "pass");
            tree.file(&format!("q{}.sql", i), "select 1");
        }

        let serial_store = Arc::new(RecordingStore::default());
        let serial = engine_with(serial_store.clone(), 1).sync(&tree.root).await;

        let parallel_store = Arc::new(RecordingStore::default());
        let parallel = engine_with(parallel_store.clone(), 20).sync(&tree.root).await;

        assert!(serial.is_success());
        assert!(parallel.is_success());
        assert_eq!(serial.uploaded, parallel.uploaded);
        assert_eq!(
            serial_store.written_paths().await,
            parallel_store.written_paths().await
        );
    }

    #[tokio::test]
    async fn test_directory_failure_only_fails_entries_below_it() {
        let tree = TempTree::new();
        tree.file("bad/x.py", "pass");
        tree.file("ok.scala", "object Ok");

        let store = Arc::new(RecordingStore {
            reject_directories: HashSet::from(["bad".to_string()]),
            ..Default::default()
        });
        let report = engine_with(store.clone(), 4).sync(&tree.root).await;

        assert_eq!(report.uploaded, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("x.py"));

        // Nothing was dispatched into the directory that failed to create.
        let written = store.written_paths().await;
        assert_eq!(written, HashSet::from(["ok".to_string()]));
    }

    #[tokio::test]
    async fn test_unrecognized_files_are_not_enumerated() {
        let tree = TempTree::new();
        tree.file("keep.py", "pass");
        tree.file("notes.txt", "not an artifact");

        let store = Arc::new(RecordingStore::default());
        let report = engine_with(store.clone(), 4).sync(&tree.root).await;

        assert!(report.is_success());
        assert_eq!(report.uploaded, 1);
    }
}
