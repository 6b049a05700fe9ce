//! # Synchronization & Reconciliation Core
//!
//! Synchronizes a local tree of source artifacts into a remote workspace
//! store and reconciles declared job definitions against a remote job
//! registry. All remote access goes through the `remote-traits` seams; this
//! crate owns the algorithms, not the transport.
//!
//! ## Components
//!
//! - **Path translation** (`translate`): pure local-path → remote-path +
//!   language mapping
//! - **Tree walker** (`walker`): enumerates recognized artifacts under a
//!   sync root
//! - **Upload engine** (`engine`): directory pre-creation plus bounded
//!   parallel upload fan-out with aggregate reporting
//! - **Job reconciler** (`reconcile`): sequential create-or-update of named
//!   jobs with post-upsert verification

pub mod artifact;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod translate;
pub mod walker;

pub use artifact::{ArtifactEntry, RemotePath};
pub use engine::{SyncConfig, SyncEngine, SyncReport, TaskFailure};
pub use error::{Result, SyncError};
pub use reconcile::{JobOutcome, JobReconciler, ReconcileOptions};
pub use translate::{language_for_extension, translate, RECOGNIZED_EXTENSIONS};
pub use walker::enumerate;
