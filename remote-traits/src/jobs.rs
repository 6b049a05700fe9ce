//! Job Registry Contract
//!
//! The remote service managing named job definitions. Job identity is the
//! declared name; everything else in a job's settings is opaque to the sync
//! core and passed through untouched.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A locally declared job definition.
///
/// `settings` is the full settings payload as loaded from the declaration
/// file (it contains `name` again, among whatever else the registry
/// understands). The sync core only ever reads `name`.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub name: String,
    pub settings: Value,
}

/// The registry's view of an existing job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteJob {
    pub job_id: u64,
    pub name: String,
}

/// Remote job registry.
///
/// Duplicate names can legitimately exist remotely. Every lookup therefore
/// takes a `fail_on_duplicate` flag: strict callers get
/// `RemoteError::DuplicateName` when more than one job matches, lenient
/// callers get whichever match the registry returns first. Ordering among
/// duplicates is registry-defined; implementations must not sort or
/// tie-break.
#[async_trait]
pub trait JobRegistry: Send + Sync {
    /// Create the job named in `spec`, or update the existing job of that
    /// name with `spec.settings`.
    async fn upsert_job(&self, spec: &JobSpec, fail_on_duplicate: bool) -> Result<()>;

    /// Look up a job by declared name. `None` when no job of that name
    /// exists.
    async fn get_job_by_name(&self, name: &str, fail_on_duplicate: bool)
        -> Result<Option<RemoteJob>>;

    /// Human-facing URI for a job, for log output only.
    fn job_link(&self, job_id: u64) -> String;
}
