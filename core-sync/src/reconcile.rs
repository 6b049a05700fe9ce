//! Job reconciliation.
//!
//! Reconciles the locally declared set of named jobs against the remote
//! registry. Each job walks Pending → Upserted → Verified | Failed; jobs the
//! single-job filter rules out end as Skipped without touching the registry.
//!
//! Jobs are processed strictly sequentially, not pooled: name-based
//! duplicate detection for job N+1 must observe the effects of job N in case
//! their names collide.

use crate::error::{Result, SyncError};
use remote_traits::{JobRegistry, JobSpec};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Reconciliation options.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Strict duplicate policy: abort a job when the registry holds more
    /// than one job of its name. When lenient, the registry operates on the
    /// first match it returns and warns about the rest.
    pub fail_on_duplicate: bool,

    /// When set, every job spec with a different name is skipped.
    pub only_job: Option<String>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            fail_on_duplicate: true,
            only_job: None,
        }
    }
}

/// Terminal state of one job's reconciliation.
#[derive(Debug)]
pub enum JobOutcome {
    /// Upserted and confirmed present by a follow-up fetch.
    Verified { name: String, link: String },

    /// Ruled out by the single-job filter; never attempted.
    Skipped { name: String },

    /// Upsert or verification failed; later jobs still run.
    Failed { name: String, error: SyncError },
}

impl JobOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, JobOutcome::Failed { .. })
    }
}

/// Sequential reconciler of declared jobs against the remote registry.
pub struct JobReconciler {
    registry: Arc<dyn JobRegistry>,
    options: ReconcileOptions,
}

impl JobReconciler {
    pub fn new(registry: Arc<dyn JobRegistry>, options: ReconcileOptions) -> Self {
        Self { registry, options }
    }

    /// Reconcile every declared job, one at a time, and report each job's
    /// terminal state. A failed job never stops the jobs after it.
    pub async fn reconcile(&self, specs: &[JobSpec]) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Some(only) = &self.options.only_job {
                if only != &spec.name {
                    info!(job = %spec.name, "job skipped");
                    outcomes.push(JobOutcome::Skipped {
                        name: spec.name.clone(),
                    });
                    continue;
                }
            }
            outcomes.push(self.upsert_one(spec).await);
        }
        outcomes
    }

    #[instrument(skip(self, spec), fields(job = %spec.name))]
    async fn upsert_one(&self, spec: &JobSpec) -> JobOutcome {
        info!("upserting job");
        match self.try_upsert(spec).await {
            Ok(link) => {
                info!(link = %link, "updated/created job");
                JobOutcome::Verified {
                    name: spec.name.clone(),
                    link,
                }
            }
            Err(e) => {
                error!(error = %e, "job upsert failed");
                JobOutcome::Failed {
                    name: spec.name.clone(),
                    error: e,
                }
            }
        }
    }

    /// Upsert, then verify the job actually materialized. A registry that
    /// accepts a write without producing a lookupable job is an integrity
    /// failure, not a success.
    async fn try_upsert(&self, spec: &JobSpec) -> Result<String> {
        self.registry
            .upsert_job(spec, self.options.fail_on_duplicate)
            .await?;

        let job = self
            .registry
            .get_job_by_name(&spec.name, self.options.fail_on_duplicate)
            .await?
            .ok_or_else(|| SyncError::JobVanished {
                name: spec.name.clone(),
            })?;

        Ok(self.registry.job_link(job.job_id))
    }
}
