//! `dbx-sync`: synchronize local source artifacts and declared jobs into a
//! Databricks workspace.

mod http;
mod logging;
mod settings;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use core_sync::{JobOutcome, JobReconciler, ReconcileOptions, SyncConfig, SyncEngine};
use provider_databricks::DatabricksClient;
use remote_traits::HttpClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::http::ReqwestHttpClient;

/// Synchronize local source artifacts and declared jobs into a Databricks
/// workspace.
#[derive(Parser)]
#[command(name = "dbx-sync", version, about)]
struct Cli {
    /// Workspace base URL, e.g. https://my-shard.cloud.databricks.com
    #[arg(long, env = "DATABRICKS_HOST", global = true)]
    host: Option<String>,

    /// Personal access token
    #[arg(long, env = "DATABRICKS_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload every recognized artifact under the source root
    Sync {
        /// Local directory holding the artifacts
        source_root: PathBuf,

        /// Maximum concurrent uploads
        #[arg(long, default_value_t = 20)]
        concurrency: usize,
    },

    /// Create or update the jobs declared in a settings file
    UpsertJobs {
        /// JSON array of job settings objects
        settings_path: PathBuf,

        /// Only reconcile the job with this name; skip the rest
        #[arg(long = "job")]
        job: Option<String>,

        /// Tolerate duplicate remote job names by updating the first match
        #[arg(long)]
        allow_duplicate_names: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let client = Arc::new(build_client(&cli)?);

    match cli.command {
        Command::Sync {
            source_root,
            concurrency,
        } => {
            let engine = SyncEngine::new(client, SyncConfig { concurrency });
            let report = engine.sync(&source_root).await;
            report.log_summary();
            Ok(report.is_success())
        }
        Command::UpsertJobs {
            settings_path,
            job,
            allow_duplicate_names,
        } => {
            let specs = settings::load_job_specs(&settings_path)?;
            let options = ReconcileOptions {
                fail_on_duplicate: !allow_duplicate_names,
                only_job: job,
            };
            let reconciler = JobReconciler::new(client, options);
            let outcomes = reconciler.reconcile(&specs).await;

            let failed = outcomes.iter().filter(|o| o.is_failed()).count();
            for outcome in &outcomes {
                if let JobOutcome::Failed { name, error } = outcome {
                    warn!(job = %name, error = %error, "job reconciliation failed");
                }
            }
            if failed > 0 {
                error!("{} of {} jobs failed", failed, outcomes.len());
            } else {
                info!("{} jobs reconciled", outcomes.len());
            }
            Ok(failed == 0)
        }
    }
}

fn build_client(cli: &Cli) -> Result<DatabricksClient> {
    let Some(host) = &cli.host else {
        bail!("no workspace host configured; pass --host or set DATABRICKS_HOST");
    };
    let Some(token) = &cli.token else {
        bail!("no access token configured; pass --token or set DATABRICKS_TOKEN");
    };

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    Ok(DatabricksClient::new(http, host, token))
}
