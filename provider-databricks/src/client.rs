//! Databricks REST client
//!
//! Implements the `WorkspaceStore` and `JobRegistry` traits over the
//! Databricks workspace and jobs 2.0 endpoints.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use remote_traits::{
    HttpClient, HttpMethod, HttpRequest, HttpResponse, JobRegistry, JobSpec, Language, RemoteJob,
    WorkspaceStore,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{DatabricksError, Result};
use crate::types::{
    CreateJobResponse, ErrorResponse, ImportRequest, JobDescriptor, JobsListResponse,
    MkdirsRequest, ResetJobRequest,
};

/// API version prefix shared by the workspace and jobs endpoints
const API_BASE: &str = "api/2.0";

/// Retry attempts for rate-limited or transiently failing requests
const MAX_RETRIES: u32 = 3;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Databricks API client
///
/// One client serves both remote surfaces the sync needs: the hierarchical
/// workspace store (`mkdirs`/`import`) and the job registry
/// (`jobs/list`, `jobs/create`, `jobs/reset`).
///
/// # Features
///
/// - Bearer-token authentication on every request
/// - Exponential backoff on 429 and 5xx responses
/// - Store-relative paths mapped to absolute workspace paths
///
/// # Example
///
/// ```ignore
/// use provider_databricks::DatabricksClient;
/// use remote_traits::WorkspaceStore;
///
/// let client = DatabricksClient::new(http_client, "https://shard.example.com", token);
/// client.create_directory("etl/daily").await?;
/// ```
pub struct DatabricksClient {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Workspace base URL, without a trailing slash
    host: String,

    /// Personal access token
    token: String,
}

impl DatabricksClient {
    /// Create a new client against `host`, authenticating with `token`.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        host: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let host = host.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            host,
            token: token.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.host, API_BASE, path)
    }

    /// Absolute workspace path for a store-relative one. The empty relative
    /// path names the workspace root.
    fn workspace_path(path: &str) -> String {
        format!("/{}", path)
    }

    /// Execute a request, retrying with exponential backoff on rate limits
    /// and server errors. Client errors are returned immediately.
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn execute_with_retry(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut attempt = 0;

        loop {
            match self.http_client.execute(request.clone()).await {
                Ok(response) => {
                    let status = response.status;

                    if response.is_success() {
                        debug!(status, "API request succeeded");
                        return Ok(response);
                    }

                    let retryable = status == 429 || response.is_server_error();
                    attempt += 1;
                    if !retryable || attempt >= MAX_RETRIES {
                        warn!(status, "API request failed");
                        return Err(DatabricksError::Api {
                            status_code: status,
                            message: error_message(&response),
                        });
                    }

                    let backoff_ms = 100u64 * 2u64.pow(attempt);
                    warn!(
                        status,
                        attempt, "retryable API failure, retrying in {}ms", backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= MAX_RETRIES {
                        warn!(error = %e, "API request failed after {} attempts", MAX_RETRIES);
                        return Err(e.into());
                    }

                    let backoff_ms = 100u64 * 2u64.pow(attempt);
                    warn!(error = %e, attempt, "transport failure, retrying in {}ms", backoff_ms);
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, self.endpoint(path))
            .bearer_token(&self.token)
            .timeout(REQUEST_TIMEOUT)
            .json(body)?;
        self.execute_with_retry(request).await
    }

    async fn get(&self, path: &str) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Get, self.endpoint(path))
            .bearer_token(&self.token)
            .timeout(REQUEST_TIMEOUT);
        self.execute_with_retry(request).await
    }

    /// All remote jobs carrying `name`, in the order the registry returned
    /// them.
    async fn jobs_named(&self, name: &str) -> Result<Vec<JobDescriptor>> {
        let response = self.get("jobs/list").await?;
        let listing: JobsListResponse = response.json()?;
        Ok(listing
            .jobs
            .into_iter()
            .filter(|job| job.settings.name.as_deref() == Some(name))
            .collect())
    }

    /// Apply the duplicate policy to a name lookup. Ordering among
    /// duplicates is registry-defined; "first" is whatever `jobs/list`
    /// returned first.
    fn first_match(
        name: &str,
        matches: Vec<JobDescriptor>,
        fail_on_duplicate: bool,
    ) -> Result<Option<JobDescriptor>> {
        if matches.len() > 1 {
            if fail_on_duplicate {
                return Err(DatabricksError::DuplicateJobName {
                    name: name.to_string(),
                    count: matches.len(),
                });
            }
            let skipped: Vec<u64> = matches.iter().skip(1).map(|job| job.job_id).collect();
            warn!(
                job = name,
                skipped = ?skipped,
                "multiple remote jobs share this name; operating on the first match only"
            );
        }
        Ok(matches.into_iter().next())
    }
}

#[async_trait]
impl WorkspaceStore for DatabricksClient {
    #[instrument(skip(self))]
    async fn create_directory(&self, path: &str) -> remote_traits::Result<()> {
        info!("creating remote directory if absent: {:?}", path);
        let body = MkdirsRequest {
            path: Self::workspace_path(path),
        };
        self.post_json("workspace/mkdirs", &body).await?;
        Ok(())
    }

    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn write_artifact(
        &self,
        path: &str,
        content: Bytes,
        language: Language,
        overwrite: bool,
    ) -> remote_traits::Result<()> {
        info!("writing remote artifact {:?} with source type {}", path, language);
        let body = ImportRequest {
            path: Self::workspace_path(path),
            format: "SOURCE",
            language,
            content: BASE64.encode(&content),
            overwrite,
        };
        self.post_json("workspace/import", &body).await?;
        Ok(())
    }
}

#[async_trait]
impl JobRegistry for DatabricksClient {
    #[instrument(skip(self, spec), fields(job = %spec.name))]
    async fn upsert_job(&self, spec: &JobSpec, fail_on_duplicate: bool) -> remote_traits::Result<()> {
        let matches = self.jobs_named(&spec.name).await?;
        match Self::first_match(&spec.name, matches, fail_on_duplicate)? {
            Some(existing) => {
                info!(job_id = existing.job_id, "resetting existing job");
                let body = ResetJobRequest {
                    job_id: existing.job_id,
                    new_settings: spec.settings.clone(),
                };
                self.post_json("jobs/reset", &body).await?;
            }
            None => {
                info!("creating job");
                let response = self.post_json("jobs/create", &spec.settings).await?;
                let created: CreateJobResponse = response.json()?;
                debug!(job_id = created.job_id, "job created");
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_job_by_name(
        &self,
        name: &str,
        fail_on_duplicate: bool,
    ) -> remote_traits::Result<Option<RemoteJob>> {
        let matches = self.jobs_named(name).await?;
        let first = Self::first_match(name, matches, fail_on_duplicate)?;
        Ok(first.map(|descriptor| RemoteJob {
            job_id: descriptor.job_id,
            name: descriptor
                .settings
                .name
                .unwrap_or_else(|| name.to_string()),
        }))
    }

    fn job_link(&self, job_id: u64) -> String {
        format!("{}/#job/{}", self.host, job_id)
    }
}

/// Best-effort extraction of the API's structured error message.
fn error_message(response: &HttpResponse) -> String {
    if let Ok(error) = response.json::<ErrorResponse>() {
        match (error.error_code, error.message) {
            (Some(code), Some(message)) => return format!("{}: {}", code, message),
            (None, Some(message)) => return message,
            (Some(code), None) => return code,
            (None, None) => {}
        }
    }
    response.text()
}
