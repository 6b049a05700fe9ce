//! Databricks REST API request/response types
//!
//! Data structures for the workspace and jobs 2.0 endpoints.

use remote_traits::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST workspace/mkdirs`
#[derive(Debug, Serialize)]
pub struct MkdirsRequest {
    /// Absolute workspace path
    pub path: String,
}

/// Body of `POST workspace/import`
#[derive(Debug, Serialize)]
pub struct ImportRequest {
    /// Absolute workspace path, without the language suffix
    pub path: String,

    /// Import format; always `SOURCE` for plain source artifacts
    pub format: &'static str,

    /// Language tag the store files the artifact under
    pub language: Language,

    /// Base64-encoded content body
    pub content: String,

    /// Replace an existing artifact at `path`
    pub overwrite: bool,
}

/// Response of `GET jobs/list`
#[derive(Debug, Deserialize)]
pub struct JobsListResponse {
    #[serde(default)]
    pub jobs: Vec<JobDescriptor>,
}

/// One job as the registry reports it
#[derive(Debug, Clone, Deserialize)]
pub struct JobDescriptor {
    pub job_id: u64,

    #[serde(default)]
    pub settings: JobSettings,
}

/// The subset of job settings the sync cares about
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSettings {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `POST jobs/create`
#[derive(Debug, Deserialize)]
pub struct CreateJobResponse {
    pub job_id: u64,
}

/// Body of `POST jobs/reset`
#[derive(Debug, Serialize)]
pub struct ResetJobRequest {
    pub job_id: u64,

    /// Full replacement settings, passed through opaquely
    pub new_settings: Value,
}

/// Error body the API attaches to non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error_code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_jobs_list() {
        let json = r#"{
            "jobs": [
                { "job_id": 5, "settings": { "name": "etl-job" } },
                { "job_id": 9, "settings": { "name": "reporting" } }
            ]
        }"#;

        let listing: JobsListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(listing.jobs.len(), 2);
        assert_eq!(listing.jobs[0].job_id, 5);
        assert_eq!(listing.jobs[0].settings.name.as_deref(), Some("etl-job"));
    }

    #[test]
    fn test_deserialize_empty_jobs_list() {
        let listing: JobsListResponse = serde_json::from_str("{}").unwrap();
        assert!(listing.jobs.is_empty());
    }

    #[test]
    fn test_serialize_import_request() {
        let request = ImportRequest {
            path: "/a/b/x".to_string(),
            format: "SOURCE",
            language: Language::Python,
            content: "cHJpbnQoMSk=".to_string(),
            overwrite: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["path"], "/a/b/x");
        assert_eq!(json["format"], "SOURCE");
        assert_eq!(json["language"], "PYTHON");
        assert_eq!(json["overwrite"], true);
    }
}
