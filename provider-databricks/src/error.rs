//! Error types for the Databricks provider

use remote_traits::RemoteError;
use thiserror::Error;

/// Databricks provider errors
#[derive(Error, Debug)]
pub enum DatabricksError {
    /// API request returned an error status
    #[error("Databricks API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },

    /// More than one job carries the same name and the caller asked for
    /// strict duplicate handling
    #[error("{count} jobs named {name:?} already exist")]
    DuplicateJobName { name: String, count: usize },

    /// Error surfaced by the transport seam
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result type for Databricks operations
pub type Result<T> = std::result::Result<T, DatabricksError>;

impl From<DatabricksError> for RemoteError {
    fn from(error: DatabricksError) -> Self {
        match error {
            // Retries are exhausted by the time a 429/5xx surfaces here; the
            // service is effectively unreachable for this run.
            DatabricksError::Api {
                status_code,
                message,
            } if status_code == 429 || status_code >= 500 => {
                RemoteError::Unavailable(format!("status {}: {}", status_code, message))
            }
            DatabricksError::Api {
                status_code,
                message,
            } => RemoteError::Rejected {
                status: status_code,
                message,
            },
            DatabricksError::DuplicateJobName { name, count } => {
                RemoteError::DuplicateName { name, count }
            }
            DatabricksError::Remote(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DatabricksError::Api {
            status_code: 404,
            message: "RESOURCE_DOES_NOT_EXIST".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Databricks API error (status 404): RESOURCE_DOES_NOT_EXIST"
        );
    }

    #[test]
    fn test_client_errors_map_to_rejected() {
        let error = DatabricksError::Api {
            status_code: 400,
            message: "bad path".to_string(),
        };
        let remote: RemoteError = error.into();

        assert!(matches!(remote, RemoteError::Rejected { status: 400, .. }));
    }

    #[test]
    fn test_server_errors_map_to_unavailable() {
        let error = DatabricksError::Api {
            status_code: 503,
            message: "TEMPORARILY_UNAVAILABLE".to_string(),
        };
        let remote: RemoteError = error.into();

        assert!(matches!(remote, RemoteError::Unavailable(_)));
    }

    #[test]
    fn test_duplicate_job_name_maps_through() {
        let error = DatabricksError::DuplicateJobName {
            name: "etl-job".to_string(),
            count: 2,
        };
        let remote: RemoteError = error.into();

        assert!(matches!(
            remote,
            RemoteError::DuplicateName { count: 2, .. }
        ));
    }
}
