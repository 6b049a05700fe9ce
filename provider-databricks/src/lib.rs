//! # Databricks Provider
//!
//! Concrete `WorkspaceStore` and `JobRegistry` implementation over the
//! Databricks REST 2.0 API. The client is built against the `HttpClient`
//! transport seam so the request/response behavior is testable with a mock
//! transport.

pub mod client;
pub mod error;
pub mod types;

pub use client::DatabricksClient;
pub use error::DatabricksError;
