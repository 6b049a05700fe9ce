//! # Remote Service Contracts
//!
//! Trait seams between the synchronization core and the remote workspace
//! service. The core only ever talks to these traits; the concrete REST
//! client lives in its own provider crate and the binary wires the two
//! together.
//!
//! ## Components
//!
//! - **Workspace store** (`workspace`): hierarchical artifact store with
//!   idempotent directory creation and overwriting artifact import
//! - **Job registry** (`jobs`): named job definitions with upsert-by-name
//!   and a caller-chosen duplicate policy
//! - **HTTP transport** (`http`): the client abstraction providers are
//!   built over, mockable in tests
//! - **Errors** (`error`): the failure taxonomy shared across the seam

pub mod error;
pub mod http;
pub mod jobs;
pub mod workspace;

pub use error::{RemoteError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use jobs::{JobRegistry, JobSpec, RemoteJob};
pub use workspace::{Language, WorkspaceStore};
