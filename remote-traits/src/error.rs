use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RemoteError {
    /// The remote service could not be reached (connect failure, timeout,
    /// TLS failure). Transport-level; the request may never have arrived.
    #[error("Remote service unavailable: {0}")]
    Unavailable(String),

    /// The remote store received the request and rejected it.
    #[error("Remote store rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// More than one remote job shares a declared name and the caller asked
    /// for strict duplicate handling.
    #[error("{count} remote jobs share the name {name:?}")]
    DuplicateName { name: String, count: usize },

    /// The exchange itself was malformed: a body we could not serialize, or
    /// a response we could not parse.
    #[error("Malformed exchange with the remote service: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, RemoteError>;
