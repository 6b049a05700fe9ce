use remote_traits::RemoteError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unrecognized artifact extension: {extension:?}")]
    UnknownExtension { extension: String },

    #[error("File {path:?} does not live under sync root {root:?}")]
    OutsideRoot { path: String, root: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Job {name:?} could not be found after a reported-successful upsert")]
    JobVanished { name: String },

    #[error("Upload worker terminated abnormally: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
