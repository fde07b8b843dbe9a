use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create formatting workspace at {path}: {source}")]
    CreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no active formatting workspace; acquire the session before use")]
    NoActiveWorkspace,

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
