use crate::reformat::ReformatError;
use crate::workspace::WorkspaceError;
use thiserror::Error;

pub type PanelResult<T> = std::result::Result<T, PanelError>;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Reformat(#[from] ReformatError),
}
