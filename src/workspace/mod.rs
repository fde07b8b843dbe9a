pub mod error;
pub mod host;
pub mod session;

pub use error::{WorkspaceError, WorkspaceResult};
pub use host::{TempDirWorkspaceHost, WorkspaceHandle, WorkspaceHost};
pub use session::PreviewSession;
