use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::{WorkspaceError, WorkspaceResult};

const DEFAULT_FALLBACK_TEMP_DIR: &str = "/tmp/stylepane";

/// Opaque handle to a live formatting workspace. The `id` ties synthetic
/// documents back to the workspace they were created in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceHandle {
    id: u64,
    root: PathBuf,
}

impl WorkspaceHandle {
    pub fn new(id: u64, root: PathBuf) -> Self {
        Self { id, root }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Host environment that can register and tear down a temporary workspace
/// for the formatter to run in, outside of any real user project.
pub trait WorkspaceHost: Send + Sync {
    fn create_temporary_workspace(&self, path: &Path) -> WorkspaceResult<WorkspaceHandle>;
    fn destroy_workspace(&self, handle: WorkspaceHandle) -> WorkspaceResult<()>;
}

/// Filesystem-backed host: each workspace is a directory under the runtime
/// temp root, removed on teardown.
#[derive(Debug, Default)]
pub struct TempDirWorkspaceHost {
    next_id: AtomicU64,
}

impl TempDirWorkspaceHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkspaceHost for TempDirWorkspaceHost {
    fn create_temporary_workspace(&self, path: &Path) -> WorkspaceResult<WorkspaceHandle> {
        fs::create_dir_all(path).map_err(|source| WorkspaceError::CreationFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(id, path = %path.display(), "created formatting workspace");
        Ok(WorkspaceHandle::new(id, path.to_path_buf()))
    }

    fn destroy_workspace(&self, handle: WorkspaceHandle) -> WorkspaceResult<()> {
        tracing::debug!(id = handle.id(), path = %handle.root().display(), "destroying formatting workspace");
        match fs::remove_dir_all(handle.root()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(WorkspaceError::Io(err)),
        }
    }
}

pub(crate) fn default_backing_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR")
        .map(|dir| PathBuf::from(dir).join("stylepane"))
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FALLBACK_TEMP_DIR))
}
