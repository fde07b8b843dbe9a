use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use super::error::{WorkspaceError, WorkspaceResult};
use super::host::{default_backing_dir, TempDirWorkspaceHost, WorkspaceHandle, WorkspaceHost};
use crate::config;
use crate::language::Language;

static NEXT_BACKING_SUFFIX: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Default)]
struct WorkspaceSlot {
    ref_count: u32,
    handle: Option<WorkspaceHandle>,
}

/// Shared preview context, one per process by convention. Every panel
/// instance gets the same session injected and holds the workspace alive for
/// as long as it is open; the backing workspace is created on the first
/// acquire and destroyed when the last holder releases.
///
/// Also carries the process-wide language selection shared by all panels.
///
/// Acquire/release/current are safe from arbitrary threads; everything else
/// in this crate is single-threaded panel state.
pub struct PreviewSession {
    host: Box<dyn WorkspaceHost>,
    backing_dir: PathBuf,
    slot: Mutex<WorkspaceSlot>,
    selected: Mutex<Option<Language>>,
}

impl PreviewSession {
    pub fn new(host: impl WorkspaceHost + 'static, backing_dir: PathBuf) -> Self {
        Self {
            host: Box::new(host),
            backing_dir,
            slot: Mutex::new(WorkspaceSlot::default()),
            selected: Mutex::new(None),
        }
    }

    /// Session backed by a temp directory under the runtime dir, honoring the
    /// `workspace_dir` config override.
    pub fn with_default_host() -> Self {
        let backing_dir = config::load_preview_config()
            .workspace_dir
            .unwrap_or_else(default_backing_dir);
        Self::new(TempDirWorkspaceHost::new(), backing_dir)
    }

    /// Registers one more holder of the shared workspace, creating it if no
    /// holder brought one up yet. Creation failure is logged and leaves the
    /// workspace absent; the count still goes up and the next acquire retries
    /// creation.
    pub fn acquire(&self) {
        let mut slot = self.lock_slot();
        if slot.handle.is_none() {
            let path = self.allocate_backing_path();
            match self.host.create_temporary_workspace(&path) {
                Ok(handle) => {
                    tracing::info!(id = handle.id(), "formatting workspace created");
                    slot.handle = Some(handle);
                }
                Err(err) => {
                    tracing::error!(?err, "formatting workspace creation failed; preview disabled until a later acquire succeeds");
                }
            }
        }
        slot.ref_count += 1;
        tracing::debug!(ref_count = slot.ref_count, "workspace acquired");
    }

    /// Drops one holder; the last release out tears the workspace down.
    pub fn release(&self) {
        let mut slot = self.lock_slot();
        if slot.ref_count == 0 {
            tracing::warn!("workspace release without matching acquire");
            return;
        }
        slot.ref_count -= 1;
        tracing::debug!(ref_count = slot.ref_count, "workspace released");
        if slot.ref_count == 0 {
            if let Some(handle) = slot.handle.take() {
                if let Err(err) = self.host.destroy_workspace(handle) {
                    tracing::warn!(?err, "formatting workspace teardown failed");
                }
            }
        }
    }

    /// The live workspace handle, or `NoActiveWorkspace` when no acquire is
    /// outstanding (or the last creation attempt failed).
    pub fn current(&self) -> WorkspaceResult<WorkspaceHandle> {
        self.lock_slot()
            .handle
            .clone()
            .ok_or(WorkspaceError::NoActiveWorkspace)
    }

    pub fn ref_count(&self) -> u32 {
        self.lock_slot().ref_count
    }

    pub fn selected_language(&self) -> Option<Language> {
        self.lock_selected().clone()
    }

    pub fn set_selected_language(&self, language: Language) {
        tracing::debug!(language = language.id(), "selected language changed");
        *self.lock_selected() = Some(language);
    }

    fn allocate_backing_path(&self) -> PathBuf {
        let suffix = NEXT_BACKING_SUFFIX.fetch_add(1, Ordering::Relaxed);
        self.backing_dir
            .join(format!("workspace_{}_{suffix}", std::process::id()))
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, WorkspaceSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_selected(&self) -> std::sync::MutexGuard<'_, Option<Language>> {
        self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.lock_slot();
        f.debug_struct("PreviewSession")
            .field("ref_count", &slot.ref_count)
            .field("live", &slot.handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use crate::language::FileKind;

    #[derive(Default)]
    struct CountingHost {
        created: AtomicUsize,
        destroyed: AtomicUsize,
        fail_first: AtomicUsize,
    }

    impl CountingHost {
        fn failing_once() -> Self {
            let host = Self::default();
            host.fail_first.store(1, Ordering::Relaxed);
            host
        }
    }

    impl WorkspaceHost for Arc<CountingHost> {
        fn create_temporary_workspace(&self, path: &Path) -> WorkspaceResult<WorkspaceHandle> {
            if self.fail_first.load(Ordering::Relaxed) > 0 {
                self.fail_first.fetch_sub(1, Ordering::Relaxed);
                return Err(WorkspaceError::CreationFailed {
                    path: path.to_path_buf(),
                    source: std::io::Error::other("simulated allocation failure"),
                });
            }
            let id = self.created.fetch_add(1, Ordering::Relaxed) as u64;
            Ok(WorkspaceHandle::new(id, path.to_path_buf()))
        }

        fn destroy_workspace(&self, _handle: WorkspaceHandle) -> WorkspaceResult<()> {
            self.destroyed.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn session_with(host: &Arc<CountingHost>) -> PreviewSession {
        PreviewSession::new(Arc::clone(host), PathBuf::from("/tmp/stylepane-tests"))
    }

    #[test]
    fn handle_is_live_exactly_while_ref_count_is_positive() {
        let host = Arc::new(CountingHost::default());
        let session = session_with(&host);

        assert!(session.current().is_err());
        session.acquire();
        assert!(session.current().is_ok());
        session.acquire();
        session.release();
        assert!(session.current().is_ok());
        session.release();
        assert!(matches!(
            session.current(),
            Err(WorkspaceError::NoActiveWorkspace)
        ));
    }

    #[test]
    fn n_acquires_and_n_releases_destroy_workspace_exactly_once() {
        let host = Arc::new(CountingHost::default());
        let session = session_with(&host);

        session.acquire();
        session.acquire();
        session.acquire();
        session.release();
        session.acquire();
        session.release();
        session.release();
        session.release();

        assert_eq!(host.created.load(Ordering::Relaxed), 1);
        assert_eq!(host.destroyed.load(Ordering::Relaxed), 1);
        assert_eq!(session.ref_count(), 0);
    }

    #[test]
    fn reacquire_after_full_release_creates_a_fresh_workspace() {
        let host = Arc::new(CountingHost::default());
        let session = session_with(&host);

        session.acquire();
        let first = session.current().unwrap();
        session.release();
        session.acquire();
        let second = session.current().unwrap();
        session.release();

        assert_ne!(first.id(), second.id());
        assert_eq!(host.created.load(Ordering::Relaxed), 2);
        assert_eq!(host.destroyed.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn failed_creation_leaves_current_failing_until_next_acquire() {
        let host = Arc::new(CountingHost::failing_once());
        let session = session_with(&host);

        session.acquire();
        assert_eq!(session.ref_count(), 1);
        assert!(matches!(
            session.current(),
            Err(WorkspaceError::NoActiveWorkspace)
        ));

        session.acquire();
        assert!(session.current().is_ok());

        session.release();
        session.release();
        assert_eq!(host.destroyed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn release_without_acquire_is_tolerated() {
        let host = Arc::new(CountingHost::default());
        let session = session_with(&host);

        session.release();
        assert_eq!(session.ref_count(), 0);
        session.acquire();
        assert_eq!(session.ref_count(), 1);
        session.release();
        assert_eq!(host.destroyed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn concurrent_panel_open_close_keeps_the_counter_consistent() {
        let host = Arc::new(CountingHost::default());
        let session = Arc::new(session_with(&host));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        session.acquire();
                        session.release();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        assert_eq!(session.ref_count(), 0);
        assert!(session.current().is_err());
        assert_eq!(
            host.created.load(Ordering::Relaxed),
            host.destroyed.load(Ordering::Relaxed)
        );
    }

    #[test]
    fn selected_language_is_shared_session_state() {
        let host = Arc::new(CountingHost::default());
        let session = session_with(&host);
        assert!(session.selected_language().is_none());

        let go = Language::new("go", "Go", FileKind::new("go", "go"));
        session.set_selected_language(go.clone());
        assert_eq!(session.selected_language(), Some(go));
    }
}
