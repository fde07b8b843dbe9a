use std::rc::Rc;

use thiserror::Error;

use crate::document::{DocumentHandle, DocumentHost, SyntheticDocument};
use crate::workspace::{PreviewSession, WorkspaceError};

pub type ReformatResult<T> = std::result::Result<T, ReformatError>;

/// The formatter refused its input (malformed or incomplete sample code).
/// Recoverable: the preview keeps showing the previous text.
#[derive(Debug, Error)]
#[error("formatter rejected input: {reason}")]
pub struct FormatRejected {
    pub reason: String,
}

impl FormatRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReformatError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("document {stamp} does not belong to the active workspace {workspace_id}")]
    ForeignDocument { stamp: u64, workspace_id: u64 },
}

/// External reformat engine. Reads the committed snapshot of the document and
/// writes the formatted text back as pending content.
pub trait FormatEngine {
    fn apply_formatting(&self, document: DocumentHandle) -> Result<(), FormatRejected>;
}

/// Runs a formatting pass over a synthetic document as a committed
/// transaction and reports the resulting text.
#[derive(Clone)]
pub struct ReformatExecutor {
    host: Rc<dyn DocumentHost>,
    engine: Rc<dyn FormatEngine>,
}

impl ReformatExecutor {
    pub fn new(host: Rc<dyn DocumentHost>, engine: Rc<dyn FormatEngine>) -> Self {
        Self { host, engine }
    }

    /// Reformat cycle: write raw text, commit, format, commit again. Both
    /// commits are part of the protocol. The formatter requires a committed,
    /// consistent snapshot as input; skipping the first commit would hand it
    /// stale or partial content.
    ///
    /// On [`FormatRejected`] the original text is restored, the rejection is
    /// logged, and the previous content is returned unchanged. Workspace
    /// failures propagate; the caller must re-acquire.
    pub fn reformat(
        &self,
        session: &PreviewSession,
        document: &SyntheticDocument,
    ) -> ReformatResult<String> {
        let workspace = session.current()?;
        if document.workspace_id() != workspace.id() {
            return Err(ReformatError::ForeignDocument {
                stamp: document.stamp(),
                workspace_id: workspace.id(),
            });
        }

        let handle = document.handle();
        let original = self.host.committed_text(handle);

        self.host.replace_content(handle, &original);
        self.host.commit(handle);

        match self.engine.apply_formatting(handle) {
            Ok(()) => {
                self.host.commit(handle);
                Ok(self.host.committed_text(handle))
            }
            Err(rejected) => {
                tracing::warn!(
                    stamp = document.stamp(),
                    language = document.language().id(),
                    reason = %rejected.reason,
                    "formatter rejected preview text; keeping previous content"
                );
                self.host.replace_content(handle, &original);
                self.host.commit(handle);
                Ok(original)
            }
        }
    }
}
