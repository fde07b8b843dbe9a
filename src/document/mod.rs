use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::language::{FileKind, Language};
use crate::workspace::WorkspaceHandle;

// Identity stamp shared by all factories so two documents never collide,
// even across sessions with identical sample text.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(1);

/// Opaque reference to a text buffer held by a [`DocumentHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentHandle(u64);

impl DocumentHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Text-buffer host collaborator. Buffers keep a pending and a committed
/// copy; `commit` publishes pending edits, and the formatter only ever reads
/// the committed snapshot.
pub trait DocumentHost {
    fn create_document(&self, file_kind: &FileKind, text: &str) -> DocumentHandle;
    fn replace_content(&self, handle: DocumentHandle, text: &str);
    fn commit(&self, handle: DocumentHandle);
    fn committed_text(&self, handle: DocumentHandle) -> String;
    fn discard(&self, handle: DocumentHandle);
}

/// Ephemeral in-memory document hosting a preview. Never persisted; owned by
/// the tab binding that created it, and its buffer is discarded from the host
/// when that binding drops it.
pub struct SyntheticDocument {
    handle: DocumentHandle,
    host: Rc<dyn DocumentHost>,
    language: Language,
    stamp: u64,
    workspace_id: u64,
}

impl SyntheticDocument {
    pub fn handle(&self) -> DocumentHandle {
        self.handle
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Monotonic creation stamp. Identity only, no ordering semantics beyond
    /// uniqueness.
    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn workspace_id(&self) -> u64 {
        self.workspace_id
    }
}

impl Drop for SyntheticDocument {
    fn drop(&mut self) {
        tracing::trace!(stamp = self.stamp, "synthetic document discarded");
        self.host.discard(self.handle);
    }
}

impl std::fmt::Debug for SyntheticDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticDocument")
            .field("handle", &self.handle)
            .field("language", &self.language.id())
            .field("stamp", &self.stamp)
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

/// Builds throwaway in-memory documents for preview tabs.
#[derive(Clone)]
pub struct SyntheticDocumentFactory {
    host: Rc<dyn DocumentHost>,
}

impl SyntheticDocumentFactory {
    pub fn new(host: Rc<dyn DocumentHost>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Rc<dyn DocumentHost> {
        &self.host
    }

    /// Always succeeds for a valid workspace; empty text is allowed. Each
    /// call yields a document with a fresh identity so the formatter never
    /// confuses two preview instances.
    pub fn create(
        &self,
        workspace: &WorkspaceHandle,
        language: &Language,
        text: &str,
    ) -> SyntheticDocument {
        let handle = self.host.create_document(language.file_kind(), text);
        let stamp = NEXT_STAMP.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            stamp,
            language = language.id(),
            workspace = workspace.id(),
            "synthetic document created"
        );
        SyntheticDocument {
            handle,
            host: Rc::clone(&self.host),
            language: language.clone(),
            stamp,
            workspace_id: workspace.id(),
        }
    }
}

#[derive(Debug, Default)]
struct BufferRecord {
    pending: String,
    committed: String,
}

/// Default single-threaded document host backing previews with plain string
/// buffers.
#[derive(Default)]
pub struct InMemoryDocumentHost {
    buffers: RefCell<HashMap<u64, BufferRecord>>,
    next_handle: std::cell::Cell<u64>,
}

impl InMemoryDocumentHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn live_buffers(&self) -> usize {
        self.buffers.borrow().len()
    }
}

impl DocumentHost for InMemoryDocumentHost {
    fn create_document(&self, file_kind: &FileKind, text: &str) -> DocumentHandle {
        let id = self.next_handle.get();
        self.next_handle.set(id + 1);
        tracing::trace!(id, file_kind = file_kind.id(), "document buffer created");
        self.buffers.borrow_mut().insert(
            id,
            BufferRecord {
                pending: text.to_string(),
                committed: text.to_string(),
            },
        );
        DocumentHandle(id)
    }

    fn replace_content(&self, handle: DocumentHandle, text: &str) {
        if let Some(record) = self.buffers.borrow_mut().get_mut(&handle.0) {
            record.pending = text.to_string();
        }
    }

    fn commit(&self, handle: DocumentHandle) {
        if let Some(record) = self.buffers.borrow_mut().get_mut(&handle.0) {
            record.committed = record.pending.clone();
        }
    }

    fn committed_text(&self, handle: DocumentHandle) -> String {
        self.buffers
            .borrow()
            .get(&handle.0)
            .map(|record| record.committed.clone())
            .unwrap_or_default()
    }

    fn discard(&self, handle: DocumentHandle) {
        self.buffers.borrow_mut().remove(&handle.0);
    }
}
