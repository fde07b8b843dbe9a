use std::rc::Rc;
use std::sync::Arc;

use crate::config;
use crate::document::{DocumentHost, SyntheticDocumentFactory};
use crate::error::PanelResult;
use crate::language::{FileKind, Language, SettingsCategory, StyleSettingsProvider};
use crate::reformat::{FormatEngine, ReformatExecutor};
use crate::workspace::PreviewSession;

use super::events::PreviewEvent;
use super::tabs::{LivePreview, LivePreviewFactory, PreviewTabController};
use super::widget::WidgetHost;

/// Wires one language to a ready-to-show live preview: fetch the sample text
/// for the panel's settings category, create a fresh synthetic document, run
/// the reformat cycle, and push the result into a fresh widget.
pub struct PreviewBinder {
    session: Arc<PreviewSession>,
    provider: Rc<dyn StyleSettingsProvider>,
    factory: SyntheticDocumentFactory,
    executor: ReformatExecutor,
    widgets: Rc<dyn WidgetHost>,
    category: SettingsCategory,
}

impl LivePreviewFactory for PreviewBinder {
    fn create_live(&self, language: &Language) -> PanelResult<LivePreview> {
        let workspace = self.session.current()?;
        let sample = self.provider.sample_text(language, self.category);
        let document = self.factory.create(&workspace, language, &sample);
        let text = self.executor.reformat(&self.session, &document)?;

        let mut widget = self.widgets.create_preview_widget();
        widget.set_file_kind(language.file_kind());
        widget.set_text(&text);
        Ok(LivePreview::new(widget, document))
    }
}

/// Top-level facade composing the shared session, the tab strip, and the
/// reformat pipeline into one multi-language style-preview panel.
///
/// Several panels may be open at once; they all share the injected
/// [`PreviewSession`], so the heavyweight formatting workspace exists exactly
/// while at least one of them is open.
pub struct LanguagePreviewPanel {
    session: Arc<PreviewSession>,
    provider: Rc<dyn StyleSettingsProvider>,
    binder: PreviewBinder,
    tabs: PreviewTabController,
    subscribers: Vec<Box<dyn FnMut(&PreviewEvent)>>,
    fallback_kind: FileKind,
    open: bool,
}

impl LanguagePreviewPanel {
    pub fn new(
        session: Arc<PreviewSession>,
        provider: Rc<dyn StyleSettingsProvider>,
        documents: Rc<dyn DocumentHost>,
        engine: Rc<dyn FormatEngine>,
        widgets: Rc<dyn WidgetHost>,
        category: SettingsCategory,
    ) -> Self {
        let fallback_kind = config::load_preview_config()
            .fallback_file_kind
            .map(|kind| FileKind::new(kind.clone(), kind))
            .unwrap_or_else(FileKind::fallback);
        let binder = PreviewBinder {
            session: Arc::clone(&session),
            provider: Rc::clone(&provider),
            factory: SyntheticDocumentFactory::new(Rc::clone(&documents)),
            executor: ReformatExecutor::new(documents, engine),
            widgets,
            category,
        };
        Self {
            session,
            provider,
            binder,
            tabs: PreviewTabController::new(),
            subscribers: Vec::new(),
            fallback_kind,
            open: false,
        }
    }

    /// Acquires the shared workspace and builds the tab strip. With no
    /// language selected yet, the first registered language becomes the
    /// selection; an empty registry is the degenerate no-preview state.
    pub fn open(&mut self) {
        if self.open {
            tracing::warn!("panel opened twice; ignoring");
            return;
        }
        self.session.acquire();
        self.open = true;

        let languages = self.provider.supported_languages();
        self.tabs.populate(languages.clone(), &self.binder);
        match self.session.selected_language() {
            None => {
                if let Some(first) = languages.into_iter().next() {
                    self.set_language(first);
                }
            }
            Some(selected) => {
                self.tabs.sync_active_tab(&selected, &self.binder);
            }
        }
    }

    /// Updates the shared language selection, re-syncs the tab strip, and
    /// refreshes the preview.
    pub fn set_language(&mut self, language: Language) {
        self.session.set_selected_language(language.clone());
        let synced = if self.tabs.is_populated() {
            self.tabs.sync_active_tab(&language, &self.binder).is_some()
        } else {
            false
        };
        if !synced {
            // No matching tab (or strip hidden): still refresh whatever is
            // showing so a settings change is never silently stale.
            self.refresh_preview();
        }
        self.emit(PreviewEvent::LanguageSelected(language));
    }

    /// Host hook for tab-strip clicks. Swaps the live widget to `index` and
    /// propagates the newly selected language into the shared selection.
    pub fn tab_selected(&mut self, index: usize) {
        if let Some(language) = self.tabs.select_tab(index, &self.binder) {
            self.session.set_selected_language(language.clone());
            self.emit(PreviewEvent::LanguageSelected(language));
        }
    }

    /// Recreates the active tab's document and widget and re-runs the
    /// reformat cycle. Style-settings editors call this on every change.
    pub fn refresh_preview(&mut self) {
        self.tabs.rebind_active(&self.binder);
    }

    /// Host hook for when the panel becomes visible again: the tab strip is
    /// re-synced to selection changes made while it was hidden.
    pub fn visibility_regained(&mut self) {
        if let Some(selected) = self.session.selected_language() {
            self.tabs.sync_active_tab(&selected, &self.binder);
        }
        self.emit(PreviewEvent::Resynced);
    }

    /// Drops all tab bindings and releases the shared workspace.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.tabs.clear();
        self.session.release();
        self.open = false;
    }

    /// File kind for syntax highlighting: the selected language's kind, then
    /// the first registered language's kind, then the fallback kind. Never
    /// empty; downstream highlighting depends on that.
    pub fn current_file_kind(&self) -> FileKind {
        if let Some(selected) = self.session.selected_language() {
            return selected.file_kind().clone();
        }
        if let Some(first) = self.provider.supported_languages().into_iter().next() {
            return first.file_kind().clone();
        }
        self.fallback_kind.clone()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&PreviewEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn tabs(&self) -> &PreviewTabController {
        &self.tabs
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn emit(&mut self, event: PreviewEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
    }
}
