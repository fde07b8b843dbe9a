use crate::document::SyntheticDocument;
use crate::error::PanelResult;
use crate::language::Language;

use super::widget::PreviewWidget;

/// Live editor widget bound to the synthetic document it renders. Dropping
/// the pair discards the document buffer along with the widget.
pub struct LivePreview {
    widget: Box<dyn PreviewWidget>,
    document: SyntheticDocument,
}

impl LivePreview {
    pub fn new(widget: Box<dyn PreviewWidget>, document: SyntheticDocument) -> Self {
        Self { widget, document }
    }

    pub fn document(&self) -> &SyntheticDocument {
        &self.document
    }

    pub fn widget_mut(&mut self) -> &mut dyn PreviewWidget {
        self.widget.as_mut()
    }
}

/// Builds a live preview for one language: sample text, fresh synthetic
/// document, reformat pass, fresh widget.
pub trait LivePreviewFactory {
    fn create_live(&self, language: &Language) -> PanelResult<LivePreview>;
}

enum TabSlot {
    Placeholder,
    Live(LivePreview),
}

/// One tab of the strip: a language plus either an inert placeholder or the
/// single live preview widget.
pub struct TabBinding {
    language: Language,
    slot: TabSlot,
}

impl TabBinding {
    fn placeholder(language: Language) -> Self {
        Self {
            language,
            slot: TabSlot::Placeholder,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn is_live(&self) -> bool {
        matches!(self.slot, TabSlot::Live(_))
    }
}

enum TabStripState {
    Uninitialized,
    Populated {
        tabs: Vec<TabBinding>,
        active_index: usize,
    },
}

/// State machine over the language tab strip.
///
/// `Uninitialized` until populated with at least one language; from then on
/// exactly one tab holds the live preview widget and `active_index` is always
/// in range. A zero-language environment is a degenerate no-preview state,
/// not an error: the controller simply stays `Uninitialized`.
pub struct PreviewTabController {
    state: TabStripState,
}

impl PreviewTabController {
    pub fn new() -> Self {
        Self {
            state: TabStripState::Uninitialized,
        }
    }

    /// Builds one tab per language in enumeration order, all placeholders,
    /// then activates index 0 with a live widget. No-op for an empty
    /// enumeration.
    pub fn populate(&mut self, languages: Vec<Language>, binder: &dyn LivePreviewFactory) {
        if languages.is_empty() {
            tracing::debug!("no languages with style settings; tab strip stays empty");
            return;
        }
        tracing::debug!(tabs = languages.len(), "populating language tab strip");
        let tabs = languages.into_iter().map(TabBinding::placeholder).collect();
        self.state = TabStripState::Populated {
            tabs,
            active_index: 0,
        };
        self.promote(0, binder);
    }

    /// Swaps the live widget over to `index`: the previous active tab falls
    /// back to a placeholder (discarding its widget and document) and the
    /// target tab gets a freshly bound live preview. Returns the newly
    /// selected language for the host panel. Re-selecting the active index is
    /// observably idempotent. Out-of-range indices are ignored.
    pub fn select_tab(
        &mut self,
        index: usize,
        binder: &dyn LivePreviewFactory,
    ) -> Option<Language> {
        let TabStripState::Populated { tabs, active_index } = &mut self.state else {
            tracing::warn!(index, "tab selected before the strip was populated");
            return None;
        };
        if index >= tabs.len() {
            tracing::warn!(index, tabs = tabs.len(), "tab index out of range");
            return None;
        }

        let previous = *active_index;
        tabs[previous].slot = TabSlot::Placeholder;
        *active_index = index;
        tracing::debug!(
            from = previous,
            to = index,
            language = tabs[index].language.id(),
            "active preview tab changed"
        );
        self.promote(index, binder);
        self.active_language().cloned()
    }

    /// Re-derives the active tab from the given selection by display name and
    /// selects it; used when the panel becomes visible again so the strip
    /// reflects selection changes made while hidden. When no tab matches, the
    /// active tab is deliberately left unchanged.
    pub fn sync_active_tab(
        &mut self,
        selected: &Language,
        binder: &dyn LivePreviewFactory,
    ) -> Option<Language> {
        let TabStripState::Populated { tabs, .. } = &self.state else {
            return None;
        };
        let matched = tabs
            .iter()
            .position(|tab| tab.language.display_name() == selected.display_name());
        match matched {
            Some(index) => self.select_tab(index, binder),
            None => {
                tracing::debug!(
                    language = selected.id(),
                    "no tab matches the selected language; keeping the active tab"
                );
                None
            }
        }
    }

    /// Recreates the active tab's widget and document, re-running the
    /// reformat cycle. This is the settings-change refresh path.
    pub fn rebind_active(&mut self, binder: &dyn LivePreviewFactory) {
        if let TabStripState::Populated { active_index, .. } = self.state {
            self.promote(active_index, binder);
        }
    }

    /// Drops every tab binding, widget, and synthetic document.
    pub fn clear(&mut self) {
        if self.is_populated() {
            tracing::debug!("clearing language tab strip");
        }
        self.state = TabStripState::Uninitialized;
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.state, TabStripState::Populated { .. })
    }

    pub fn tab_count(&self) -> usize {
        match &self.state {
            TabStripState::Uninitialized => 0,
            TabStripState::Populated { tabs, .. } => tabs.len(),
        }
    }

    pub fn tabs(&self) -> &[TabBinding] {
        match &self.state {
            TabStripState::Uninitialized => &[],
            TabStripState::Populated { tabs, .. } => tabs,
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        match &self.state {
            TabStripState::Uninitialized => None,
            TabStripState::Populated { active_index, .. } => Some(*active_index),
        }
    }

    pub fn active_language(&self) -> Option<&Language> {
        match &self.state {
            TabStripState::Uninitialized => None,
            TabStripState::Populated { tabs, active_index } => {
                Some(tabs[*active_index].language())
            }
        }
    }

    pub fn active_preview_mut(&mut self) -> Option<&mut LivePreview> {
        match &mut self.state {
            TabStripState::Uninitialized => None,
            TabStripState::Populated { tabs, active_index } => {
                match &mut tabs[*active_index].slot {
                    TabSlot::Live(live) => Some(live),
                    TabSlot::Placeholder => None,
                }
            }
        }
    }

    // Binds a fresh live preview at `index`, replacing whatever the slot
    // held. A binding failure leaves the slot as a placeholder: the preview
    // stays disabled until the workspace comes back, but the strip keeps
    // working.
    fn promote(&mut self, index: usize, binder: &dyn LivePreviewFactory) {
        let TabStripState::Populated { tabs, .. } = &mut self.state else {
            return;
        };
        match binder.create_live(&tabs[index].language) {
            Ok(live) => tabs[index].slot = TabSlot::Live(live),
            Err(err) => {
                tracing::error!(
                    ?err,
                    language = tabs[index].language.id(),
                    "failed to bind live preview; tab falls back to a placeholder"
                );
                tabs[index].slot = TabSlot::Placeholder;
            }
        }
    }
}

impl Default for PreviewTabController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl PreviewTabController {
    fn live_widget_count(&self) -> usize {
        self.tabs().iter().filter(|tab| tab.is_live()).count()
    }
}
