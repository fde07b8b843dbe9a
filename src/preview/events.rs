use crate::language::Language;

/// Notifications published to panel subscribers, replacing ad-hoc widget
/// toolkit listeners with an explicit subscription surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// The active tab (and the shared language selection) changed.
    LanguageSelected(Language),
    /// The tab strip was re-synced to the shared selection after the panel
    /// became visible again.
    Resynced,
}
