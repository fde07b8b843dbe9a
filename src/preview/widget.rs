use crate::language::FileKind;

/// Rendering surface for the active tab's preview. The panel only pushes
/// state into it; drawing belongs entirely to the host toolkit.
pub trait PreviewWidget {
    fn set_text(&mut self, text: &str);
    /// Highlighter hint; downstream syntax highlighting relies on always
    /// getting a kind, hence the panel's non-null file-kind fallback.
    fn set_file_kind(&mut self, kind: &FileKind);
}

/// Visual widget host collaborator. Creates real preview widgets on demand;
/// inactive tabs are represented by placeholders on the panel side and need
/// no widget at all.
pub trait WidgetHost {
    fn create_preview_widget(&self) -> Box<dyn PreviewWidget>;
}
