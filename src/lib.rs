mod config;
pub mod document;
pub mod error;
pub mod language;
pub mod logging;
pub mod preview;
pub mod reformat;
pub mod workspace;

pub use document::{DocumentHandle, DocumentHost, SyntheticDocument, SyntheticDocumentFactory};
pub use error::{PanelError, PanelResult};
pub use language::{FileKind, Language, SettingsCategory, StyleSettingsProvider};
pub use preview::{
    LanguagePreviewPanel, PreviewEvent, PreviewTabController, PreviewWidget, WidgetHost,
};
pub use reformat::{FormatEngine, FormatRejected, ReformatExecutor};
pub use workspace::{PreviewSession, WorkspaceError, WorkspaceHandle, WorkspaceHost};
