mod events;
mod panel;
mod tabs;
mod widget;

pub use events::PreviewEvent;
pub use panel::{LanguagePreviewPanel, PreviewBinder};
pub use tabs::{LivePreview, LivePreviewFactory, PreviewTabController, TabBinding};
pub use widget::{PreviewWidget, WidgetHost};
