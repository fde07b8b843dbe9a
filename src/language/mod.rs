const FALLBACK_FILE_KIND_ID: &str = "text";
const FALLBACK_FILE_KIND_EXTENSION: &str = "txt";

/// File kind associated with a language, used to pick a syntax highlighter
/// for the preview editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKind {
    id: String,
    extension: String,
}

impl FileKind {
    pub fn new(id: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extension: extension.into(),
        }
    }

    /// Plain-text kind used when no language is registered at all.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_FILE_KIND_ID, FALLBACK_FILE_KIND_EXTENSION)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    id: String,
    display_name: String,
    file_kind: FileKind,
}

impl Language {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        file_kind: FileKind,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            file_kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn file_kind(&self) -> &FileKind {
        &self.file_kind
    }
}

/// Which group of style settings the panel is previewing. The sample text
/// the provider returns is specific to the category so the preview exercises
/// the settings being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsCategory {
    BlankLines,
    Spacing,
    WrappingAndBraces,
    Indentation,
    LanguageSpecific,
}

/// External style-settings provider. Supplies the set of languages that have
/// style settings, sample code per language and category, and display-name
/// lookup for tab-title matching.
pub trait StyleSettingsProvider {
    /// Ordered enumeration of languages with code style settings. The order
    /// is the tab order and must be stable for a session.
    fn supported_languages(&self) -> Vec<Language>;

    fn sample_text(&self, language: &Language, category: SettingsCategory) -> String;

    fn language_by_display_name(&self, name: &str) -> Option<Language> {
        self.supported_languages()
            .into_iter()
            .find(|language| language.display_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoLanguageProvider;

    impl StyleSettingsProvider for TwoLanguageProvider {
        fn supported_languages(&self) -> Vec<Language> {
            vec![
                Language::new("python", "Python", FileKind::new("python", "py")),
                Language::new("go", "Go", FileKind::new("go", "go")),
            ]
        }

        fn sample_text(&self, language: &Language, _category: SettingsCategory) -> String {
            format!("sample for {}", language.id())
        }
    }

    #[test]
    fn fallback_file_kind_is_plain_text() {
        let kind = FileKind::fallback();
        assert_eq!(kind.id(), "text");
        assert_eq!(kind.extension(), "txt");
    }

    #[test]
    fn language_by_display_name_matches_exact_titles_only() {
        let provider = TwoLanguageProvider;
        let go = provider.language_by_display_name("Go").unwrap();
        assert_eq!(go.id(), "go");
        assert!(provider.language_by_display_name("go").is_none());
        assert!(provider.language_by_display_name("Rust").is_none());
    }
}
