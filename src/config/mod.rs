use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "stylepane";
const APP_CONFIG_FILE: &str = "config.json";

/// Panel-level settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PreviewConfig {
    /// Overrides the directory the shared formatting workspace allocates its
    /// backing temp storage under.
    #[serde(default)]
    pub(crate) workspace_dir: Option<PathBuf>,
    /// Overrides the file-kind id used when no language is registered.
    #[serde(default)]
    pub(crate) fallback_file_kind: Option<String>,
}

pub(crate) fn load_preview_config() -> PreviewConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_preview_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_preview_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> PreviewConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return PreviewConfig::default(),
    };
    if !path.exists() {
        return PreviewConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            PreviewConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            PreviewConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "stylepane",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/stylepane/config.json"));
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path("stylepane", "config.json", None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/home/.config/stylepane/config.json")
        );
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("stylepane", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn malformed_config_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp config root");
        let app_dir = dir.path().join("stylepane");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.json"), "{not json").unwrap();

        let config = load_preview_config_with(Some(dir.path()), None);
        assert!(config.workspace_dir.is_none());
        assert!(config.fallback_file_kind.is_none());
    }

    #[test]
    fn config_file_overrides_are_deserialized() {
        let dir = tempfile::tempdir().expect("temp config root");
        let app_dir = dir.path().join("stylepane");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(
            app_dir.join("config.json"),
            r#"{"workspace_dir":"/tmp/previews","fallback_file_kind":"markdown"}"#,
        )
        .unwrap();

        let config = load_preview_config_with(Some(dir.path()), None);
        assert_eq!(config.workspace_dir, Some(PathBuf::from("/tmp/previews")));
        assert_eq!(config.fallback_file_kind.as_deref(), Some("markdown"));
    }
}
