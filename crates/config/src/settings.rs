// Editor settings
// Loaded from ~/.config/boxedit/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Text export
    #[serde(rename = "text.wordSpace")]
    pub word_space: i32,

    #[serde(rename = "text.paragraphIndent")]
    pub paragraph_indent: i32,

    // Symbol import
    #[serde(rename = "text.ligatures")]
    pub ligatures: Vec<String>,

    // Undo
    #[serde(rename = "history.limit")]
    pub history_limit: Option<usize>, // None = unlimited

    // Statistics
    #[serde(rename = "stats.showDeviation")]
    pub show_deviation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_space: 6,
            paragraph_indent: 15,
            ligatures: ["ffi", "ffl", "ff", "fi", "fl"].iter().map(|s| s.to_string()).collect(),
            history_limit: None,
            show_deviation: true,
        }
    }
}

const DEFAULT_CONFIG: &str = r#"{
    // Text export: gap that starts a new word, indent that starts a paragraph
    "text.wordSpace": 6,
    "text.paragraphIndent": 15,

    // Symbol import: sequences kept together as one symbol
    "text.ligatures": ["ffi", "ffl", "ff", "fi", "fl"],

    // Maximum undo steps per page (null = unlimited)
    "history.limit": null,

    // Show deviation column in statistics
    "stats.showDeviation": true
}
"#;

/// Drop lines starting with `//` so the file can carry comments.
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("boxedit");
        config_dir.join("settings.json")
    }

    /// Load settings from the default location, writing a commented default
    /// file on first run.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&strip_comments(&contents)) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {e}, using default settings", path.display());
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{} not found, using default settings", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("error reading {}: {e}, using default settings", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;

        fs::write(path, json).map_err(|e| e.to_string())
    }

    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("error creating config directory: {e}");
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
            log::warn!("error writing default settings.json: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_file_parses_to_defaults() {
        let parsed: Settings = serde_json::from_str(&strip_comments(DEFAULT_CONFIG)).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{\n  // wider words\n  \"text.wordSpace\": 9,\n  \"history.limit\": 50\n}\n").unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.word_space, 9);
        assert_eq!(settings.history_limit, Some(50));
        assert_eq!(settings.paragraph_indent, 15);
        assert_eq!(settings.ligatures.len(), 5);
    }

    #[test]
    fn broken_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(Settings::load_from(&dir.path().join("missing.json")), Settings::default());
    }

    #[test]
    fn save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            ligatures: vec!["st".into()],
            show_deviation: false,
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }
}
