//! Backend-owned settings record and its typed fields.
//!
//! The record is fetched on demand and written back wholesale; there is no partial-field update
//! protocol.

use serde::{Deserialize, Serialize};

/// Accelerator used when the backend has none configured.
pub const DEFAULT_GLOBAL_SHORTCUT: &str = "Alt+Shift+V";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Mutable application configuration owned by the backend.
pub struct AppSettings {
    /// Directory screenshots are written to.
    pub save_directory: String,
    /// Clipboard polling interval of the backend watcher.
    pub polling_interval_ms: u64,
    /// Copy the saved file path to the clipboard right after a capture.
    pub auto_copy_path: bool,
    /// Retention cap for stored screenshots.
    pub max_screenshots: u32,
    /// Retention cap for copied-text entries.
    pub max_text_entries: u32,
    /// Launch on login.
    pub auto_start: bool,
    /// Thumbnail edge length in pixels.
    pub thumbnail_size: u32,
    /// Display language code (`ko` or `en`).
    pub language: String,
    /// Path style used when copying file paths.
    pub path_format: PathFormat,
    /// Accelerator registered as the global popup hotkey.
    pub global_shortcut: String,
    /// Whether copied text is captured into history.
    pub text_capture_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            save_directory: String::new(),
            polling_interval_ms: 500,
            auto_copy_path: true,
            max_screenshots: 100,
            max_text_entries: 100,
            auto_start: false,
            thumbnail_size: 200,
            language: Language::Ko.code().to_string(),
            path_format: PathFormat::Windows,
            global_shortcut: DEFAULT_GLOBAL_SHORTCUT.to_string(),
            text_capture_enabled: true,
        }
    }
}

impl AppSettings {
    /// Returns the typed display language, or `None` for an unknown code.
    pub fn display_language(&self) -> Option<Language> {
        Language::from_code(&self.language)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// UI display language.
pub enum Language {
    /// Korean.
    #[default]
    Ko,
    /// English.
    En,
}

impl Language {
    /// Returns the settings code for this language.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
        }
    }

    /// Parses a settings language code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "ko" => Some(Self::Ko),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Path style used for copied screenshot paths.
pub enum PathFormat {
    /// `C:\Users\...` style.
    #[default]
    Windows,
    /// `/mnt/c/Users/...` style.
    Wsl,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn older_backend_record_fills_missing_fields_with_defaults() {
        let raw = json!({
            "save_directory": "C:/Pictures/CLIBuddy",
            "polling_interval_ms": 750,
            "auto_copy_path": false,
            "max_screenshots": 50,
            "auto_start": true,
            "thumbnail_size": 160,
            "language": "en",
            "path_format": "wsl"
        });

        let settings: AppSettings = serde_json::from_value(raw).expect("decode");
        assert_eq!(settings.polling_interval_ms, 750);
        assert_eq!(settings.path_format, PathFormat::Wsl);
        assert_eq!(settings.global_shortcut, DEFAULT_GLOBAL_SHORTCUT);
        assert!(settings.text_capture_enabled);
        assert_eq!(settings.display_language(), Some(Language::En));
    }

    #[test]
    fn unknown_language_code_is_not_adopted() {
        let settings = AppSettings {
            language: "fr".to_string(),
            ..AppSettings::default()
        };
        assert_eq!(settings.display_language(), None);
    }
}
