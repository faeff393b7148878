//! View-level models shared by the gallery and popup surfaces.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which gallery view is active. UI projection only; never persisted.
pub enum FilterMode {
    /// Screenshots and copied text.
    #[default]
    All,
    /// Screenshots only.
    Images,
    /// Copied text only.
    Text,
    /// Developer-tools view; lists no history items.
    Diagnostics,
}

impl FilterMode {
    /// Returns whether screenshots are listed in this mode.
    pub const fn shows_images(self) -> bool {
        matches!(self, Self::All | Self::Images)
    }

    /// Returns whether copied text is listed in this mode.
    pub const fn shows_texts(self) -> bool {
        matches!(self, Self::All | Self::Text)
    }
}

const DISPLAY_FORMAT: &str = "%m/%d %H:%M";
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Formats a backend timestamp as `MM/dd HH:mm`, falling back to the raw text.
///
/// Offsets are kept as reported; the backend stamps entries in the user's local time.
pub fn display_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(DISPLAY_FORMAT).to_string();
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|parsed| parsed.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}
