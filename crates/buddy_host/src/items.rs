//! Clipboard history item models reported by the backend.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Captured screenshot as listed by the backend.
pub struct ImageItem {
    /// File name inside the save directory; unique key within the image collection.
    pub filename: String,
    /// Absolute path of the stored PNG.
    pub path: String,
    /// Inline preview payload (data URL).
    pub thumbnail: String,
    /// Capture timestamp exactly as reported by the backend.
    pub created_at: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Copied text captured by the backend clipboard watcher.
pub struct TextItem {
    /// Unique key within the text collection.
    pub id: String,
    /// Full copied text.
    pub content: String,
    /// Truncated single-line preview.
    pub preview: String,
    /// Backend content hash used for its own de-duplication.
    pub hash: String,
    /// Capture timestamp exactly as reported by the backend.
    pub created_at: String,
    /// Character count of `content`.
    pub char_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Discriminant for the two history collections.
pub enum ItemKind {
    /// Screenshot collection.
    Image,
    /// Copied-text collection.
    Text,
}

impl ItemKind {
    /// Returns the stable wire token used by `paste_from_history`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
/// One row of the merged history list used where both kinds are listed together.
pub enum ClipboardEntry {
    /// Screenshot row.
    Image(ImageItem),
    /// Copied-text row.
    Text(TextItem),
}

impl ClipboardEntry {
    /// Returns which collection this entry belongs to.
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Image(_) => ItemKind::Image,
            Self::Text(_) => ItemKind::Text,
        }
    }

    /// Returns the entry key (`filename` for images, `id` for text).
    pub fn key(&self) -> &str {
        match self {
            Self::Image(item) => &item.filename,
            Self::Text(item) => &item.id,
        }
    }

    /// Returns the raw creation timestamp.
    pub fn created_at(&self) -> &str {
        match self {
            Self::Image(item) => &item.created_at,
            Self::Text(item) => &item.created_at,
        }
    }

    /// Returns the single-line label shown in list rows.
    pub fn label(&self) -> &str {
        match self {
            Self::Image(item) => &item.filename,
            Self::Text(item) => &item.preview,
        }
    }

    /// Returns the `paste_from_history` payload: text content or image path, plus kind.
    pub fn paste_payload(&self) -> (&str, ItemKind) {
        match self {
            Self::Image(item) => (&item.path, ItemKind::Image),
            Self::Text(item) => (&item.content, ItemKind::Text),
        }
    }
}

impl From<ImageItem> for ClipboardEntry {
    fn from(item: ImageItem) -> Self {
        Self::Image(item)
    }
}

impl From<TextItem> for ClipboardEntry {
    fn from(item: TextItem) -> Self {
        Self::Text(item)
    }
}
