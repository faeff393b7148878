//! History state, actions, and the transition function behind [`crate::store::HistoryStore`].

use buddy_host::{ClipboardEntry, ImageItem, ItemKind, Language, TextItem};

use crate::model::FilterMode;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Client-side view of the backend's clipboard history.
pub struct HistoryState {
    /// Screenshots, newest first.
    pub images: Vec<ImageItem>,
    /// Copied-text entries, newest first.
    pub texts: Vec<TextItem>,
    /// Active gallery view.
    pub filter: FilterMode,
    /// Last monitoring flag confirmed by the backend.
    pub monitoring: bool,
    /// True while a full load is in flight.
    pub loading: bool,
    /// Screenshot opened in the gallery preview.
    pub selected_image: Option<ImageItem>,
    /// Display language adopted from settings.
    pub language: Language,
}

impl HistoryState {
    /// Screenshots listed under the active filter.
    pub fn visible_images(&self) -> &[ImageItem] {
        if self.filter.shows_images() {
            &self.images
        } else {
            &[]
        }
    }

    /// Text entries listed under the active filter.
    pub fn visible_texts(&self) -> &[TextItem] {
        if self.filter.shows_texts() {
            &self.texts
        } else {
            &[]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Actions accepted by [`reduce_history`].
pub enum HistoryAction {
    /// A full load started.
    LoadStarted,
    /// A full load settled, successfully or not.
    LoadFinished,
    /// Replace the screenshot collection with a backend listing.
    ImagesLoaded(Vec<ImageItem>),
    /// Replace the text collection with a backend listing.
    TextsLoaded(Vec<TextItem>),
    /// An entry was created by the backend.
    Created(ClipboardEntry),
    /// An entry was deleted by the backend.
    Deleted {
        /// Collection the entry lived in.
        kind: ItemKind,
        /// `filename` or `id` of the entry.
        key: String,
    },
    /// Every text entry was removed by the backend.
    TextsCleared,
    /// Switch the gallery view.
    FilterChanged(FilterMode),
    /// Open or close the screenshot preview.
    SelectionChanged(Option<ImageItem>),
    /// Adopt the backend's monitoring flag.
    MonitoringChanged(bool),
    /// Adopt a display language.
    LanguageChanged(Language),
}

/// Applies `action` to `state`.
///
/// Created entries are prepended; an entry whose key is already present replaces the older one
/// so keys stay unique and the newest delivery sits at the front.
pub fn reduce_history(state: &mut HistoryState, action: HistoryAction) {
    match action {
        HistoryAction::LoadStarted => state.loading = true,
        HistoryAction::LoadFinished => state.loading = false,
        HistoryAction::ImagesLoaded(images) => state.images = images,
        HistoryAction::TextsLoaded(texts) => state.texts = texts,
        HistoryAction::Created(ClipboardEntry::Image(item)) => {
            state.images.retain(|existing| existing.filename != item.filename);
            state.images.insert(0, item);
        }
        HistoryAction::Created(ClipboardEntry::Text(item)) => {
            state.texts.retain(|existing| existing.id != item.id);
            state.texts.insert(0, item);
        }
        HistoryAction::Deleted {
            kind: ItemKind::Image,
            key,
        } => {
            state.images.retain(|item| item.filename != key);
            if state
                .selected_image
                .as_ref()
                .is_some_and(|selected| selected.filename == key)
            {
                state.selected_image = None;
            }
        }
        HistoryAction::Deleted {
            kind: ItemKind::Text,
            key,
        } => state.texts.retain(|item| item.id != key),
        HistoryAction::TextsCleared => state.texts.clear(),
        HistoryAction::FilterChanged(filter) => state.filter = filter,
        HistoryAction::SelectionChanged(selected) => state.selected_image = selected,
        HistoryAction::MonitoringChanged(monitoring) => state.monitoring = monitoring,
        HistoryAction::LanguageChanged(language) => state.language = language,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn image(name: &str, created_at: &str) -> ImageItem {
        ImageItem {
            filename: name.to_string(),
            path: format!("C:/shots/{name}"),
            thumbnail: String::new(),
            created_at: created_at.to_string(),
            size_bytes: 1,
        }
    }

    fn text(id: &str) -> TextItem {
        TextItem {
            id: id.to_string(),
            content: format!("content {id}"),
            preview: id.to_string(),
            hash: id.to_string(),
            created_at: String::new(),
            char_count: 1,
        }
    }

    fn image_names(state: &HistoryState) -> Vec<&str> {
        state.images.iter().map(|item| item.filename.as_str()).collect()
    }

    #[test]
    fn duplicate_created_entry_moves_to_front_once() {
        let mut state = HistoryState::default();
        reduce_history(
            &mut state,
            HistoryAction::ImagesLoaded(vec![image("b.png", "2"), image("a.png", "1")]),
        );
        reduce_history(
            &mut state,
            HistoryAction::Created(image("a.png", "3").into()),
        );
        assert_eq!(image_names(&state), vec!["a.png", "b.png"]);
        assert_eq!(state.images[0].created_at, "3");
    }

    #[test]
    fn deleting_selected_image_clears_selection() {
        let mut state = HistoryState::default();
        reduce_history(&mut state, HistoryAction::Created(image("a.png", "1").into()));
        reduce_history(
            &mut state,
            HistoryAction::SelectionChanged(Some(image("a.png", "1"))),
        );
        reduce_history(
            &mut state,
            HistoryAction::Deleted {
                kind: ItemKind::Image,
                key: "a.png".to_string(),
            },
        );
        assert!(state.images.is_empty());
        assert_eq!(state.selected_image, None);
    }

    #[test]
    fn deleting_absent_key_changes_nothing() {
        let mut state = HistoryState::default();
        reduce_history(&mut state, HistoryAction::Created(text("t1").into()));
        let before = state.clone();
        reduce_history(
            &mut state,
            HistoryAction::Deleted {
                kind: ItemKind::Text,
                key: "missing".to_string(),
            },
        );
        assert_eq!(state, before);
    }

    #[test]
    fn filter_projection_hides_without_dropping() {
        let mut state = HistoryState::default();
        reduce_history(&mut state, HistoryAction::FilterChanged(FilterMode::Images));
        reduce_history(&mut state, HistoryAction::Created(text("t1").into()));
        assert!(state.visible_texts().is_empty());
        assert_eq!(state.texts.len(), 1);

        reduce_history(&mut state, HistoryAction::FilterChanged(FilterMode::Text));
        assert_eq!(state.visible_texts().len(), 1);
    }
}
