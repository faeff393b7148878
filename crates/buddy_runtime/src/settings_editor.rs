//! Settings panel state: editable draft, wholesale save, and shortcut recording.

use buddy_host::{AppSettings, BridgeError};
use leptos::{
    create_rw_signal, logging, RwSignal, SignalGet, SignalGetUntracked, SignalSet, SignalUpdate,
};
use thiserror::Error;

use crate::{
    accelerator::{KeyInput, RecorderEvent, ShortcutRecorder},
    store::HistoryStore,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a settings save did not reach the backend or was rejected.
pub enum SettingsEditorError {
    /// No record has been loaded into the draft yet.
    #[error("settings are not loaded")]
    NotLoaded,
    /// A previous save has not settled.
    #[error("a settings save is already in progress")]
    SaveInFlight,
    /// The bridge call failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

#[derive(Clone)]
/// Draft of the backend settings record being edited.
pub struct SettingsEditor {
    store: HistoryStore,
    draft: RwSignal<Option<AppSettings>>,
    saving: RwSignal<bool>,
    recorder: RwSignal<ShortcutRecorder>,
}

impl SettingsEditor {
    /// Creates an editor with no draft. Must be called inside a reactive runtime.
    pub fn new(store: HistoryStore) -> Self {
        Self {
            store,
            draft: create_rw_signal(None),
            saving: create_rw_signal(false),
            recorder: create_rw_signal(ShortcutRecorder::default()),
        }
    }

    /// Loads the current record into the draft.
    pub async fn open(&self) -> Result<(), BridgeError> {
        let bridge = self.store.bridge();
        let settings = bridge
            .get_settings()
            .await
            .inspect_err(|err| logging::warn!("settings load failed: {err}"))?;
        self.draft.set(Some(settings));
        Ok(())
    }

    /// Current draft (tracked read).
    pub fn draft(&self) -> Option<AppSettings> {
        self.draft.get()
    }

    /// Returns whether a save is in flight (tracked read).
    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    /// Applies a field edit to the draft. Ignored before the draft is loaded.
    pub fn edit(&self, edit: impl FnOnce(&mut AppSettings)) {
        self.draft.update(|draft| {
            if let Some(draft) = draft.as_mut() {
                edit(draft);
            }
        });
    }

    /// Writes the whole draft to the backend.
    ///
    /// On success the draft is replaced by the stored record and its language is handed to the
    /// history store.
    pub async fn save(&self) -> Result<AppSettings, SettingsEditorError> {
        let draft = self
            .draft
            .get_untracked()
            .ok_or(SettingsEditorError::NotLoaded)?;
        if self.saving.get_untracked() {
            return Err(SettingsEditorError::SaveInFlight);
        }

        self.saving.set(true);
        let bridge = self.store.bridge();
        let result = bridge.update_settings(&draft).await;
        self.saving.set(false);

        let stored = result.inspect_err(|err| logging::warn!("settings save failed: {err}"))?;
        match stored.display_language() {
            Some(language) => self.store.adopt_language(language),
            None => logging::warn!("ignoring unknown display language `{}`", stored.language),
        }
        self.draft.set(Some(stored.clone()));
        Ok(stored)
    }

    /// Starts recording a global shortcut.
    pub fn start_recording(&self) {
        self.recorder.update(ShortcutRecorder::start);
    }

    /// Returns whether a shortcut is being recorded (tracked read).
    pub fn is_recording(&self) -> bool {
        self.recorder.get().is_recording()
    }

    /// Routes a key-down to the recorder; a captured accelerator is written to the draft.
    pub fn key_down(&self, input: &KeyInput) -> RecorderEvent {
        let mut recorder = self.recorder.get_untracked();
        let event = recorder.key_down(input);
        self.recorder.set(recorder);
        if let RecorderEvent::Captured(accelerator) = &event {
            let accelerator = accelerator.clone();
            self.edit(move |draft| draft.global_shortcut = accelerator);
        }
        event
    }

    /// Routes a key-up to the recorder.
    pub fn key_up(&self, input: &KeyInput) -> RecorderEvent {
        let mut recorder = self.recorder.get_untracked();
        let event = recorder.key_up(input);
        self.recorder.set(recorder);
        event
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use buddy_host::{BridgeCommand, Language, MemoryCommandBridge, PathFormat};
    use futures::executor::{block_on, LocalPool};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::pool_spawner;

    fn editor(bridge: &MemoryCommandBridge) -> (SettingsEditor, HistoryStore) {
        let store = HistoryStore::new(Rc::new(bridge.clone()));
        (SettingsEditor::new(store.clone()), store)
    }

    #[test]
    fn save_writes_whole_record_and_adopts_language() {
        let _ = leptos::create_runtime();
        let bridge = MemoryCommandBridge::new();
        let (editor, store) = editor(&bridge);
        block_on(editor.open()).expect("open");

        editor.edit(|draft| {
            draft.language = "en".to_string();
            draft.path_format = PathFormat::Wsl;
            draft.max_text_entries = 250;
        });
        let stored = block_on(editor.save()).expect("save");

        assert_eq!(bridge.settings(), stored);
        assert_eq!(bridge.settings().path_format, PathFormat::Wsl);
        assert_eq!(bridge.settings().max_text_entries, 250);
        assert_eq!(store.snapshot().language, Language::En);
        assert!(!editor.is_saving());
    }

    #[test]
    fn failed_save_keeps_draft_and_language() {
        let _ = leptos::create_runtime();
        let bridge = MemoryCommandBridge::new();
        let (editor, store) = editor(&bridge);
        block_on(editor.open()).expect("open");
        bridge.fail(
            BridgeCommand::UpdateSettings,
            BridgeError::Backend("invalid shortcut".to_string()),
        );

        editor.edit(|draft| draft.language = "en".to_string());
        let err = block_on(editor.save()).expect_err("rejected");

        assert!(matches!(err, SettingsEditorError::Bridge(_)));
        assert_eq!(editor.draft().map(|draft| draft.language), Some("en".to_string()));
        assert_eq!(store.snapshot().language, Language::Ko);
        assert!(!editor.is_saving());
    }

    #[test]
    fn save_before_open_is_rejected() {
        let _ = leptos::create_runtime();
        let bridge = MemoryCommandBridge::new();
        let (editor, _) = editor(&bridge);
        assert_eq!(block_on(editor.save()), Err(SettingsEditorError::NotLoaded));
        assert_eq!(bridge.call_count(BridgeCommand::UpdateSettings), 0);
    }

    #[test]
    fn second_save_while_first_is_pending_is_rejected() {
        let _ = leptos::create_runtime();
        let mut pool = LocalPool::new();
        let spawner = pool_spawner(&pool);
        let bridge = MemoryCommandBridge::new();
        let (editor, _) = editor(&bridge);
        block_on(editor.open()).expect("open");

        let gate = bridge.hold_responses();
        let first = editor.clone();
        spawner.spawn(async move {
            let _ = first.save().await;
        });
        pool.run_until_stalled();
        assert!(editor.is_saving());
        assert_eq!(
            block_on(editor.save()),
            Err(SettingsEditorError::SaveInFlight)
        );

        gate.release();
        pool.run_until_stalled();
        assert!(!editor.is_saving());
        assert_eq!(bridge.call_count(BridgeCommand::UpdateSettings), 1);
    }

    #[test]
    fn recorded_shortcut_lands_in_draft() {
        let _ = leptos::create_runtime();
        let bridge = MemoryCommandBridge::new();
        let (editor, _) = editor(&bridge);
        block_on(editor.open()).expect("open");

        editor.start_recording();
        assert_eq!(
            editor.key_down(&KeyInput::new("Alt").alt()),
            RecorderEvent::Pending
        );
        assert_eq!(
            editor.key_down(&KeyInput::new("c").ctrl().alt()),
            RecorderEvent::Captured("Ctrl+Alt+C".to_string())
        );
        assert!(!editor.is_recording());
        assert_eq!(
            editor.draft().map(|draft| draft.global_shortcut),
            Some("Ctrl+Alt+C".to_string())
        );
    }

    #[test]
    fn escape_release_leaves_shortcut_unchanged() {
        let _ = leptos::create_runtime();
        let bridge = MemoryCommandBridge::new();
        let (editor, _) = editor(&bridge);
        block_on(editor.open()).expect("open");

        editor.start_recording();
        editor.key_down(&KeyInput::new("Escape"));
        assert_eq!(
            editor.key_up(&KeyInput::new("Escape")),
            RecorderEvent::Cancelled
        );
        assert_eq!(
            editor.draft().map(|draft| draft.global_shortcut),
            Some(buddy_host::DEFAULT_GLOBAL_SHORTCUT.to_string())
        );
    }
}
