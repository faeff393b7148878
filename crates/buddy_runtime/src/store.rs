//! Injectable clipboard-history store.
//!
//! [`HistoryStore`] owns one reactive [`HistoryState`] signal and is its only writer. Mutations
//! that need the backend are confirm-then-apply: the bridge call must succeed before local state
//! changes, and failures are logged and handed back to the caller for transient feedback.

use std::{cell::Cell, rc::Rc};

use buddy_host::{
    AppSettings, BridgeError, ClipboardEntry, CommandBridge, ImageItem, ItemKind, Language,
    TextItem,
};
use leptos::{
    create_rw_signal, logging, ReadSignal, RwSignal, SignalGetUntracked, SignalSet, SignalWith,
    SignalWithUntracked,
};

use crate::{
    history::{reduce_history, HistoryAction, HistoryState},
    model::FilterMode,
};

#[derive(Clone)]
/// Clipboard-history container bound to one [`CommandBridge`].
pub struct HistoryStore {
    bridge: Rc<dyn CommandBridge>,
    state: RwSignal<HistoryState>,
    alive: Rc<Cell<bool>>,
}

impl HistoryStore {
    /// Creates an empty store. Must be called inside a reactive runtime.
    pub fn new(bridge: Rc<dyn CommandBridge>) -> Self {
        Self {
            bridge,
            state: create_rw_signal(HistoryState::default()),
            alive: Rc::new(Cell::new(true)),
        }
    }

    /// Read-only state signal for views.
    pub fn state(&self) -> ReadSignal<HistoryState> {
        self.state.read_only()
    }

    /// Untracked copy of the current state.
    pub fn snapshot(&self) -> HistoryState {
        self.state.get_untracked()
    }

    /// Returns the bridge this store issues commands through.
    pub fn bridge(&self) -> Rc<dyn CommandBridge> {
        self.bridge.clone()
    }

    /// Returns whether [`HistoryStore::teardown`] has not been called.
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Stops the store; responses and events arriving afterwards are ignored.
    pub fn teardown(&self) {
        self.alive.set(false);
    }

    fn dispatch(&self, action: HistoryAction) {
        if !self.alive.get() {
            return;
        }
        let mut next = self.state.get_untracked();
        reduce_history(&mut next, action);
        if self.state.with_untracked(|current| *current != next) {
            self.state.set(next);
        }
    }

    /// Fetches both collections concurrently and replaces each one that loaded.
    ///
    /// A failed listing leaves its collection untouched. `loading` stays set until both calls
    /// settle.
    pub async fn load_all(&self) {
        self.dispatch(HistoryAction::LoadStarted);
        let (images, texts) =
            futures::join!(self.bridge.list_images(), self.bridge.list_text_items());

        match images {
            Ok(images) => self.dispatch(HistoryAction::ImagesLoaded(images)),
            Err(err) => logging::warn!("screenshot list load failed: {err}"),
        }
        match texts {
            Ok(texts) => self.dispatch(HistoryAction::TextsLoaded(texts)),
            Err(err) => logging::warn!("text history load failed: {err}"),
        }
        self.dispatch(HistoryAction::LoadFinished);
    }

    /// Records an entry the backend reported as created.
    pub fn apply_created(&self, entry: ClipboardEntry) {
        self.dispatch(HistoryAction::Created(entry));
    }

    /// Removes an entry the backend reported as deleted. Unknown keys are ignored.
    pub fn apply_deleted(&self, kind: ItemKind, key: &str) {
        self.dispatch(HistoryAction::Deleted {
            kind,
            key: key.to_string(),
        });
    }

    /// Deletes an entry on the backend and removes it locally once confirmed.
    pub async fn request_delete(&self, kind: ItemKind, key: &str) -> Result<(), BridgeError> {
        let result = match kind {
            ItemKind::Image => self.bridge.delete_image(key).await,
            ItemKind::Text => self.bridge.delete_text_item(key).await,
        };
        match result {
            Ok(()) => {
                self.apply_deleted(kind, key);
                Ok(())
            }
            Err(err) => {
                logging::warn!("delete {kind} `{key}` failed: {err}");
                Err(err)
            }
        }
    }

    /// Clears the text collection on the backend, then locally.
    pub async fn clear_text_history(&self) -> Result<(), BridgeError> {
        match self.bridge.clear_text_history().await {
            Ok(()) => {
                self.dispatch(HistoryAction::TextsCleared);
                Ok(())
            }
            Err(err) => {
                logging::warn!("clear text history failed: {err}");
                Err(err)
            }
        }
    }

    /// Puts a file path on the OS clipboard.
    pub async fn request_copy_path(&self, path: &str) -> Result<(), BridgeError> {
        self.bridge
            .copy_path(path)
            .await
            .inspect_err(|err| logging::warn!("copy path failed: {err}"))
    }

    /// Puts screenshot pixels on the OS clipboard.
    pub async fn request_copy_image(&self, filename: &str) -> Result<(), BridgeError> {
        self.bridge
            .copy_image(filename)
            .await
            .inspect_err(|err| logging::warn!("copy image `{filename}` failed: {err}"))
    }

    /// Pastes a history entry into the focused application.
    pub async fn request_paste(&self, content: &str, kind: ItemKind) -> Result<(), BridgeError> {
        self.bridge
            .paste_from_history(content, kind)
            .await
            .inspect_err(|err| logging::warn!("paste {kind} entry failed: {err}"))
    }

    /// Flips capture monitoring and adopts the flag the backend reports.
    pub async fn toggle_monitoring(&self) -> Result<bool, BridgeError> {
        let monitoring = self
            .bridge
            .toggle_monitor()
            .await
            .inspect_err(|err| logging::warn!("toggle monitoring failed: {err}"))?;
        self.dispatch(HistoryAction::MonitoringChanged(monitoring));
        Ok(monitoring)
    }

    /// Adopts the backend's current monitoring flag.
    pub async fn fetch_monitor_status(&self) -> Result<bool, BridgeError> {
        let monitoring = self
            .bridge
            .get_monitor_status()
            .await
            .inspect_err(|err| logging::warn!("monitor status load failed: {err}"))?;
        self.dispatch(HistoryAction::MonitoringChanged(monitoring));
        Ok(monitoring)
    }

    /// Reads the settings record and adopts its display language.
    ///
    /// Only the language is kept in store state; the full record is returned to the caller.
    pub async fn fetch_settings(&self) -> Result<AppSettings, BridgeError> {
        let settings = self
            .bridge
            .get_settings()
            .await
            .inspect_err(|err| logging::warn!("settings load failed: {err}"))?;
        match settings.display_language() {
            Some(language) => self.adopt_language(language),
            None => logging::warn!("ignoring unknown display language `{}`", settings.language),
        }
        Ok(settings)
    }

    /// Switches the display language.
    pub fn adopt_language(&self, language: Language) {
        self.dispatch(HistoryAction::LanguageChanged(language));
    }

    /// Switches the gallery view.
    pub fn set_filter_mode(&self, mode: FilterMode) {
        self.dispatch(HistoryAction::FilterChanged(mode));
    }

    /// Opens or closes the screenshot preview.
    pub fn set_selection(&self, item: Option<ImageItem>) {
        self.dispatch(HistoryAction::SelectionChanged(item));
    }

    /// Screenshots listed under the active filter (tracked read).
    pub fn visible_images(&self) -> Vec<ImageItem> {
        self.state.with(|state| state.visible_images().to_vec())
    }

    /// Text entries listed under the active filter (tracked read).
    pub fn visible_texts(&self) -> Vec<TextItem> {
        self.state.with(|state| state.visible_texts().to_vec())
    }
}
