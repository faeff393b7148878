//! Client runtime for the clipboard-history frontend.
//!
//! The runtime reconciles a reactive view of screenshot and copied-text history with the backend
//! behind [`buddy_host::CommandBridge`], applies push notifications from
//! [`buddy_host::EventSource`], and drives both surfaces from the same model: the gallery window
//! ([`runtime::GalleryRuntime`]) and the keyboard-driven quick-paste popup
//! ([`popup::PopupController`]). Every component takes its host services by injection so native
//! tests run against the in-memory adapters.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod accelerator;
pub mod config;
pub mod diagnostics;
pub mod events;
pub mod feedback;
pub mod history;
pub mod model;
pub mod polling;
pub mod popup;
pub mod runtime;
pub mod settings_editor;
pub mod spawn;
pub mod store;
pub mod update;
pub mod version;

#[cfg(test)]
mod testing;

pub use accelerator::{normalize_accelerator, KeyInput, RecorderEvent, ShortcutRecorder};
pub use config::{RuntimeConfig, DEFAULT_RELEASE_FEED_URL};
pub use diagnostics::DiagnosticsPanel;
pub use events::{attach_event_bridge, EventBridgeSubscription};
pub use feedback::CopyFeedback;
pub use history::{reduce_history, HistoryAction, HistoryState};
pub use model::{display_timestamp, FilterMode};
pub use polling::{start_polling, PollScope, PollingHandle};
pub use popup::{
    reduce_popup, PopupAction, PopupController, PopupEffect, PopupKey, PopupPhase, PopupState,
};
pub use runtime::GalleryRuntime;
pub use settings_editor::{SettingsEditor, SettingsEditorError};
pub use spawn::TaskSpawner;
pub use store::HistoryStore;
pub use update::{UpdateChecker, UpdateInfo};
pub use version::is_newer_version;
