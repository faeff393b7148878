//! Typed host contracts and shared models for the clipboard-history frontend.
//!
//! This crate is the boundary between the UI runtime and the backend process. It exposes the
//! history item models, the settings record, diagnostics payloads, and the service traits for
//! commands, push events, timers, and window control. Concrete webview adapters live in
//! `buddy_host_web`; the in-memory adapters here back native tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod bridge;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod external_url;
pub mod host;
pub mod items;
pub mod release;
pub mod settings;
pub mod timers;
pub mod window;

pub use bridge::{
    BridgeCommand, BridgeFuture, CommandBridge, MemoryCommandBridge, NoopCommandBridge,
    ResponseGate,
};
pub use diagnostics::{MemoryPressure, MemoryStats, SessionRecord};
pub use error::BridgeError;
pub use events::{
    EventSource, ListenerHandle, MemoryEventSource, NoopEventSource, PushChannel, PushEvent,
    PushHandler,
};
pub use external_url::{ExternalUrlService, MemoryExternalUrlService, NoopExternalUrlService};
pub use host::{HostServices, HostStrategy};
pub use items::{ClipboardEntry, ImageItem, ItemKind, TextItem};
pub use release::{MemoryReleaseFeed, NoopReleaseFeed, ReleaseFeed, ReleaseInfo};
pub use settings::{AppSettings, Language, PathFormat, DEFAULT_GLOBAL_SHORTCUT};
pub use timers::{ManualTimerService, NoopTimerService, TimerHandle, TimerService};
pub use window::{MemoryPopupWindow, NoopPopupWindow, PopupWindow};
