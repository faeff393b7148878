//! Tauri webview implementations of [`buddy_host`] service contracts.
//!
//! This crate is the concrete desktop-side wiring layer for backend commands, push events,
//! timers, popup window control, the release feed, and external URL opening.
//!
//! Transport bindings live under `bridge/`:
//! - `bridge::commands` (typed decoding of command responses)
//! - `bridge::interop` (shared wasm/non-wasm transport glue)

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
mod bridge;
pub mod commands;
pub mod events;
pub mod external_url;
pub mod release;
pub mod timers;
pub mod window;

pub use adapters::{
    build_host_services, command_bridge, event_source, external_url_service, host_strategy_name,
    popup_window, release_feed, selected_host_strategy, CommandBridgeAdapter, EventSourceAdapter,
    ExternalUrlServiceAdapter, PopupWindowAdapter, ReleaseFeedAdapter,
};
pub use commands::TauriCommandBridge;
pub use events::TauriEventSource;
pub use external_url::TauriExternalUrlService;
pub use release::GithubReleaseFeed;
pub use timers::WebTimerService;
pub use window::TauriPopupWindow;
