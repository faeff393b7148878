//! Host-service bundle handed to the runtime.

use std::rc::Rc;

use crate::{
    CommandBridge, EventSource, ExternalUrlService, NoopCommandBridge, NoopEventSource,
    NoopExternalUrlService, NoopPopupWindow, NoopReleaseFeed, NoopTimerService, PopupWindow,
    ReleaseFeed, TimerService,
};

/// Host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Running inside the Tauri webview with a live backend.
    DesktopTauri,
    /// Running without a backend; every adapter is a placeholder.
    DesktopStub,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DesktopTauri => "desktop-tauri",
            Self::DesktopStub => "desktop-stub",
        }
    }
}

/// Runtime-selected host service bundle.
///
/// Adapter selection happens before the bundle reaches `buddy_runtime`, so the runtime never
/// names a concrete transport.
#[derive(Clone)]
pub struct HostServices {
    /// Request/response command bridge.
    pub commands: Rc<dyn CommandBridge>,
    /// Backend push-notification source.
    pub events: Rc<dyn EventSource>,
    /// UI-thread timers.
    pub timers: Rc<dyn TimerService>,
    /// Quick-paste popup window controls.
    pub popup_window: Rc<dyn PopupWindow>,
    /// Latest-release feed for the update check.
    pub releases: Rc<dyn ReleaseFeed>,
    /// External URL opening service.
    pub external_urls: Rc<dyn ExternalUrlService>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Bundle of placeholder adapters for builds without a backend.
    pub fn stub() -> Self {
        Self {
            commands: Rc::new(NoopCommandBridge),
            events: Rc::new(NoopEventSource),
            timers: Rc::new(NoopTimerService),
            popup_window: Rc::new(NoopPopupWindow),
            releases: Rc::new(NoopReleaseFeed),
            external_urls: Rc::new(NoopExternalUrlService),
            host_strategy: HostStrategy::DesktopStub,
        }
    }
}
