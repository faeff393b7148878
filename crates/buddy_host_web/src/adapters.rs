use std::rc::Rc;

use buddy_host::{
    AppSettings, BridgeError, BridgeFuture, ClipboardEntry, CommandBridge, EventSource,
    ExternalUrlService, HostServices, HostStrategy, ImageItem, ItemKind, ListenerHandle,
    MemoryStats, NoopCommandBridge, NoopEventSource, NoopExternalUrlService, NoopPopupWindow,
    NoopReleaseFeed, PopupWindow, PushChannel, PushHandler, ReleaseFeed, ReleaseInfo,
    SessionRecord, TextItem,
};

use crate::{
    GithubReleaseFeed, TauriCommandBridge, TauriEventSource, TauriExternalUrlService,
    TauriPopupWindow, WebTimerService,
};

#[cfg(all(feature = "desktop-host-stub", feature = "desktop-host-tauri"))]
compile_error!(
    "features `desktop-host-stub` and `desktop-host-tauri` are mutually exclusive; enable only one"
);

/// Returns the compile-time selected host strategy for the active build.
///
/// Builds without either feature talk to the Tauri backend.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::DesktopStub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::DesktopTauri
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete command transport behind [`CommandBridge`].
#[derive(Debug, Clone, Copy)]
pub enum CommandBridgeAdapter {
    /// Tauri `invoke` transport.
    DesktopTauri(TauriCommandBridge),
    /// Placeholder used when the backend is intentionally stubbed.
    DesktopStub(NoopCommandBridge),
}

impl CommandBridge for CommandBridgeAdapter {
    fn list_images<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<ImageItem>, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.list_images(),
            Self::DesktopStub(bridge) => bridge.list_images(),
        }
    }

    fn list_text_items<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<TextItem>, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.list_text_items(),
            Self::DesktopStub(bridge) => bridge.list_text_items(),
        }
    }

    fn list_clipboard_history<'a>(
        &'a self,
    ) -> BridgeFuture<'a, Result<Vec<ClipboardEntry>, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.list_clipboard_history(),
            Self::DesktopStub(bridge) => bridge.list_clipboard_history(),
        }
    }

    fn delete_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.delete_image(filename),
            Self::DesktopStub(bridge) => bridge.delete_image(filename),
        }
    }

    fn delete_text_item<'a>(&'a self, id: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.delete_text_item(id),
            Self::DesktopStub(bridge) => bridge.delete_text_item(id),
        }
    }

    fn clear_text_history<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.clear_text_history(),
            Self::DesktopStub(bridge) => bridge.clear_text_history(),
        }
    }

    fn copy_path<'a>(&'a self, path: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.copy_path(path),
            Self::DesktopStub(bridge) => bridge.copy_path(path),
        }
    }

    fn copy_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.copy_image(filename),
            Self::DesktopStub(bridge) => bridge.copy_image(filename),
        }
    }

    fn paste_from_history<'a>(
        &'a self,
        content: &'a str,
        kind: ItemKind,
    ) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.paste_from_history(content, kind),
            Self::DesktopStub(bridge) => bridge.paste_from_history(content, kind),
        }
    }

    fn get_monitor_status<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.get_monitor_status(),
            Self::DesktopStub(bridge) => bridge.get_monitor_status(),
        }
    }

    fn toggle_monitor<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.toggle_monitor(),
            Self::DesktopStub(bridge) => bridge.toggle_monitor(),
        }
    }

    fn get_settings<'a>(&'a self) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.get_settings(),
            Self::DesktopStub(bridge) => bridge.get_settings(),
        }
    }

    fn update_settings<'a>(
        &'a self,
        settings: &'a AppSettings,
    ) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.update_settings(settings),
            Self::DesktopStub(bridge) => bridge.update_settings(settings),
        }
    }

    fn memory_stats<'a>(&'a self) -> BridgeFuture<'a, Result<MemoryStats, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.memory_stats(),
            Self::DesktopStub(bridge) => bridge.memory_stats(),
        }
    }

    fn session_list<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<SessionRecord>, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.session_list(),
            Self::DesktopStub(bridge) => bridge.session_list(),
        }
    }
    fn restart_vm<'a>(&'a self) -> BridgeFuture<'a, Result<String, BridgeError>> {
        match self {
            Self::DesktopTauri(bridge) => bridge.restart_vm(),
            Self::DesktopStub(bridge) => bridge.restart_vm(),
        }
    }
}

/// Adapter enum that erases the concrete push transport behind [`EventSource`].
#[derive(Debug, Clone, Copy)]
pub enum EventSourceAdapter {
    /// Tauri event system.
    DesktopTauri(TauriEventSource),
    /// Placeholder that never delivers events.
    DesktopStub(NoopEventSource),
}

impl EventSource for EventSourceAdapter {
    fn listen<'a>(
        &'a self,
        channel: PushChannel,
        handler: PushHandler,
    ) -> BridgeFuture<'a, Result<ListenerHandle, BridgeError>> {
        match self {
            Self::DesktopTauri(source) => source.listen(channel, handler),
            Self::DesktopStub(source) => source.listen(channel, handler),
        }
    }
}

/// Adapter enum that erases the concrete window backend behind [`PopupWindow`].
#[derive(Debug, Clone, Copy)]
pub enum PopupWindowAdapter {
    /// Current Tauri webview window.
    DesktopTauri(TauriPopupWindow),
    /// Placeholder without a native window.
    DesktopStub(NoopPopupWindow),
}

impl PopupWindow for PopupWindowAdapter {
    fn close<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(window) => window.close(),
            Self::DesktopStub(window) => window.close(),
        }
    }

    fn scroll_entry_into_view(&self, index: usize) {
        match self {
            Self::DesktopTauri(window) => window.scroll_entry_into_view(index),
            Self::DesktopStub(window) => window.scroll_entry_into_view(index),
        }
    }
}

/// Adapter enum that erases the concrete release source behind [`ReleaseFeed`].
#[derive(Debug, Clone)]
pub enum ReleaseFeedAdapter {
    /// GitHub `releases/latest` endpoint.
    DesktopTauri(GithubReleaseFeed),
    /// Placeholder that never reports a release.
    DesktopStub(NoopReleaseFeed),
}

impl ReleaseFeed for ReleaseFeedAdapter {
    fn latest_release<'a>(&'a self) -> BridgeFuture<'a, Result<Option<ReleaseInfo>, BridgeError>> {
        match self {
            Self::DesktopTauri(feed) => feed.latest_release(),
            Self::DesktopStub(feed) => feed.latest_release(),
        }
    }
}

/// Adapter enum that erases the concrete URL opener behind [`ExternalUrlService`].
#[derive(Debug, Clone, Copy)]
pub enum ExternalUrlServiceAdapter {
    /// Tauri shell plugin.
    DesktopTauri(TauriExternalUrlService),
    /// Placeholder that reports the capability as unavailable.
    DesktopStub(NoopExternalUrlService),
}

impl ExternalUrlService for ExternalUrlServiceAdapter {
    fn open_url<'a>(&'a self, url: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        match self {
            Self::DesktopTauri(service) => service.open_url(url),
            Self::DesktopStub(service) => service.open_url(url),
        }
    }
}

/// Builds the command bridge for the compile-time selected host strategy.
pub fn command_bridge() -> CommandBridgeAdapter {
    match selected_host_strategy() {
        HostStrategy::DesktopTauri => CommandBridgeAdapter::DesktopTauri(TauriCommandBridge),
        HostStrategy::DesktopStub => CommandBridgeAdapter::DesktopStub(NoopCommandBridge),
    }
}

/// Builds the push-event source for the compile-time selected host strategy.
pub fn event_source() -> EventSourceAdapter {
    match selected_host_strategy() {
        HostStrategy::DesktopTauri => EventSourceAdapter::DesktopTauri(TauriEventSource),
        HostStrategy::DesktopStub => EventSourceAdapter::DesktopStub(NoopEventSource),
    }
}

/// Builds the popup window controls for the compile-time selected host strategy.
pub fn popup_window() -> PopupWindowAdapter {
    match selected_host_strategy() {
        HostStrategy::DesktopTauri => PopupWindowAdapter::DesktopTauri(TauriPopupWindow),
        HostStrategy::DesktopStub => PopupWindowAdapter::DesktopStub(NoopPopupWindow),
    }
}

/// Builds the release feed for the compile-time selected host strategy.
pub fn release_feed(url: &str) -> ReleaseFeedAdapter {
    match selected_host_strategy() {
        HostStrategy::DesktopTauri => {
            ReleaseFeedAdapter::DesktopTauri(GithubReleaseFeed::new(url))
        }
        HostStrategy::DesktopStub => ReleaseFeedAdapter::DesktopStub(NoopReleaseFeed),
    }
}

/// Builds the external-URL opener for the compile-time selected host strategy.
pub fn external_url_service() -> ExternalUrlServiceAdapter {
    match selected_host_strategy() {
        HostStrategy::DesktopTauri => {
            ExternalUrlServiceAdapter::DesktopTauri(TauriExternalUrlService)
        }
        HostStrategy::DesktopStub => ExternalUrlServiceAdapter::DesktopStub(NoopExternalUrlService),
    }
}

/// Builds the full host-service bundle for the active build.
///
/// Timers always use the browser event loop; they need no backend.
pub fn build_host_services(release_feed_url: &str) -> HostServices {
    HostServices {
        commands: Rc::new(command_bridge()),
        events: Rc::new(event_source()),
        timers: Rc::new(WebTimerService),
        popup_window: Rc::new(popup_window()),
        releases: Rc::new(release_feed(release_feed_url)),
        external_urls: Rc::new(external_url_service()),
        host_strategy: selected_host_strategy(),
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bundle_reports_selected_strategy() {
        let host = build_host_services("https://example.invalid/releases/latest");
        assert_eq!(host.host_strategy, selected_host_strategy());
        assert_eq!(host_strategy_name(), selected_host_strategy().as_str());
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    #[test]
    fn default_build_targets_tauri() {
        assert_eq!(selected_host_strategy(), HostStrategy::DesktopTauri);
        assert_eq!(host_strategy_name(), "desktop-tauri");
        assert!(matches!(command_bridge(), CommandBridgeAdapter::DesktopTauri(_)));
        assert!(matches!(
            release_feed("https://example.invalid/feed"),
            ReleaseFeedAdapter::DesktopTauri(feed) if feed.url() == "https://example.invalid/feed"
        ));
    }

    #[test]
    fn stub_adapters_delegate_to_noop_services() {
        let bridge = CommandBridgeAdapter::DesktopStub(NoopCommandBridge);
        assert_eq!(block_on(bridge.list_images()), Ok(Vec::new()));

        let feed = ReleaseFeedAdapter::DesktopStub(NoopReleaseFeed);
        assert_eq!(block_on(feed.latest_release()), Ok(None));

        let urls = ExternalUrlServiceAdapter::DesktopStub(NoopExternalUrlService);
        assert_eq!(
            block_on(urls.open_url("https://github.com/xcryptp/cli-buddy")),
            Err(BridgeError::Unavailable("external-url"))
        );

        let window = PopupWindowAdapter::DesktopStub(NoopPopupWindow);
        assert_eq!(block_on(window.close()), Ok(()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_timers_are_inert() {
        use std::{cell::Cell, time::Duration};

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let timers = WebTimerService;
        let handle = buddy_host::TimerService::set_timeout(
            &timers,
            Duration::from_millis(1),
            Box::new(move || flag.set(true)),
        );
        drop(handle);
        assert!(!fired.get());
    }
}
