//! Tauri popup window adapter.

use buddy_host::{BridgeError, BridgeFuture, PopupWindow};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Popup window controls for the current Tauri webview window.
///
/// Rendered entries are located by their `data-entry-index` attribute.
pub struct TauriPopupWindow;

impl PopupWindow for TauriPopupWindow {
    fn close<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(bridge::close_current_window())
    }

    fn scroll_entry_into_view(&self, index: usize) {
        bridge::scroll_entry_into_view(index);
    }
}
