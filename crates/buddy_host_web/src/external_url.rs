//! External URL adapter for the desktop webview.

use buddy_host::{BridgeError, BridgeFuture, ExternalUrlService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Opens URLs through the Tauri shell plugin, falling back to `window.open`.
pub struct TauriExternalUrlService;

impl ExternalUrlService for TauriExternalUrlService {
    fn open_url<'a>(&'a self, url: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(bridge::open_external_url(url))
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_open_is_unavailable() {
        let service = TauriExternalUrlService;
        assert_eq!(
            block_on(service.open_url("https://github.com/xcryptp/cli-buddy")),
            Err(BridgeError::Unavailable("external-url"))
        );
    }
}
