//! Shared transport interop for the webview bridge domains.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the higher-level bridge domain modules.

use std::{rc::Rc, time::Duration};

use buddy_host::{BridgeError, ListenerHandle, TimerHandle};
use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn invoke(command: &str, args: Value) -> Result<Value, BridgeError> {
    imp::invoke(command, args).await
}

pub async fn listen(
    event: &str,
    handler: Rc<dyn Fn(Value)>,
) -> Result<ListenerHandle, BridgeError> {
    imp::listen(event, handler).await
}

pub fn set_timeout(delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
    imp::set_timeout(delay, callback)
}

pub fn set_interval(period: Duration, callback: Rc<dyn Fn()>) -> TimerHandle {
    imp::set_interval(period, callback)
}

pub async fn close_current_window() -> Result<(), BridgeError> {
    imp::close_current_window().await
}

pub fn scroll_entry_into_view(index: usize) {
    imp::scroll_entry_into_view(index)
}

pub async fn fetch_json(url: &str) -> Result<Option<Value>, BridgeError> {
    imp::fetch_json(url).await
}

pub async fn open_external_url(url: &str) -> Result<(), BridgeError> {
    imp::open_external_url(url).await
}
