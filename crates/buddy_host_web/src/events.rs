//! Tauri push-event adapter.

use std::rc::Rc;

use buddy_host::{
    BridgeError, BridgeFuture, EventSource, ListenerHandle, PushChannel, PushEvent, PushHandler,
};
use leptos::logging;
use serde_json::Value;

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Event source backed by the Tauri event system.
///
/// Payloads that do not decode as the channel's item type are logged and dropped.
pub struct TauriEventSource;

fn decoding_handler(channel: PushChannel, handler: PushHandler) -> Rc<dyn Fn(Value)> {
    Rc::new(move |payload| match PushEvent::decode(channel, payload) {
        Ok(event) => handler(event),
        Err(err) => logging::warn!("dropping push event: {err}"),
    })
}

impl EventSource for TauriEventSource {
    fn listen<'a>(
        &'a self,
        channel: PushChannel,
        handler: PushHandler,
    ) -> BridgeFuture<'a, Result<ListenerHandle, BridgeError>> {
        Box::pin(async move {
            bridge::listen(channel.event_name(), decoding_handler(channel, handler)).await
        })
    }
}
