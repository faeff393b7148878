//! Wiring from backend push channels into the history store.

use std::{cell::Cell, rc::Rc};

use buddy_host::{BridgeError, EventSource, ListenerHandle, PushChannel, PushEvent};
use leptos::logging;

use crate::store::HistoryStore;

/// Scoped subscription to both push channels.
///
/// Dropping the guard (or calling [`EventBridgeSubscription::detach`]) releases both listeners.
/// Hosts may finish unlistening later; the shared liveness flag keeps handlers that still fire
/// from touching the store.
#[derive(Debug)]
pub struct EventBridgeSubscription {
    alive: Rc<Cell<bool>>,
    listeners: Vec<ListenerHandle>,
}

impl EventBridgeSubscription {
    /// Returns whether handlers still forward events to the store.
    pub fn is_attached(&self) -> bool {
        self.alive.get()
    }

    /// Releases both listeners.
    pub fn detach(self) {}
}

impl Drop for EventBridgeSubscription {
    fn drop(&mut self) {
        self.alive.set(false);
        for listener in &mut self.listeners {
            listener.release();
        }
    }
}

/// Subscribes `store` to screenshot and text creation events from `source`.
///
/// When a later channel fails to subscribe, listeners already registered are released before the
/// error is returned.
pub async fn attach_event_bridge(
    source: &dyn EventSource,
    store: &HistoryStore,
) -> Result<EventBridgeSubscription, BridgeError> {
    let mut subscription = EventBridgeSubscription {
        alive: Rc::new(Cell::new(true)),
        listeners: Vec::with_capacity(PushChannel::ALL.len()),
    };

    for channel in PushChannel::ALL {
        let alive = subscription.alive.clone();
        let store = store.clone();
        let handler = Rc::new(move |event: PushEvent| {
            if alive.get() {
                store.apply_created(event.into_entry());
            }
        });

        match source.listen(channel, handler).await {
            Ok(listener) => subscription.listeners.push(listener),
            Err(err) => {
                logging::warn!("subscribe `{}` failed: {err}", channel.event_name());
                return Err(err);
            }
        }
    }

    Ok(subscription)
}
