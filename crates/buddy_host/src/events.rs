//! Backend push-notification channels and listener lifecycle.

use std::{cell::RefCell, rc::Rc};

use serde_json::Value;

use crate::{BridgeError, BridgeFuture, ClipboardEntry, ImageItem, TextItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// One backend-to-frontend event stream.
pub enum PushChannel {
    /// A screenshot was captured and stored.
    ImageCreated,
    /// Copied text was captured and stored.
    TextCreated,
}

impl PushChannel {
    /// Both channels, in subscription order.
    pub const ALL: [PushChannel; 2] = [PushChannel::ImageCreated, PushChannel::TextCreated];

    /// Returns the backend event name.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::ImageCreated => "new-screenshot",
            Self::TextCreated => "new-text-entry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One delivered push notification.
pub enum PushEvent {
    /// Payload of [`PushChannel::ImageCreated`].
    ImageCreated(ImageItem),
    /// Payload of [`PushChannel::TextCreated`].
    TextCreated(TextItem),
}

impl PushEvent {
    /// Decodes a raw event payload received on `channel`.
    pub fn decode(channel: PushChannel, payload: Value) -> Result<Self, BridgeError> {
        let decoded = match channel {
            PushChannel::ImageCreated => serde_json::from_value(payload).map(Self::ImageCreated),
            PushChannel::TextCreated => serde_json::from_value(payload).map(Self::TextCreated),
        };
        decoded.map_err(|err| {
            BridgeError::Decode(format!("`{}` payload: {err}", channel.event_name()))
        })
    }

    /// Returns the channel this event belongs to.
    pub const fn channel(&self) -> PushChannel {
        match self {
            Self::ImageCreated(_) => PushChannel::ImageCreated,
            Self::TextCreated(_) => PushChannel::TextCreated,
        }
    }

    /// Converts the event into the created history entry.
    pub fn into_entry(self) -> ClipboardEntry {
        match self {
            Self::ImageCreated(item) => ClipboardEntry::Image(item),
            Self::TextCreated(item) => ClipboardEntry::Text(item),
        }
    }
}

/// Callback invoked for each delivered event.
pub type PushHandler = Rc<dyn Fn(PushEvent)>;

/// Host service delivering backend push notifications.
pub trait EventSource {
    /// Registers `handler` for `channel`; the returned handle unregisters it when dropped.
    fn listen<'a>(
        &'a self,
        channel: PushChannel,
        handler: PushHandler,
    ) -> BridgeFuture<'a, Result<ListenerHandle, BridgeError>>;
}

/// Drop-based registration handle for one push-channel listener.
pub struct ListenerHandle {
    unlisten: Option<Box<dyn FnOnce()>>,
}

impl ListenerHandle {
    /// Creates a handle from the host's unlisten callback.
    pub fn new(unlisten: impl FnOnce() + 'static) -> Self {
        Self {
            unlisten: Some(Box::new(unlisten)),
        }
    }

    /// Creates a handle that releases nothing.
    pub fn noop() -> Self {
        Self { unlisten: None }
    }

    /// Unregisters the listener if still registered.
    pub fn release(&mut self) {
        if let Some(unlisten) = self.unlisten.take() {
            unlisten();
        }
    }

    /// Returns whether the unlisten callback has not run yet.
    pub fn is_active(&self) -> bool {
        self.unlisten.is_some()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Event source for hosts without push notifications.
pub struct NoopEventSource;

impl EventSource for NoopEventSource {
    fn listen<'a>(
        &'a self,
        _channel: PushChannel,
        _handler: PushHandler,
    ) -> BridgeFuture<'a, Result<ListenerHandle, BridgeError>> {
        Box::pin(async { Ok(ListenerHandle::noop()) })
    }
}

struct MemoryListener {
    id: u64,
    channel: PushChannel,
    handler: PushHandler,
}

#[derive(Default)]
struct MemoryListeners {
    next_id: u64,
    listeners: Vec<MemoryListener>,
    listen_failure: Option<(PushChannel, BridgeError)>,
    defer_unlisten: bool,
    pending_unlisten: Vec<u64>,
}

#[derive(Clone, Default)]
/// In-process event source that tests drive with [`MemoryEventSource::emit`].
pub struct MemoryEventSource {
    inner: Rc<RefCell<MemoryListeners>>,
}

impl MemoryEventSource {
    /// Creates a source with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every listener of its channel and returns how many were called.
    pub fn emit(&self, event: PushEvent) -> usize {
        let channel = event.channel();
        let handlers: Vec<PushHandler> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.channel == channel)
            .map(|listener| listener.handler.clone())
            .collect();
        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }

    /// Returns the number of registered listeners for `channel`.
    pub fn listener_count(&self, channel: PushChannel) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.channel == channel)
            .count()
    }

    /// Makes the next `listen` call for `channel` fail.
    pub fn fail_listen(&self, channel: PushChannel, error: BridgeError) {
        self.inner.borrow_mut().listen_failure = Some((channel, error));
    }

    /// Queues unlisten requests instead of applying them, like an asynchronous host unlisten.
    pub fn defer_unlisten(&self, defer: bool) {
        self.inner.borrow_mut().defer_unlisten = defer;
    }

    /// Applies every queued unlisten request.
    pub fn flush_unlisten(&self) {
        let mut inner = self.inner.borrow_mut();
        let pending = std::mem::take(&mut inner.pending_unlisten);
        inner
            .listeners
            .retain(|listener| !pending.contains(&listener.id));
    }
}

impl EventSource for MemoryEventSource {
    fn listen<'a>(
        &'a self,
        channel: PushChannel,
        handler: PushHandler,
    ) -> BridgeFuture<'a, Result<ListenerHandle, BridgeError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if matches!(&inner.listen_failure, Some((failing, _)) if *failing == channel) {
                if let Some((_, error)) = inner.listen_failure.take() {
                    return Err(error);
                }
            }

            inner.next_id += 1;
            let id = inner.next_id;
            inner.listeners.push(MemoryListener {
                id,
                channel,
                handler,
            });

            let weak = Rc::downgrade(&self.inner);
            Ok(ListenerHandle::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let mut inner = inner.borrow_mut();
                if inner.defer_unlisten {
                    inner.pending_unlisten.push(id);
                } else {
                    inner.listeners.retain(|listener| listener.id != id);
                }
            }))
        })
    }
}
