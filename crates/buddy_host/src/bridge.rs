//! Request/response command bridge contract and in-process adapters.

use std::{
    cell::RefCell,
    collections::HashMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use futures::{
    channel::oneshot,
    future::{FutureExt, Shared},
};

use crate::{
    AppSettings, BridgeError, ClipboardEntry, ImageItem, ItemKind, MemoryStats, SessionRecord,
    TextItem,
};

/// Object-safe boxed future used by [`CommandBridge`] and the other host contracts.
pub type BridgeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Every backend command reachable through [`CommandBridge`].
pub enum BridgeCommand {
    /// List stored screenshots, newest first.
    ListImages,
    /// List copied-text entries, newest first.
    ListTextItems,
    /// List both kinds merged newest first.
    ListClipboardHistory,
    /// Delete one screenshot by filename.
    DeleteImage,
    /// Delete one text entry by id.
    DeleteTextItem,
    /// Remove every text entry.
    ClearTextHistory,
    /// Put a file path on the OS clipboard.
    CopyPath,
    /// Put screenshot pixels on the OS clipboard.
    CopyImage,
    /// Put a history entry back on the clipboard and paste it.
    PasteFromHistory,
    /// Read the capture-monitoring flag.
    GetMonitorStatus,
    /// Flip the capture-monitoring flag.
    ToggleMonitor,
    /// Read the settings record.
    GetSettings,
    /// Replace the settings record.
    UpdateSettings,
    /// Read VM memory statistics.
    MemoryStats,
    /// List resumable CLI sessions.
    SessionList,
    /// Restart the backend-managed VM.
    RestartVm,
}

impl BridgeCommand {
    /// Returns the backend command name invoked over IPC.
    pub const fn command_name(self) -> &'static str {
        match self {
            Self::ListImages => "get_screenshots",
            Self::ListTextItems => "get_text_history",
            Self::ListClipboardHistory => "get_clipboard_history",
            Self::DeleteImage => "delete_screenshot",
            Self::DeleteTextItem => "delete_text_entry",
            Self::ClearTextHistory => "clear_text_history",
            Self::CopyPath => "copy_path",
            Self::CopyImage => "copy_image",
            Self::PasteFromHistory => "paste_from_history",
            Self::GetMonitorStatus => "get_monitor_status",
            Self::ToggleMonitor => "toggle_monitor",
            Self::GetSettings => "get_settings",
            Self::UpdateSettings => "update_settings",
            Self::MemoryStats => "get_vmmem_stats",
            Self::SessionList => "get_claude_sessions",
            Self::RestartVm => "restart_wsl",
        }
    }
}

/// Request/response interface to the backend process.
///
/// Implementations never mutate client state; callers apply the confirmed result themselves.
pub trait CommandBridge {
    /// Lists stored screenshots in backend order (newest first).
    fn list_images<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<ImageItem>, BridgeError>>;

    /// Lists copied-text entries in backend order (newest first).
    fn list_text_items<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<TextItem>, BridgeError>>;

    /// Lists both kinds merged and already interleaved newest first.
    fn list_clipboard_history<'a>(
        &'a self,
    ) -> BridgeFuture<'a, Result<Vec<ClipboardEntry>, BridgeError>>;

    /// Deletes a screenshot by filename.
    fn delete_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>>;

    /// Deletes a text entry by id.
    fn delete_text_item<'a>(&'a self, id: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>>;

    /// Removes every text entry.
    fn clear_text_history<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>>;

    /// Copies a file path to the OS clipboard.
    fn copy_path<'a>(&'a self, path: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>>;

    /// Copies screenshot pixels to the OS clipboard.
    fn copy_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>>;

    /// Restores a history entry to the clipboard and pastes it into the focused app.
    fn paste_from_history<'a>(
        &'a self,
        content: &'a str,
        kind: ItemKind,
    ) -> BridgeFuture<'a, Result<(), BridgeError>>;

    /// Returns the authoritative monitoring flag.
    fn get_monitor_status<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>>;

    /// Flips monitoring and returns the authoritative new flag.
    fn toggle_monitor<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>>;

    /// Reads the settings record.
    fn get_settings<'a>(&'a self) -> BridgeFuture<'a, Result<AppSettings, BridgeError>>;

    /// Replaces the settings record wholesale and returns what the backend stored.
    fn update_settings<'a>(
        &'a self,
        settings: &'a AppSettings,
    ) -> BridgeFuture<'a, Result<AppSettings, BridgeError>>;

    /// Reads VM memory statistics.
    fn memory_stats<'a>(&'a self) -> BridgeFuture<'a, Result<MemoryStats, BridgeError>>;

    /// Lists resumable CLI sessions.
    fn session_list<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<SessionRecord>, BridgeError>>;

    /// Restarts the backend-managed VM and returns the backend's status message.
    fn restart_vm<'a>(&'a self) -> BridgeFuture<'a, Result<String, BridgeError>>;
}

const NOOP_CAPABILITY: &str = "command-bridge";

#[derive(Debug, Clone, Copy, Default)]
/// Bridge for hosts without a backend: reads are empty, side effects are unavailable.
pub struct NoopCommandBridge;

impl CommandBridge for NoopCommandBridge {
    fn list_images<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<ImageItem>, BridgeError>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn list_text_items<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<TextItem>, BridgeError>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn list_clipboard_history<'a>(
        &'a self,
    ) -> BridgeFuture<'a, Result<Vec<ClipboardEntry>, BridgeError>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn delete_image<'a>(&'a self, _filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn delete_text_item<'a>(&'a self, _id: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn clear_text_history<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn copy_path<'a>(&'a self, _path: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn copy_image<'a>(&'a self, _filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn paste_from_history<'a>(
        &'a self,
        _content: &'a str,
        _kind: ItemKind,
    ) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn get_monitor_status<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        Box::pin(async { Ok(false) })
    }

    fn toggle_monitor<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn get_settings<'a>(&'a self) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        Box::pin(async { Ok(AppSettings::default()) })
    }

    fn update_settings<'a>(
        &'a self,
        _settings: &'a AppSettings,
    ) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn memory_stats<'a>(&'a self) -> BridgeFuture<'a, Result<MemoryStats, BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }

    fn session_list<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<SessionRecord>, BridgeError>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn restart_vm<'a>(&'a self) -> BridgeFuture<'a, Result<String, BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable(NOOP_CAPABILITY)) })
    }
}

#[derive(Debug, Default)]
struct MemoryBackend {
    images: Vec<ImageItem>,
    texts: Vec<TextItem>,
    monitoring: bool,
    settings: AppSettings,
    memory_stats: Option<MemoryStats>,
    sessions: Vec<SessionRecord>,
    failures: HashMap<BridgeCommand, BridgeError>,
    calls: Vec<BridgeCommand>,
    copied: Vec<String>,
    pasted: Vec<(String, ItemKind)>,
    restarts: usize,
}

type HeldResponses = Shared<oneshot::Receiver<()>>;

#[derive(Clone, Default)]
/// In-memory backend double with failure injection and response holding.
pub struct MemoryCommandBridge {
    inner: Rc<RefCell<MemoryBackend>>,
    hold: Rc<RefCell<Option<HeldResponses>>>,
}

/// Keeps responses of a [`MemoryCommandBridge`] pending until released or dropped.
pub struct ResponseGate {
    sender: Option<oneshot::Sender<()>>,
    hold: Rc<RefCell<Option<HeldResponses>>>,
}

impl ResponseGate {
    /// Lets every held response (and later ones) resolve.
    pub fn release(mut self) {
        self.open();
    }

    fn open(&mut self) {
        self.hold.borrow_mut().take();
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(());
        }
    }
}

impl Drop for ResponseGate {
    fn drop(&mut self) {
        self.open();
    }
}

impl MemoryCommandBridge {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored screenshots (newest first).
    pub fn set_images(&self, images: Vec<ImageItem>) {
        self.inner.borrow_mut().images = images;
    }

    /// Replaces the stored text entries (newest first).
    pub fn set_text_items(&self, texts: Vec<TextItem>) {
        self.inner.borrow_mut().texts = texts;
    }

    /// Sets the monitoring flag the backend reports.
    pub fn set_monitoring(&self, monitoring: bool) {
        self.inner.borrow_mut().monitoring = monitoring;
    }

    /// Replaces the stored settings record.
    pub fn set_settings(&self, settings: AppSettings) {
        self.inner.borrow_mut().settings = settings;
    }

    /// Sets the memory statistics the backend reports.
    pub fn set_memory_stats(&self, stats: MemoryStats) {
        self.inner.borrow_mut().memory_stats = Some(stats);
    }

    /// Replaces the listed sessions.
    pub fn set_sessions(&self, sessions: Vec<SessionRecord>) {
        self.inner.borrow_mut().sessions = sessions;
    }

    /// Makes every later call of `command` fail with `error`.
    pub fn fail(&self, command: BridgeCommand, error: BridgeError) {
        self.inner.borrow_mut().failures.insert(command, error);
    }

    /// Removes an injected failure.
    pub fn clear_failure(&self, command: BridgeCommand) {
        self.inner.borrow_mut().failures.remove(&command);
    }

    /// Holds every response issued from now on until the returned gate is released.
    pub fn hold_responses(&self) -> ResponseGate {
        let (sender, receiver) = oneshot::channel();
        *self.hold.borrow_mut() = Some(receiver.shared());
        ResponseGate {
            sender: Some(sender),
            hold: self.hold.clone(),
        }
    }

    /// Returns the commands issued so far, in call order.
    pub fn calls(&self) -> Vec<BridgeCommand> {
        self.inner.borrow().calls.clone()
    }

    /// Returns how many VM restarts the backend completed.
    pub fn restart_count(&self) -> usize {
        self.inner.borrow().restarts
    }

    /// Returns how many times `command` was issued.
    pub fn call_count(&self, command: BridgeCommand) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|issued| **issued == command)
            .count()
    }

    /// Returns the screenshots the backend currently holds.
    pub fn images(&self) -> Vec<ImageItem> {
        self.inner.borrow().images.clone()
    }

    /// Returns the text entries the backend currently holds.
    pub fn text_items(&self) -> Vec<TextItem> {
        self.inner.borrow().texts.clone()
    }

    /// Returns the stored settings record.
    pub fn settings(&self) -> AppSettings {
        self.inner.borrow().settings.clone()
    }

    /// Returns the paths and filenames put on the clipboard by copy commands.
    pub fn copied(&self) -> Vec<String> {
        self.inner.borrow().copied.clone()
    }

    /// Returns every successful paste payload.
    pub fn pasted(&self) -> Vec<(String, ItemKind)> {
        self.inner.borrow().pasted.clone()
    }

    fn respond<'a, T, F>(
        &'a self,
        command: BridgeCommand,
        apply: F,
    ) -> BridgeFuture<'a, Result<T, BridgeError>>
    where
        T: 'a,
        F: FnOnce(&mut MemoryBackend) -> Result<T, BridgeError> + 'a,
    {
        self.inner.borrow_mut().calls.push(command);
        let held = self.hold.borrow().clone();
        Box::pin(async move {
            if let Some(held) = held {
                let _ = held.await;
            }
            let mut backend = self.inner.borrow_mut();
            if let Some(error) = backend.failures.get(&command) {
                return Err(error.clone());
            }
            apply(&mut *backend)
        })
    }
}

fn missing(kind: ItemKind, key: &str) -> BridgeError {
    BridgeError::Backend(format!("{kind} `{key}` not found"))
}

impl CommandBridge for MemoryCommandBridge {
    fn list_images<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<ImageItem>, BridgeError>> {
        self.respond(BridgeCommand::ListImages, |backend| Ok(backend.images.clone()))
    }

    fn list_text_items<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<TextItem>, BridgeError>> {
        self.respond(BridgeCommand::ListTextItems, |backend| Ok(backend.texts.clone()))
    }

    fn list_clipboard_history<'a>(
        &'a self,
    ) -> BridgeFuture<'a, Result<Vec<ClipboardEntry>, BridgeError>> {
        self.respond(BridgeCommand::ListClipboardHistory, |backend| {
            let mut entries: Vec<ClipboardEntry> = backend
                .images
                .iter()
                .cloned()
                .map(ClipboardEntry::Image)
                .chain(backend.texts.iter().cloned().map(ClipboardEntry::Text))
                .collect();
            entries.sort_by(|a, b| b.created_at().cmp(a.created_at()));
            Ok(entries)
        })
    }

    fn delete_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        self.respond(BridgeCommand::DeleteImage, move |backend| {
            let before = backend.images.len();
            backend.images.retain(|item| item.filename != filename);
            if backend.images.len() == before {
                return Err(missing(ItemKind::Image, filename));
            }
            Ok(())
        })
    }

    fn delete_text_item<'a>(&'a self, id: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        self.respond(BridgeCommand::DeleteTextItem, move |backend| {
            let before = backend.texts.len();
            backend.texts.retain(|item| item.id != id);
            if backend.texts.len() == before {
                return Err(missing(ItemKind::Text, id));
            }
            Ok(())
        })
    }

    fn clear_text_history<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        self.respond(BridgeCommand::ClearTextHistory, |backend| {
            backend.texts.clear();
            Ok(())
        })
    }

    fn copy_path<'a>(&'a self, path: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        self.respond(BridgeCommand::CopyPath, move |backend| {
            backend.copied.push(path.to_string());
            Ok(())
        })
    }

    fn copy_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        self.respond(BridgeCommand::CopyImage, move |backend| {
            if !backend.images.iter().any(|item| item.filename == filename) {
                return Err(missing(ItemKind::Image, filename));
            }
            backend.copied.push(filename.to_string());
            Ok(())
        })
    }

    fn paste_from_history<'a>(
        &'a self,
        content: &'a str,
        kind: ItemKind,
    ) -> BridgeFuture<'a, Result<(), BridgeError>> {
        self.respond(BridgeCommand::PasteFromHistory, move |backend| {
            backend.pasted.push((content.to_string(), kind));
            Ok(())
        })
    }

    fn get_monitor_status<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        self.respond(BridgeCommand::GetMonitorStatus, |backend| Ok(backend.monitoring))
    }

    fn toggle_monitor<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        self.respond(BridgeCommand::ToggleMonitor, |backend| {
            backend.monitoring = !backend.monitoring;
            Ok(backend.monitoring)
        })
    }

    fn get_settings<'a>(&'a self) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        self.respond(BridgeCommand::GetSettings, |backend| Ok(backend.settings.clone()))
    }

    fn update_settings<'a>(
        &'a self,
        settings: &'a AppSettings,
    ) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        self.respond(BridgeCommand::UpdateSettings, move |backend| {
            backend.settings = settings.clone();
            Ok(backend.settings.clone())
        })
    }

    fn memory_stats<'a>(&'a self) -> BridgeFuture<'a, Result<MemoryStats, BridgeError>> {
        self.respond(BridgeCommand::MemoryStats, |backend| {
            backend
                .memory_stats
                .clone()
                .ok_or_else(|| BridgeError::Backend("memory stats unavailable".to_string()))
        })
    }

    fn session_list<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<SessionRecord>, BridgeError>> {
        self.respond(BridgeCommand::SessionList, |backend| Ok(backend.sessions.clone()))
    }

    fn restart_vm<'a>(&'a self) -> BridgeFuture<'a, Result<String, BridgeError>> {
        self.respond(BridgeCommand::RestartVm, |backend| {
            backend.restarts += 1;
            Ok("WSL restarted successfully".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::{
        executor::{block_on, LocalPool},
        task::LocalSpawnExt,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn image(filename: &str, created_at: &str) -> ImageItem {
        ImageItem {
            filename: filename.to_string(),
            path: format!("C:/shots/{filename}"),
            thumbnail: String::new(),
            created_at: created_at.to_string(),
            size_bytes: 10,
        }
    }

    fn text(id: &str, created_at: &str) -> TextItem {
        TextItem {
            id: id.to_string(),
            content: format!("content {id}"),
            preview: id.to_string(),
            hash: id.to_string(),
            created_at: created_at.to_string(),
            char_count: 9,
        }
    }

    #[test]
    fn merged_history_is_interleaved_newest_first() {
        let bridge = MemoryCommandBridge::new();
        bridge.set_images(vec![image("b.png", "2025-01-03"), image("a.png", "2025-01-01")]);
        bridge.set_text_items(vec![text("t1", "2025-01-02")]);

        let keys: Vec<String> = block_on(bridge.list_clipboard_history())
            .expect("history")
            .iter()
            .map(|entry| entry.key().to_string())
            .collect();
        assert_eq!(keys, vec!["b.png", "t1", "a.png"]);
    }

    #[test]
    fn injected_failure_applies_until_cleared() {
        let bridge = MemoryCommandBridge::new();
        bridge.set_images(vec![image("a.png", "2025-01-01")]);
        bridge.fail(
            BridgeCommand::DeleteImage,
            BridgeError::Backend("locked".to_string()),
        );

        assert!(block_on(bridge.delete_image("a.png")).is_err());
        assert_eq!(bridge.images().len(), 1);

        bridge.clear_failure(BridgeCommand::DeleteImage);
        block_on(bridge.delete_image("a.png")).expect("delete");
        assert!(bridge.images().is_empty());
        assert_eq!(bridge.call_count(BridgeCommand::DeleteImage), 2);
    }

    #[test]
    fn held_responses_resolve_only_after_release() {
        let bridge = MemoryCommandBridge::new();
        bridge.set_monitoring(true);
        let gate = bridge.hold_responses();
        let observed = Rc::new(RefCell::new(None));

        let mut pool = LocalPool::new();
        {
            let bridge = bridge.clone();
            let observed = observed.clone();
            pool.spawner()
                .spawn_local(async move {
                    let status = bridge.get_monitor_status().await;
                    *observed.borrow_mut() = Some(status);
                })
                .expect("spawn");
        }

        pool.run_until_stalled();
        assert_eq!(*observed.borrow(), None);

        gate.release();
        pool.run_until_stalled();
        assert_eq!(*observed.borrow(), Some(Ok(true)));
    }

    #[test]
    fn noop_bridge_reports_side_effects_as_unavailable() {
        let bridge = NoopCommandBridge;
        assert_eq!(block_on(bridge.list_images()), Ok(Vec::new()));
        assert_eq!(
            block_on(bridge.copy_path("C:/x.png")),
            Err(BridgeError::Unavailable("command-bridge"))
        );
        assert_eq!(
            block_on(bridge.restart_vm()),
            Err(BridgeError::Unavailable("command-bridge"))
        );
    }

    #[test]
    fn restart_counts_only_completed_restarts() {
        let bridge = MemoryCommandBridge::new();
        assert_eq!(
            block_on(bridge.restart_vm()),
            Ok("WSL restarted successfully".to_string())
        );

        bridge.fail(
            BridgeCommand::RestartVm,
            BridgeError::Backend("shutdown failed".to_string()),
        );
        assert!(block_on(bridge.restart_vm()).is_err());
        assert_eq!(bridge.restart_count(), 1);
        assert_eq!(bridge.call_count(BridgeCommand::RestartVm), 2);
        assert_eq!(BridgeCommand::RestartVm.command_name(), "restart_wsl");
    }
}
