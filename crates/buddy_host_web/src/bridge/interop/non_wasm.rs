use super::*;

const IPC: &str = "tauri-ipc";

pub async fn invoke(_command: &str, _args: Value) -> Result<Value, BridgeError> {
    Err(BridgeError::Unavailable(IPC))
}

pub async fn listen(
    _event: &str,
    _handler: Rc<dyn Fn(Value)>,
) -> Result<ListenerHandle, BridgeError> {
    Err(BridgeError::Unavailable(IPC))
}

pub fn set_timeout(_delay: Duration, _callback: Box<dyn FnOnce()>) -> TimerHandle {
    TimerHandle::noop()
}

pub fn set_interval(_period: Duration, _callback: Rc<dyn Fn()>) -> TimerHandle {
    TimerHandle::noop()
}

pub async fn close_current_window() -> Result<(), BridgeError> {
    Err(BridgeError::Unavailable("window"))
}

pub fn scroll_entry_into_view(_index: usize) {}

pub async fn fetch_json(_url: &str) -> Result<Option<Value>, BridgeError> {
    Err(BridgeError::Unavailable("fetch"))
}

pub async fn open_external_url(_url: &str) -> Result<(), BridgeError> {
    Err(BridgeError::Unavailable("external-url"))
}
