use js_sys::{Function, Promise};
use leptos::logging;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;

use super::*;

#[wasm_bindgen(inline_js = r#"
function tauri() {
  const api = globalThis.__TAURI__;
  if (!api || !api.core) {
    throw new Error('Tauri IPC is unavailable in this webview');
  }
  return api;
}

export function jsTauriAvailable() {
  const api = globalThis.__TAURI__;
  return !!(api && api.core && typeof api.core.invoke === 'function');
}

export async function jsInvoke(command, args) {
  return await tauri().core.invoke(command, args);
}

export async function jsListen(eventName, handler) {
  return await tauri().event.listen(eventName, (event) => handler(event.payload));
}

export async function jsCloseCurrentWindow() {
  await tauri().window.getCurrentWindow().close();
}

export function jsScrollEntryIntoView(index) {
  const el = document.querySelector(`[data-entry-index="${index}"]`);
  if (el) {
    el.scrollIntoView({ block: 'nearest' });
  }
}

export async function jsFetchJson(url) {
  const res = await fetch(url, { headers: { Accept: 'application/vnd.github+json' } });
  if (!res.ok) {
    return null;
  }
  return await res.json();
}

export async function jsOpenExternalUrl(url) {
  const api = globalThis.__TAURI__;
  if (api && api.shell && typeof api.shell.open === 'function') {
    await api.shell.open(url);
    return;
  }
  if (!window.open(url, '_blank', 'noopener,noreferrer')) {
    throw new Error('window.open was blocked');
  }
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsTauriAvailable)]
    fn js_tauri_available() -> bool;
    #[wasm_bindgen(js_name = jsInvoke)]
    fn js_invoke(command: &str, args: JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsListen)]
    fn js_listen(event_name: &str, handler: &JsValue) -> Promise;
    #[wasm_bindgen(js_name = jsCloseCurrentWindow)]
    fn js_close_current_window() -> Promise;
    #[wasm_bindgen(js_name = jsScrollEntryIntoView)]
    fn js_scroll_entry_into_view(index: usize);
    #[wasm_bindgen(js_name = jsFetchJson)]
    fn js_fetch_json(url: &str) -> Promise;
    #[wasm_bindgen(js_name = jsOpenExternalUrl)]
    fn js_open_external_url(url: &str) -> Promise;
}

async fn await_promise(promise: Promise) -> Result<JsValue, String> {
    JsFuture::from(promise).await.map_err(js_error_to_string)
}

fn js_error_to_string(err: JsValue) -> String {
    if let Some(text) = err.as_string() {
        return text;
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return text;
        }
    }
    format!("{err:?}")
}

fn ipc_ready() -> Result<(), BridgeError> {
    if js_tauri_available() {
        Ok(())
    } else {
        Err(BridgeError::Transport(
            "Tauri IPC is unavailable in this webview".to_string(),
        ))
    }
}

fn to_js(value: &Value) -> Result<JsValue, BridgeError> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| BridgeError::Decode(e.to_string()))
}

fn from_js(value: JsValue) -> Result<Value, BridgeError> {
    if value.is_null() || value.is_undefined() {
        return Ok(Value::Null);
    }
    from_value(value).map_err(|e| BridgeError::Decode(e.to_string()))
}

fn millis(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

pub async fn invoke(command: &str, args: Value) -> Result<Value, BridgeError> {
    ipc_ready()?;
    let args = to_js(&args)?;
    let value = await_promise(js_invoke(command, args))
        .await
        .map_err(BridgeError::Backend)?;
    from_js(value)
}

pub async fn listen(
    event: &str,
    handler: Rc<dyn Fn(Value)>,
) -> Result<ListenerHandle, BridgeError> {
    ipc_ready()?;
    let event_name = event.to_string();
    let closure = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
        match from_js(payload) {
            Ok(value) => handler(value),
            Err(err) => logging::warn!("dropping `{event_name}` payload: {err}"),
        }
    });

    let unlisten = await_promise(js_listen(event, closure.as_ref()))
        .await
        .map_err(BridgeError::Transport)?;
    let unlisten: Function = unlisten.dyn_into().map_err(|_| {
        BridgeError::Decode(format!("`{event}` listen did not return an unlisten function"))
    })?;

    Ok(ListenerHandle::new(move || {
        if let Err(err) = unlisten.call0(&JsValue::NULL) {
            logging::warn!("unlisten failed: {}", js_error_to_string(err));
        }
        drop(closure);
    }))
}

pub fn set_timeout(delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
    let Some(window) = web_sys::window() else {
        logging::warn!("setTimeout unavailable outside a window context");
        return TimerHandle::noop();
    };
    let closure = Closure::once(move || callback());
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        millis(delay),
    ) {
        Ok(id) => TimerHandle::new(move || {
            window.clear_timeout_with_handle(id);
            drop(closure);
        }),
        Err(err) => {
            logging::warn!("setTimeout failed: {}", js_error_to_string(err));
            TimerHandle::noop()
        }
    }
}

pub fn set_interval(period: Duration, callback: Rc<dyn Fn()>) -> TimerHandle {
    let Some(window) = web_sys::window() else {
        logging::warn!("setInterval unavailable outside a window context");
        return TimerHandle::noop();
    };
    let closure = Closure::<dyn FnMut()>::new(move || callback());
    match window.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        millis(period),
    ) {
        Ok(id) => TimerHandle::new(move || {
            window.clear_interval_with_handle(id);
            drop(closure);
        }),
        Err(err) => {
            logging::warn!("setInterval failed: {}", js_error_to_string(err));
            TimerHandle::noop()
        }
    }
}

pub async fn close_current_window() -> Result<(), BridgeError> {
    ipc_ready()?;
    await_promise(js_close_current_window())
        .await
        .map(|_| ())
        .map_err(BridgeError::Backend)
}

pub fn scroll_entry_into_view(index: usize) {
    js_scroll_entry_into_view(index);
}

pub async fn fetch_json(url: &str) -> Result<Option<Value>, BridgeError> {
    let value = await_promise(js_fetch_json(url))
        .await
        .map_err(BridgeError::Transport)?;
    match from_js(value)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

pub async fn open_external_url(url: &str) -> Result<(), BridgeError> {
    await_promise(js_open_external_url(url))
        .await
        .map(|_| ())
        .map_err(BridgeError::Backend)
}
