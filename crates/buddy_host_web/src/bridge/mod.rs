//! Webview bridge used by the `buddy_host_web` adapters.
//!
//! Typed command decoding lives in `commands`; every other call goes straight to the shared
//! `interop` transport, which picks the wasm or non-wasm implementation.

mod commands;
mod interop;

pub(crate) use commands::{invoke_decoded, invoke_unit, no_args};
pub(crate) use interop::{
    close_current_window, fetch_json, listen, open_external_url, scroll_entry_into_view,
    set_interval, set_timeout,
};
