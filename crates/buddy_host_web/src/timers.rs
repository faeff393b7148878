//! Browser timer adapter.

use std::{rc::Rc, time::Duration};

use buddy_host::{TimerHandle, TimerService};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Timer service backed by `window.setTimeout` and `window.setInterval`.
///
/// Delays longer than `i32::MAX` milliseconds are clamped. Outside wasm the callbacks never fire.
pub struct WebTimerService;

impl TimerService for WebTimerService {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        bridge::set_timeout(delay, callback)
    }

    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerHandle {
        bridge::set_interval(period, callback)
    }
}
