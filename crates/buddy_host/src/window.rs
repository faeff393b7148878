//! Popup window host-service contracts.

use std::{cell::RefCell, rc::Rc};

use crate::{BridgeError, BridgeFuture};

/// Host service controlling the quick-paste popup window.
pub trait PopupWindow {
    /// Hides the popup window.
    fn close<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>>;

    /// Scrolls the entry at `index` of the rendered list into view.
    fn scroll_entry_into_view(&self, index: usize);
}

#[derive(Debug, Clone, Copy, Default)]
/// Popup window adapter for hosts without a native window.
pub struct NoopPopupWindow;

impl PopupWindow for NoopPopupWindow {
    fn close<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Ok(()) })
    }

    fn scroll_entry_into_view(&self, _index: usize) {}
}

#[derive(Debug, Default)]
struct PopupWindowLog {
    close_count: usize,
    scrolled: Vec<usize>,
    close_failure: Option<BridgeError>,
}

#[derive(Debug, Clone, Default)]
/// In-memory popup window that records requests for tests.
pub struct MemoryPopupWindow {
    log: Rc<RefCell<PopupWindowLog>>,
}

impl MemoryPopupWindow {
    /// Returns how many close requests succeeded.
    pub fn close_count(&self) -> usize {
        self.log.borrow().close_count
    }

    /// Returns every index passed to [`PopupWindow::scroll_entry_into_view`], oldest first.
    pub fn scrolled(&self) -> Vec<usize> {
        self.log.borrow().scrolled.clone()
    }

    /// Makes the next close request fail.
    pub fn fail_close(&self, error: BridgeError) {
        self.log.borrow_mut().close_failure = Some(error);
    }
}

impl PopupWindow for MemoryPopupWindow {
    fn close<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async move {
            let mut log = self.log.borrow_mut();
            if let Some(error) = log.close_failure.take() {
                return Err(error);
            }
            log.close_count += 1;
            Ok(())
        })
    }

    fn scroll_entry_into_view(&self, index: usize) {
        self.log.borrow_mut().scrolled.push(index);
    }
}
