//! External URL host-service contracts.

use std::{cell::RefCell, rc::Rc};

use crate::{BridgeError, BridgeFuture};

/// Host service for opening URLs in the user's browser.
pub trait ExternalUrlService {
    /// Opens `url` outside the app window.
    fn open_url<'a>(&'a self, url: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// External URL service for hosts that cannot open links.
pub struct NoopExternalUrlService;

impl ExternalUrlService for NoopExternalUrlService {
    fn open_url<'a>(&'a self, _url: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async { Err(BridgeError::Unavailable("external-url")) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory external URL service recording every opened URL.
pub struct MemoryExternalUrlService {
    opened: Rc<RefCell<Vec<String>>>,
}

impl MemoryExternalUrlService {
    /// Returns the opened URLs, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl ExternalUrlService for MemoryExternalUrlService {
    fn open_url<'a>(&'a self, url: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(async move {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        })
    }
}
