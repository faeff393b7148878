//! Published-release feed contracts used by the update check.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{BridgeError, BridgeFuture};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Latest published release as reported by the release feed.
pub struct ReleaseInfo {
    /// Release tag, usually `vX.Y.Z`.
    pub tag_name: String,
    /// Human-facing release page.
    pub html_url: String,
    /// Release notes; absent or `null` on releases without notes.
    #[serde(default)]
    pub body: Option<String>,
}

/// Host service returning the latest published release.
pub trait ReleaseFeed {
    /// Fetches the latest release, or `None` when nothing has been published.
    fn latest_release<'a>(&'a self) -> BridgeFuture<'a, Result<Option<ReleaseInfo>, BridgeError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Release feed that never reports a release.
pub struct NoopReleaseFeed;

impl ReleaseFeed for NoopReleaseFeed {
    fn latest_release<'a>(&'a self) -> BridgeFuture<'a, Result<Option<ReleaseInfo>, BridgeError>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Debug, Default)]
struct MemoryRelease {
    latest: Option<ReleaseInfo>,
    failure: Option<BridgeError>,
    fetches: usize,
}

#[derive(Debug, Clone, Default)]
/// In-memory release feed configured by tests.
pub struct MemoryReleaseFeed {
    inner: Rc<RefCell<MemoryRelease>>,
}

impl MemoryReleaseFeed {
    /// Publishes `release` as the latest release.
    pub fn publish(&self, release: ReleaseInfo) {
        self.inner.borrow_mut().latest = Some(release);
    }

    /// Makes every following fetch fail until [`MemoryReleaseFeed::recover`] is called.
    pub fn fail(&self, error: BridgeError) {
        self.inner.borrow_mut().failure = Some(error);
    }

    /// Clears an injected failure.
    pub fn recover(&self) {
        self.inner.borrow_mut().failure = None;
    }

    /// Returns how many fetches were attempted.
    pub fn fetch_count(&self) -> usize {
        self.inner.borrow().fetches
    }
}

impl ReleaseFeed for MemoryReleaseFeed {
    fn latest_release<'a>(&'a self) -> BridgeFuture<'a, Result<Option<ReleaseInfo>, BridgeError>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.fetches += 1;
            match &inner.failure {
                Some(error) => Err(error.clone()),
                None => Ok(inner.latest.clone()),
            }
        })
    }
}
