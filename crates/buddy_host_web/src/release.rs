//! GitHub release feed adapter.

use buddy_host::{BridgeError, BridgeFuture, ReleaseFeed, ReleaseInfo};
use serde_json::Value;

use crate::bridge;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Release feed reading a GitHub `releases/latest` endpoint.
///
/// A non-success HTTP status (no release yet, rate limiting) reads as "no release".
pub struct GithubReleaseFeed {
    url: String,
}

impl GithubReleaseFeed {
    /// Creates a feed for the given `releases/latest` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Returns the endpoint this feed reads.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn decode_release(value: Value) -> Result<ReleaseInfo, BridgeError> {
    serde_json::from_value(value).map_err(|e| BridgeError::Decode(format!("release feed: {e}")))
}

impl ReleaseFeed for GithubReleaseFeed {
    fn latest_release<'a>(&'a self) -> BridgeFuture<'a, Result<Option<ReleaseInfo>, BridgeError>> {
        Box::pin(async move {
            bridge::fetch_json(&self.url)
                .await?
                .map(decode_release)
                .transpose()
        })
    }
}
