//! Background check for newer published releases.

use std::rc::Rc;

use buddy_host::{
    BridgeError, ExternalUrlService, HostServices, ReleaseFeed, ReleaseInfo, TimerService,
};
use leptos::{
    create_rw_signal, logging, RwSignal, SignalGet, SignalGetUntracked, SignalSet, SignalWith,
};

use crate::{
    polling::{start_polling, PollScope, PollingHandle},
    spawn::TaskSpawner,
    version::is_newer_version,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A release newer than the running build.
pub struct UpdateInfo {
    /// Version of the running build.
    pub current_version: String,
    /// Tag of the newer release.
    pub latest_version: String,
    /// Release page.
    pub release_url: String,
    /// Release notes; empty when the release has none.
    pub release_notes: String,
}

#[derive(Clone)]
/// Tracks whether a newer release exists and whether the user dismissed it.
///
/// Dismissal lives for the session only and is tied to the dismissed version: a later poll that
/// finds a release newer than the dismissed one shows the banner again.
pub struct UpdateChecker {
    current_version: Rc<str>,
    feed: Rc<dyn ReleaseFeed>,
    external_urls: Rc<dyn ExternalUrlService>,
    pending: RwSignal<Option<UpdateInfo>>,
    dismissed: RwSignal<Option<String>>,
}

impl UpdateChecker {
    /// Creates a checker for the running build. Must be called inside a reactive runtime.
    pub fn new(host: &HostServices, current_version: impl Into<String>) -> Self {
        let current_version: String = current_version.into();
        Self {
            current_version: Rc::from(current_version),
            feed: host.releases.clone(),
            external_urls: host.external_urls.clone(),
            pending: create_rw_signal(None),
            dismissed: create_rw_signal(None),
        }
    }

    fn update_from(&self, release: ReleaseInfo) -> Option<UpdateInfo> {
        is_newer_version(&self.current_version, &release.tag_name).then(|| UpdateInfo {
            current_version: self.current_version.to_string(),
            latest_version: release.tag_name,
            release_url: release.html_url,
            release_notes: release.body.unwrap_or_default(),
        })
    }

    async fn fetch(&self) -> Option<UpdateInfo> {
        match self.feed.latest_release().await {
            Ok(release) => release.and_then(|release| self.update_from(release)),
            Err(err) => {
                logging::debug_warn!("update check failed: {err}");
                None
            }
        }
    }

    /// Queries the release feed once and records a newer release.
    ///
    /// Failures are swallowed; a previously found update stays pending.
    pub async fn check_now(&self) -> Option<UpdateInfo> {
        let update = self.fetch().await?;
        self.pending.set(Some(update.clone()));
        Some(update)
    }

    async fn poll_once(&self, scope: PollScope) {
        if let Some(update) = self.fetch().await {
            if scope.is_active() {
                self.pending.set(Some(update));
            }
        }
    }

    /// Checks now and then every `period` until the handle is dropped.
    pub fn start_polling(
        &self,
        timers: &dyn TimerService,
        spawner: &TaskSpawner,
        period: std::time::Duration,
    ) -> PollingHandle {
        let checker = self.clone();
        start_polling(timers, spawner, period, move |scope| {
            let checker = checker.clone();
            async move { checker.poll_once(scope).await }
        })
    }

    /// Returns the pending update unless it was dismissed (tracked read).
    pub fn visible_update(&self) -> Option<UpdateInfo> {
        let dismissed = self.dismissed.get();
        self.pending.with(|pending| {
            pending
                .as_ref()
                .filter(|update| match &dismissed {
                    Some(dismissed) => is_newer_version(dismissed, &update.latest_version),
                    None => true,
                })
                .cloned()
        })
    }

    /// Hides the banner for the currently pending release.
    pub fn dismiss(&self) {
        if let Some(update) = self.pending.get_untracked() {
            self.dismissed.set(Some(update.latest_version));
        }
    }

    /// Opens the pending release page in the browser. Does nothing when no update is pending.
    pub async fn open_release(&self) -> Result<(), BridgeError> {
        let Some(update) = self.pending.get_untracked() else {
            return Ok(());
        };
        self.external_urls
            .open_url(&update.release_url)
            .await
            .inspect_err(|err| logging::warn!("open release page failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use buddy_host::{ManualTimerService, MemoryExternalUrlService, MemoryReleaseFeed};
    use futures::executor::{block_on, LocalPool};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::pool_spawner;

    fn release(tag: &str) -> ReleaseInfo {
        ReleaseInfo {
            tag_name: tag.to_string(),
            html_url: format!("https://github.com/xcryptp/cli-buddy/releases/tag/{tag}"),
            body: None,
        }
    }

    fn checker(feed: &MemoryReleaseFeed, urls: &MemoryExternalUrlService) -> UpdateChecker {
        let host = HostServices {
            releases: Rc::new(feed.clone()),
            external_urls: Rc::new(urls.clone()),
            ..HostServices::stub()
        };
        UpdateChecker::new(&host, "1.2.0")
    }

    #[test]
    fn newer_release_becomes_visible_with_empty_notes() {
        let _ = leptos::create_runtime();
        let feed = MemoryReleaseFeed::default();
        feed.publish(release("v1.3.0"));
        let checker = checker(&feed, &MemoryExternalUrlService::default());

        block_on(checker.check_now());
        let update = checker.visible_update().expect("update");
        assert_eq!(update.latest_version, "v1.3.0");
        assert_eq!(update.current_version, "1.2.0");
        assert_eq!(update.release_notes, "");
    }

    #[test]
    fn same_or_older_release_is_not_offered() {
        let _ = leptos::create_runtime();
        let feed = MemoryReleaseFeed::default();
        feed.publish(release("v1.2.0"));
        let checker = checker(&feed, &MemoryExternalUrlService::default());
        assert_eq!(block_on(checker.check_now()), None);
        assert_eq!(checker.visible_update(), None);
    }

    #[test]
    fn dismissal_holds_until_a_newer_release_appears() {
        let _ = leptos::create_runtime();
        let feed = MemoryReleaseFeed::default();
        feed.publish(release("v1.3.0"));
        let checker = checker(&feed, &MemoryExternalUrlService::default());

        block_on(checker.check_now());
        checker.dismiss();
        assert_eq!(checker.visible_update(), None);

        block_on(checker.check_now());
        assert_eq!(checker.visible_update(), None);

        feed.publish(release("v1.4.0"));
        block_on(checker.check_now());
        assert_eq!(
            checker.visible_update().map(|update| update.latest_version),
            Some("v1.4.0".to_string())
        );
    }

    #[test]
    fn failures_are_swallowed_and_keep_pending_update() {
        let _ = leptos::create_runtime();
        let feed = MemoryReleaseFeed::default();
        feed.publish(release("v2.0.0"));
        let checker = checker(&feed, &MemoryExternalUrlService::default());
        block_on(checker.check_now());

        feed.fail(BridgeError::Transport("rate limited".to_string()));
        assert_eq!(block_on(checker.check_now()), None);
        assert!(checker.visible_update().is_some());
    }

    #[test]
    fn polling_runs_on_the_configured_interval_until_dropped() {
        let _ = leptos::create_runtime();
        let mut pool = LocalPool::new();
        let timers = ManualTimerService::new();
        let feed = MemoryReleaseFeed::default();
        let checker = checker(&feed, &MemoryExternalUrlService::default());

        let handle = checker.start_polling(
            &timers,
            &pool_spawner(&pool),
            Duration::from_secs(30 * 60),
        );
        pool.run_until_stalled();
        assert_eq!(feed.fetch_count(), 1);

        feed.publish(release("v1.2.1"));
        timers.advance(Duration::from_secs(30 * 60));
        pool.run_until_stalled();
        assert_eq!(feed.fetch_count(), 2);
        assert!(checker.visible_update().is_some());

        drop(handle);
        timers.advance(Duration::from_secs(60 * 60));
        pool.run_until_stalled();
        assert_eq!(feed.fetch_count(), 2);
    }

    #[test]
    fn open_release_uses_external_url_service() {
        let _ = leptos::create_runtime();
        let feed = MemoryReleaseFeed::default();
        let urls = MemoryExternalUrlService::default();
        let checker = checker(&feed, &urls);

        block_on(checker.open_release()).expect("no update is a no-op");
        assert!(urls.opened().is_empty());

        feed.publish(release("v1.5.0"));
        block_on(checker.check_now());
        block_on(checker.open_release()).expect("open");
        assert_eq!(
            urls.opened(),
            vec!["https://github.com/xcryptp/cli-buddy/releases/tag/v1.5.0".to_string()]
        );
    }
}
