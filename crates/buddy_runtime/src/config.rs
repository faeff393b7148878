//! Runtime timing and endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Release feed polled by the update check.
pub const DEFAULT_RELEASE_FEED_URL: &str =
    "https://api.github.com/repos/xcryptp/cli-buddy/releases/latest";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Timing constants and endpoints used by runtime components.
pub struct RuntimeConfig {
    /// Delay between popup focus loss and the popup closing itself.
    pub blur_close_grace_ms: u64,
    /// How long gallery copy buttons show their "copied" state.
    pub copy_feedback_ms: u64,
    /// How long the diagnostics resume-command button shows its "copied" state.
    pub resume_copy_feedback_ms: u64,
    /// Interval between release feed polls.
    pub update_poll_interval_ms: u64,
    /// Interval between memory statistic refreshes on the diagnostics view.
    pub diagnostics_poll_ms: u64,
    /// Latest-release endpoint.
    pub release_feed_url: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            blur_close_grace_ms: 300,
            copy_feedback_ms: 1_500,
            resume_copy_feedback_ms: 2_000,
            update_poll_interval_ms: 30 * 60 * 1_000,
            diagnostics_poll_ms: 5_000,
            release_feed_url: DEFAULT_RELEASE_FEED_URL.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Popup blur-close grace period.
    pub fn blur_close_grace(&self) -> Duration {
        Duration::from_millis(self.blur_close_grace_ms)
    }

    /// Gallery copy feedback duration.
    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    /// Resume-command copy feedback duration.
    pub fn resume_copy_feedback(&self) -> Duration {
        Duration::from_millis(self.resume_copy_feedback_ms)
    }

    /// Update poll period.
    pub fn update_poll_interval(&self) -> Duration {
        Duration::from_millis(self.update_poll_interval_ms)
    }

    /// Diagnostics memory refresh period.
    pub fn diagnostics_poll(&self) -> Duration {
        Duration::from_millis(self.diagnostics_poll_ms)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config: RuntimeConfig =
            serde_json::from_value(json!({ "blur_close_grace_ms": 500 })).expect("decode");
        assert_eq!(config.blur_close_grace(), Duration::from_millis(500));
        assert_eq!(config.update_poll_interval(), Duration::from_secs(1_800));
        assert_eq!(config.release_feed_url, DEFAULT_RELEASE_FEED_URL);
    }
}
