//! Transient "copied" indicator for copy buttons.

use std::{cell::RefCell, future::Future, rc::Rc, time::Duration};

use buddy_host::{BridgeError, TimerHandle, TimerService};
use leptos::{create_rw_signal, RwSignal, SignalGetUntracked, SignalSet, SignalWith};

#[derive(Clone)]
/// Marks one key as recently copied and reverts after a fixed delay.
///
/// Marking again replaces the pending revert, so only the latest key is shown.
pub struct CopyFeedback {
    active: RwSignal<Option<String>>,
    timers: Rc<dyn TimerService>,
    duration: Duration,
    revert: Rc<RefCell<Option<TimerHandle>>>,
}

impl CopyFeedback {
    /// Creates an idle indicator. Must be called inside a reactive runtime.
    pub fn new(timers: Rc<dyn TimerService>, duration: Duration) -> Self {
        Self {
            active: create_rw_signal(None),
            timers,
            duration,
            revert: Rc::new(RefCell::new(None)),
        }
    }

    /// Shows the indicator for `key`.
    pub fn mark(&self, key: impl Into<String>) {
        self.active.set(Some(key.into()));
        let active = self.active;
        let handle = self
            .timers
            .set_timeout(self.duration, Box::new(move || active.set(None)));
        // Replacing the slot drops, and so cancels, the previous revert.
        *self.revert.borrow_mut() = Some(handle);
    }

    /// Runs `copy` and marks `key` only if it succeeds.
    pub async fn copy_with<F>(&self, key: impl Into<String>, copy: F) -> Result<(), BridgeError>
    where
        F: Future<Output = Result<(), BridgeError>>,
    {
        copy.await?;
        self.mark(key);
        Ok(())
    }

    /// Returns whether `key` is currently shown as copied (tracked read).
    pub fn is_active(&self, key: &str) -> bool {
        self.active.with(|active| active.as_deref() == Some(key))
    }

    /// Returns the key currently shown as copied.
    pub fn active_key(&self) -> Option<String> {
        self.active.get_untracked()
    }

    /// Cancels any pending revert.
    pub fn teardown(&self) {
        self.revert.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use buddy_host::ManualTimerService;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn feedback(timers: &ManualTimerService) -> CopyFeedback {
        CopyFeedback::new(Rc::new(timers.clone()), Duration::from_millis(1_500))
    }

    #[test]
    fn reverts_after_delay() {
        let _ = leptos::create_runtime();
        let timers = ManualTimerService::new();
        let feedback = feedback(&timers);

        feedback.mark("a.png");
        assert!(feedback.is_active("a.png"));
        timers.advance(Duration::from_millis(1_499));
        assert!(feedback.is_active("a.png"));
        timers.advance(Duration::from_millis(1));
        assert_eq!(feedback.active_key(), None);
    }

    #[test]
    fn re_marking_replaces_pending_revert() {
        let _ = leptos::create_runtime();
        let timers = ManualTimerService::new();
        let feedback = feedback(&timers);

        feedback.mark("a.png");
        timers.advance(Duration::from_millis(1_000));
        feedback.mark("b.png");
        assert_eq!(timers.pending(), 1);

        timers.advance(Duration::from_millis(1_000));
        assert!(feedback.is_active("b.png"));
        timers.advance(Duration::from_millis(500));
        assert_eq!(feedback.active_key(), None);
    }

    #[test]
    fn failed_copy_does_not_mark() {
        let _ = leptos::create_runtime();
        let timers = ManualTimerService::new();
        let feedback = feedback(&timers);

        let result = block_on(feedback.copy_with("a.png", async {
            Err(BridgeError::Backend("clipboard busy".to_string()))
        }));
        assert!(result.is_err());
        assert_eq!(feedback.active_key(), None);

        block_on(feedback.copy_with("a.png", async { Ok(()) })).expect("copy");
        assert!(feedback.is_active("a.png"));
    }

    #[test]
    fn teardown_cancels_revert() {
        let _ = leptos::create_runtime();
        let timers = ManualTimerService::new();
        let feedback = feedback(&timers);
        feedback.mark("a.png");
        feedback.teardown();
        assert_eq!(timers.pending(), 0);
    }
}
