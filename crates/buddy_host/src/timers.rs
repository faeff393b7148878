//! Timer host-service contracts.
//!
//! Every delayed or periodic behavior (blur-close grace, copy feedback reset, polling) goes
//! through [`TimerService`] so the runtime can be driven deterministically by
//! [`ManualTimerService`] in native tests.

use std::{cell::RefCell, rc::Rc, time::Duration};

/// Host service scheduling callbacks on the UI thread.
pub trait TimerService {
    /// Runs `callback` once after `delay`. Dropping the handle cancels it.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Runs `callback` every `period`. Dropping the handle stops it.
    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerHandle;
}

/// Drop-based cancellation handle for one scheduled timer.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TimerHandle {
    /// Creates a handle from the host's cancel callback.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Creates a handle that cancels nothing.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Cancels the timer if it has not been cancelled yet.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Timer service whose callbacks never fire.
pub struct NoopTimerService;

impl TimerService for NoopTimerService {
    fn set_timeout(&self, _delay: Duration, _callback: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::noop()
    }

    fn set_interval(&self, _period: Duration, _callback: Rc<dyn Fn()>) -> TimerHandle {
        TimerHandle::noop()
    }
}

enum ManualCallback {
    Once(Box<dyn FnOnce()>),
    Repeat(Rc<dyn Fn()>),
}

struct ManualTimer {
    id: u64,
    due: Duration,
    period: Option<Duration>,
    callback: Option<ManualCallback>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_id: u64,
    timers: Vec<ManualTimer>,
}

impl ManualClock {
    fn schedule(
        &mut self,
        delay: Duration,
        period: Option<Duration>,
        callback: ManualCallback,
    ) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.timers.push(ManualTimer {
            id,
            due: self.now + delay,
            period,
            callback: Some(callback),
        });
        id
    }

    /// Pops the earliest timer due at or before `target`, rescheduling repeating timers.
    fn take_due(&mut self, target: Duration) -> Option<ManualCallback> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= target)
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(index, _)| index)?;

        let due = self.timers[index].due;
        self.now = self.now.max(due);
        match self.timers[index].period {
            Some(period) => {
                let timer = &mut self.timers[index];
                timer.due = due + period;
                match &timer.callback {
                    Some(ManualCallback::Repeat(callback)) => {
                        Some(ManualCallback::Repeat(callback.clone()))
                    }
                    _ => None,
                }
            }
            None => self.timers.remove(index).callback,
        }
    }
}

#[derive(Clone, Default)]
/// Virtual-clock timer service advanced explicitly by tests.
pub struct ManualTimerService {
    clock: Rc<RefCell<ManualClock>>,
}

impl ManualTimerService {
    /// Creates a clock at zero with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Returns the number of armed timers.
    pub fn pending(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    /// Advances virtual time by `by`, firing every callback that comes due in order.
    ///
    /// Callbacks may schedule or cancel timers; newly scheduled timers fire within the same call
    /// when they come due before the target time.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.borrow().now + by;
        loop {
            let next = self.clock.borrow_mut().take_due(target);
            match next {
                Some(ManualCallback::Once(callback)) => callback(),
                Some(ManualCallback::Repeat(callback)) => callback(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }

    fn handle_for(&self, id: u64) -> TimerHandle {
        let weak = Rc::downgrade(&self.clock);
        TimerHandle::new(move || {
            if let Some(clock) = weak.upgrade() {
                clock.borrow_mut().timers.retain(|timer| timer.id != id);
            }
        })
    }
}

impl TimerService for ManualTimerService {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        let id = self
            .clock
            .borrow_mut()
            .schedule(delay, None, ManualCallback::Once(callback));
        self.handle_for(id)
    }

    fn set_interval(&self, period: Duration, callback: Rc<dyn Fn()>) -> TimerHandle {
        // A zero period would spin forever inside `advance`.
        let period = period.max(Duration::from_millis(1));
        let id = self
            .clock
            .borrow_mut()
            .schedule(period, Some(period), ManualCallback::Repeat(callback));
        self.handle_for(id)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        (count.clone(), count)
    }

    #[test]
    fn timeout_fires_once_at_its_deadline() {
        let timers = ManualTimerService::new();
        let (count, seen) = counter();
        let _handle = timers.set_timeout(
            Duration::from_millis(300),
            Box::new(move || count.set(count.get() + 1)),
        );

        timers.advance(Duration::from_millis(299));
        assert_eq!(seen.get(), 0);
        timers.advance(Duration::from_millis(1));
        assert_eq!(seen.get(), 1);
        timers.advance(Duration::from_secs(10));
        assert_eq!(seen.get(), 1);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn dropping_handle_cancels_timeout() {
        let timers = ManualTimerService::new();
        let (count, seen) = counter();
        let handle = timers.set_timeout(
            Duration::from_millis(10),
            Box::new(move || count.set(count.get() + 1)),
        );
        drop(handle);
        timers.advance(Duration::from_millis(50));
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn interval_fires_every_period_until_dropped() {
        let timers = ManualTimerService::new();
        let (count, seen) = counter();
        let handle = timers.set_interval(
            Duration::from_secs(5),
            Rc::new(move || count.set(count.get() + 1)),
        );

        timers.advance(Duration::from_secs(16));
        assert_eq!(seen.get(), 3);
        drop(handle);
        timers.advance(Duration::from_secs(60));
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn callbacks_may_schedule_follow_up_timers() {
        let timers = ManualTimerService::new();
        let (count, seen) = counter();
        let slot: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));
        let inner_timers = timers.clone();
        let inner_slot = slot.clone();
        let _outer = timers.set_timeout(
            Duration::from_millis(10),
            Box::new(move || {
                let count = count.clone();
                let handle = inner_timers.set_timeout(
                    Duration::from_millis(10),
                    Box::new(move || count.set(count.get() + 1)),
                );
                *inner_slot.borrow_mut() = Some(handle);
            }),
        );

        timers.advance(Duration::from_millis(25));
        assert_eq!(seen.get(), 1);
        assert_eq!(timers.now(), Duration::from_millis(25));
    }
}
