//! Periodic background work owned by a drop-based handle.

use std::{cell::Cell, future::Future, rc::Rc, time::Duration};

use buddy_host::{TimerHandle, TimerService};

use crate::spawn::TaskSpawner;

#[derive(Debug, Clone)]
/// Liveness token handed to each poll tick.
///
/// Ticks check it before applying a response so results that arrive after the handle is dropped
/// are discarded.
pub struct PollScope {
    active: Rc<Cell<bool>>,
}

impl PollScope {
    /// Returns whether the owning [`PollingHandle`] is still alive.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Owns a running poll loop; dropping it stops the loop.
#[derive(Debug)]
pub struct PollingHandle {
    active: Rc<Cell<bool>>,
    _timer: TimerHandle,
}

impl PollingHandle {
    /// Returns whether the loop is running.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Returns a liveness token tied to this loop, for one-off work started alongside it.
    pub fn scope(&self) -> PollScope {
        PollScope {
            active: self.active.clone(),
        }
    }

    /// Stops the loop.
    pub fn stop(self) {}
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

/// Runs `tick` immediately and then every `period` until the returned handle is dropped.
pub fn start_polling<F, Fut>(
    timers: &dyn TimerService,
    spawner: &TaskSpawner,
    period: Duration,
    tick: F,
) -> PollingHandle
where
    F: Fn(PollScope) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let active = Rc::new(Cell::new(true));
    let run: Rc<dyn Fn()> = {
        let active = active.clone();
        let spawner = spawner.clone();
        Rc::new(move || {
            if active.get() {
                spawner.spawn(tick(PollScope {
                    active: active.clone(),
                }));
            }
        })
    };

    run();
    let timer = timers.set_interval(period, run);
    PollingHandle {
        active,
        _timer: timer,
    }
}
