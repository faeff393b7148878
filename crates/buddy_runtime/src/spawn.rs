//! Task spawning seam for fire-and-forget runtime work.

use std::{future::Future, rc::Rc};

use futures::future::LocalBoxFuture;

/// Spawns `'static` local futures on the UI executor.
///
/// Production wiring uses [`TaskSpawner::leptos`]; native tests pass a spawner backed by a
/// `futures::executor::LocalPool` so they decide when queued work runs.
#[derive(Clone)]
pub struct TaskSpawner {
    spawn: Rc<dyn Fn(LocalBoxFuture<'static, ()>)>,
}

impl TaskSpawner {
    /// Wraps a spawn function.
    pub fn new(spawn: impl Fn(LocalBoxFuture<'static, ()>) + 'static) -> Self {
        Self {
            spawn: Rc::new(spawn),
        }
    }

    /// Spawner backed by `leptos::spawn_local`.
    pub fn leptos() -> Self {
        Self::new(|task| leptos::spawn_local(task))
    }

    /// Queues `task` on the executor.
    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        (self.spawn)(Box::pin(task));
    }
}

impl std::fmt::Debug for TaskSpawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TaskSpawner")
    }
}
