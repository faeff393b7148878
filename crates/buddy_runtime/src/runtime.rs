//! Gallery-window composition root.
//!
//! [`GalleryRuntime`] wires the history store, push-event subscription, update polling, copy
//! feedback, settings editor, and diagnostics panel over one injected [`HostServices`] bundle and
//! owns every long-lived handle so a single [`GalleryRuntime::teardown`] releases them.

use std::{cell::RefCell, rc::Rc};

use buddy_host::HostServices;
use leptos::logging;

use crate::{
    config::RuntimeConfig,
    diagnostics::DiagnosticsPanel,
    events::{attach_event_bridge, EventBridgeSubscription},
    feedback::CopyFeedback,
    polling::PollingHandle,
    settings_editor::SettingsEditor,
    spawn::TaskSpawner,
    store::HistoryStore,
    update::UpdateChecker,
};

#[derive(Default)]
struct RuntimeHandles {
    subscription: Option<EventBridgeSubscription>,
    update_polling: Option<PollingHandle>,
    diagnostics_polling: Option<PollingHandle>,
    torn_down: bool,
}

/// Long-lived state of the gallery window.
pub struct GalleryRuntime {
    host: HostServices,
    spawner: TaskSpawner,
    /// Clipboard-history store.
    pub store: HistoryStore,
    /// Release update checker.
    pub updates: UpdateChecker,
    /// "Copied" indicator for gallery copy buttons.
    pub copy_feedback: CopyFeedback,
    /// Settings panel state.
    pub settings: SettingsEditor,
    /// Developer-tools view state.
    pub diagnostics: DiagnosticsPanel,
    handles: Rc<RefCell<RuntimeHandles>>,
}

impl GalleryRuntime {
    /// Builds the runtime and starts the initial loads, the push subscription, and update polling.
    ///
    /// Must be called inside a reactive runtime.
    pub fn boot(
        host: HostServices,
        config: &RuntimeConfig,
        spawner: TaskSpawner,
        app_version: &str,
    ) -> Self {
        let store = HistoryStore::new(host.commands.clone());
        let runtime = Self {
            updates: UpdateChecker::new(&host, app_version),
            copy_feedback: CopyFeedback::new(host.timers.clone(), config.copy_feedback()),
            settings: SettingsEditor::new(store.clone()),
            diagnostics: DiagnosticsPanel::new(&host, config),
            store,
            host,
            spawner,
            handles: Rc::new(RefCell::new(RuntimeHandles::default())),
        };

        let store = runtime.store.clone();
        runtime.spawner.spawn(async move {
            futures::join!(
                store.load_all(),
                async {
                    let _ = store.fetch_monitor_status().await;
                },
                async {
                    let _ = store.fetch_settings().await;
                },
            );
        });

        let store = runtime.store.clone();
        let events = runtime.host.events.clone();
        let handles = runtime.handles.clone();
        runtime.spawner.spawn(async move {
            match attach_event_bridge(events.as_ref(), &store).await {
                Ok(subscription) => {
                    let mut handles = handles.borrow_mut();
                    if !handles.torn_down {
                        handles.subscription = Some(subscription);
                    }
                }
                Err(err) => logging::warn!("push subscription unavailable: {err}"),
            }
        });

        let polling = runtime.updates.start_polling(
            runtime.host.timers.as_ref(),
            &runtime.spawner,
            config.update_poll_interval(),
        );
        runtime.handles.borrow_mut().update_polling = Some(polling);
        runtime
    }

    /// Returns the host strategy the runtime was built with.
    pub fn host_strategy(&self) -> buddy_host::HostStrategy {
        self.host.host_strategy
    }

    /// Opens the diagnostics view, replacing any previous poll loop.
    pub fn open_diagnostics(&self) {
        let handle = self.diagnostics.open(&self.spawner);
        self.handles.borrow_mut().diagnostics_polling = Some(handle);
    }

    /// Closes the diagnostics view.
    pub fn close_diagnostics(&self) {
        let handle = self.handles.borrow_mut().diagnostics_polling.take();
        if let Some(handle) = handle {
            self.diagnostics.close(handle);
        }
    }

    /// Releases every subscription, poll loop, and timer; late responses are ignored.
    pub fn teardown(&self) {
        let released = {
            let mut handles = self.handles.borrow_mut();
            handles.torn_down = true;
            (
                handles.subscription.take(),
                handles.update_polling.take(),
                handles.diagnostics_polling.take(),
            )
        };
        drop(released);
        self.store.teardown();
        self.copy_feedback.teardown();
        self.diagnostics.teardown();
    }
}

impl Drop for GalleryRuntime {
    fn drop(&mut self) {
        self.teardown();
    }
}
