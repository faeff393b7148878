//! Developer-tools view state: VM memory statistics and resumable sessions.

use std::{future::Future, rc::Rc};

use buddy_host::{BridgeError, CommandBridge, HostServices, MemoryStats, SessionRecord};
use leptos::{create_rw_signal, logging, RwSignal, SignalGet, SignalGetUntracked, SignalSet};

use crate::{
    config::RuntimeConfig,
    feedback::CopyFeedback,
    polling::{start_polling, PollScope, PollingHandle},
    spawn::TaskSpawner,
};

#[derive(Clone)]
/// State behind [`crate::model::FilterMode::Diagnostics`].
///
/// Failed refreshes are logged and keep the previously shown values.
pub struct DiagnosticsPanel {
    host: HostServices,
    memory: RwSignal<Option<MemoryStats>>,
    sessions: RwSignal<Vec<SessionRecord>>,
    resume_feedback: CopyFeedback,
    restarting: RwSignal<bool>,
    poll_period: std::time::Duration,
}

impl DiagnosticsPanel {
    /// Creates an empty panel. Must be called inside a reactive runtime.
    pub fn new(host: &HostServices, config: &RuntimeConfig) -> Self {
        Self {
            host: host.clone(),
            memory: create_rw_signal(None),
            sessions: create_rw_signal(Vec::new()),
            resume_feedback: CopyFeedback::new(
                host.timers.clone(),
                config.resume_copy_feedback(),
            ),
            restarting: create_rw_signal(false),
            poll_period: config.diagnostics_poll(),
        }
    }

    fn bridge(&self) -> Rc<dyn CommandBridge> {
        self.host.commands.clone()
    }

    /// Last memory statistics (tracked read).
    pub fn memory(&self) -> Option<MemoryStats> {
        self.memory.get()
    }

    /// Last session listing (tracked read).
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.sessions.get()
    }

    /// Whether a VM restart is awaiting the backend (tracked read).
    pub fn is_restarting(&self) -> bool {
        self.restarting.get()
    }

    /// Fetches memory statistics once.
    pub async fn refresh_memory(&self) -> Result<MemoryStats, BridgeError> {
        self.load_memory(None).await
    }

    /// Fetches the session listing once.
    pub async fn refresh_sessions(&self) -> Result<Vec<SessionRecord>, BridgeError> {
        self.load_sessions(None).await
    }

    async fn load_memory(&self, scope: Option<PollScope>) -> Result<MemoryStats, BridgeError> {
        let stats = self
            .bridge()
            .memory_stats()
            .await
            .inspect_err(|err| logging::warn!("memory stats load failed: {err}"))?;
        if scope.map_or(true, |scope| scope.is_active()) {
            self.memory.set(Some(stats.clone()));
        }
        Ok(stats)
    }

    async fn load_sessions(
        &self,
        scope: Option<PollScope>,
    ) -> Result<Vec<SessionRecord>, BridgeError> {
        let sessions = self
            .bridge()
            .session_list()
            .await
            .inspect_err(|err| logging::warn!("session list load failed: {err}"))?;
        if scope.map_or(true, |scope| scope.is_active()) {
            self.sessions.set(sessions.clone());
        }
        Ok(sessions)
    }

    /// Loads sessions once and refreshes memory now and on every poll period.
    ///
    /// Dropping the handle stops polling and discards responses still in flight.
    pub fn open(&self, spawner: &TaskSpawner) -> PollingHandle {
        let panel = self.clone();
        let handle = start_polling(
            self.host.timers.as_ref(),
            spawner,
            self.poll_period,
            move |scope| {
                let panel = panel.clone();
                async move {
                    let _ = panel.load_memory(Some(scope)).await;
                }
            },
        );

        let panel = self.clone();
        let scope = handle.scope();
        spawner.spawn(async move {
            let _ = panel.load_sessions(Some(scope)).await;
        });
        handle
    }

    /// Stops polling and the resume-copy indicator.
    pub fn close(&self, handle: PollingHandle) {
        drop(handle);
        self.teardown();
    }

    /// Cancels the resume-copy indicator timer.
    pub fn teardown(&self) {
        self.resume_feedback.teardown();
    }

    /// Restarts the VM, then refreshes memory statistics.
    ///
    /// Ignored while a restart is already in flight. A failed refresh after a
    /// successful restart is logged by the refresh and not reported here.
    pub async fn restart_vm(&self) -> Result<(), BridgeError> {
        if self.restarting.get_untracked() {
            return Ok(());
        }
        self.restarting.set(true);
        let restarted = self.bridge().restart_vm().await;
        self.restarting.set(false);

        let message = restarted.inspect_err(|err| logging::warn!("vm restart failed: {err}"))?;
        logging::debug_warn!("vm restart: {message}");
        let _ = self.refresh_memory().await;
        Ok(())
    }

    /// Runs the UI's clipboard write for a session's resume command and shows feedback on success.
    pub async fn copy_resume_command<F>(
        &self,
        session: &SessionRecord,
        write: F,
    ) -> Result<(), BridgeError>
    where
        F: Future<Output = Result<(), BridgeError>>,
    {
        self.resume_feedback
            .copy_with(session.session_id.clone(), write)
            .await
            .inspect_err(|err| logging::warn!("copy resume command failed: {err}"))
    }

    /// Returns whether `session_id` shows the "copied" state (tracked read).
    pub fn is_resume_copied(&self, session_id: &str) -> bool {
        self.resume_feedback.is_active(session_id)
    }
}
