//! Quick-paste popup: selection state machine and its effect runner.
//!
//! [`reduce_popup`] is pure and returns [`PopupEffect`] intents. [`PopupController`] owns the
//! state signal, feeds user input and bridge responses through the reducer, and executes the
//! resulting effects against the injected host services.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
    time::Duration,
};

use buddy_host::{
    ClipboardEntry, CommandBridge, HostServices, ItemKind, PopupWindow, TimerHandle, TimerService,
};
use leptos::{
    create_rw_signal, logging, ReadSignal, RwSignal, SignalGetUntracked, SignalSet,
    SignalWithUntracked,
};

use crate::{config::RuntimeConfig, spawn::TaskSpawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Keys the popup reacts to.
pub enum PopupKey {
    /// Move the selection down.
    ArrowDown,
    /// Move the selection up.
    ArrowUp,
    /// Paste the selected entry.
    Enter,
    /// Close the popup.
    Escape,
    /// Anything else.
    Other,
}

impl PopupKey {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Self {
        match key {
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            _ => Self::Other,
        }
    }

    /// Returns whether the key drives list navigation.
    pub const fn is_navigation(self) -> bool {
        matches!(self, Self::ArrowDown | Self::ArrowUp | Self::Enter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Listing lifecycle of the popup.
pub enum PopupPhase {
    /// Waiting for the merged history listing.
    #[default]
    Loading,
    /// Nothing to show (no history, or the listing failed).
    Empty,
    /// Entries are listed with one selected.
    Listing {
        /// Merged history, newest first.
        entries: Vec<ClipboardEntry>,
        /// Selected row; always `< entries.len()`.
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Full popup state.
pub struct PopupState {
    /// Listing lifecycle.
    pub phase: PopupPhase,
    /// A paste request is awaiting its response.
    pub paste_in_flight: bool,
    /// A blur-close timer is armed.
    pub blur_close_pending: bool,
    /// The title region is being dragged.
    pub dragging: bool,
    /// The popup asked its window to close; every later action is ignored.
    pub closed: bool,
}

impl PopupState {
    /// Returns the selected row index while listing.
    pub fn selected_index(&self) -> Option<usize> {
        match &self.phase {
            PopupPhase::Listing { selected, .. } => Some(*selected),
            _ => None,
        }
    }

    /// Returns the selected entry while listing.
    pub fn selected_entry(&self) -> Option<&ClipboardEntry> {
        match &self.phase {
            PopupPhase::Listing { entries, selected } => entries.get(*selected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inputs accepted by [`reduce_popup`].
pub enum PopupAction {
    /// The popup view mounted.
    Mounted,
    /// The merged history listing arrived.
    EntriesLoaded(Vec<ClipboardEntry>),
    /// The merged history listing failed.
    FetchFailed,
    /// A key went down.
    Key(PopupKey),
    /// The pointer entered row `index`.
    Hover(usize),
    /// The in-flight paste settled.
    PasteSettled {
        /// Whether the backend pasted the entry.
        succeeded: bool,
    },
    /// The window lost focus.
    FocusLost,
    /// The window regained focus.
    FocusGained,
    /// Dragging of the title region started.
    DragStarted,
    /// Dragging of the title region ended.
    DragEnded,
    /// The blur-close grace period elapsed.
    BlurGraceElapsed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_popup`].
pub enum PopupEffect {
    /// Request the merged history listing.
    FetchEntries,
    /// Scroll row `index` into view.
    ScrollIntoView(usize),
    /// Paste an entry into the focused application.
    Paste {
        /// Text content or image path.
        content: String,
        /// Entry kind.
        kind: ItemKind,
    },
    /// Arm the blur-close timer.
    ScheduleBlurClose,
    /// Disarm the blur-close timer.
    CancelBlurClose,
    /// Close the popup window.
    CloseWindow,
}

fn close(state: &mut PopupState) -> Vec<PopupEffect> {
    let mut effects = Vec::with_capacity(2);
    if state.blur_close_pending {
        state.blur_close_pending = false;
        effects.push(PopupEffect::CancelBlurClose);
    }
    state.closed = true;
    effects.push(PopupEffect::CloseWindow);
    effects
}

fn select(state: &mut PopupState, index: usize) -> Vec<PopupEffect> {
    match &mut state.phase {
        PopupPhase::Listing { entries, selected }
            if index < entries.len() && index != *selected =>
        {
            *selected = index;
            vec![PopupEffect::ScrollIntoView(index)]
        }
        _ => Vec::new(),
    }
}

/// Applies `action` to `state` and returns the effects to execute.
///
/// Selection clamps at both ends without wrapping. Out-of-range hovers and actions that do not
/// apply to the current phase are ignored.
pub fn reduce_popup(state: &mut PopupState, action: PopupAction) -> Vec<PopupEffect> {
    if state.closed {
        return Vec::new();
    }

    match action {
        PopupAction::Mounted => {
            *state = PopupState::default();
            vec![PopupEffect::FetchEntries]
        }
        PopupAction::EntriesLoaded(entries) => {
            if state.phase != PopupPhase::Loading {
                return Vec::new();
            }
            if entries.is_empty() {
                state.phase = PopupPhase::Empty;
                Vec::new()
            } else {
                state.phase = PopupPhase::Listing {
                    entries,
                    selected: 0,
                };
                vec![PopupEffect::ScrollIntoView(0)]
            }
        }
        PopupAction::FetchFailed => {
            if state.phase == PopupPhase::Loading {
                state.phase = PopupPhase::Empty;
            }
            Vec::new()
        }
        PopupAction::Key(PopupKey::ArrowDown) => match state.selected_index() {
            Some(selected) => select(state, selected + 1),
            None => Vec::new(),
        },
        PopupAction::Key(PopupKey::ArrowUp) => match state.selected_index() {
            Some(selected) if selected > 0 => select(state, selected - 1),
            _ => Vec::new(),
        },
        PopupAction::Key(PopupKey::Enter) => {
            if state.paste_in_flight {
                return Vec::new();
            }
            let Some((content, kind)) = state
                .selected_entry()
                .map(|entry| {
                    let (content, kind) = entry.paste_payload();
                    (content.to_string(), kind)
                })
            else {
                return Vec::new();
            };
            state.paste_in_flight = true;
            vec![PopupEffect::Paste { content, kind }]
        }
        PopupAction::Key(PopupKey::Escape) => close(state),
        PopupAction::Key(PopupKey::Other) => Vec::new(),
        PopupAction::Hover(index) => select(state, index),
        PopupAction::PasteSettled { succeeded } => {
            state.paste_in_flight = false;
            if succeeded {
                close(state)
            } else {
                Vec::new()
            }
        }
        PopupAction::FocusLost => {
            if state.dragging || state.blur_close_pending {
                return Vec::new();
            }
            state.blur_close_pending = true;
            vec![PopupEffect::ScheduleBlurClose]
        }
        PopupAction::FocusGained => {
            if !state.blur_close_pending {
                return Vec::new();
            }
            state.blur_close_pending = false;
            vec![PopupEffect::CancelBlurClose]
        }
        PopupAction::DragStarted => {
            state.dragging = true;
            Vec::new()
        }
        PopupAction::DragEnded => {
            state.dragging = false;
            Vec::new()
        }
        PopupAction::BlurGraceElapsed => {
            if !state.blur_close_pending {
                return Vec::new();
            }
            state.blur_close_pending = false;
            close(state)
        }
    }
}

struct PopupInner {
    state: RwSignal<PopupState>,
    bridge: Rc<dyn CommandBridge>,
    timers: Rc<dyn TimerService>,
    window: Rc<dyn PopupWindow>,
    spawner: TaskSpawner,
    blur_close_grace: Duration,
    blur_timer: RefCell<Option<TimerHandle>>,
    torn_down: Cell<bool>,
}

#[derive(Clone)]
/// Drives the popup reducer and executes its effects.
pub struct PopupController {
    inner: Rc<PopupInner>,
}

impl PopupController {
    /// Creates a controller in the `Loading` phase. Must be called inside a reactive runtime.
    pub fn new(host: &HostServices, config: &RuntimeConfig, spawner: TaskSpawner) -> Self {
        Self {
            inner: Rc::new(PopupInner {
                state: create_rw_signal(PopupState::default()),
                bridge: host.commands.clone(),
                timers: host.timers.clone(),
                window: host.popup_window.clone(),
                spawner,
                blur_close_grace: config.blur_close_grace(),
                blur_timer: RefCell::new(None),
                torn_down: Cell::new(false),
            }),
        }
    }

    fn from_weak(weak: &Weak<PopupInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Read-only state signal for the view.
    pub fn state(&self) -> ReadSignal<PopupState> {
        self.inner.state.read_only()
    }

    /// Untracked copy of the current state.
    pub fn snapshot(&self) -> PopupState {
        self.inner.state.get_untracked()
    }

    /// Starts loading the merged history listing.
    pub fn mount(&self) {
        self.dispatch(PopupAction::Mounted);
    }

    /// Handles a key-down and returns whether the default action should be suppressed.
    pub fn key_down(&self, key: &str) -> bool {
        let key = PopupKey::from_key(key);
        let listing = self
            .inner
            .state
            .with_untracked(|state| matches!(state.phase, PopupPhase::Listing { .. }));
        self.dispatch(PopupAction::Key(key));
        listing && key.is_navigation()
    }

    /// Handles the pointer entering row `index`.
    pub fn hover(&self, index: usize) {
        self.dispatch(PopupAction::Hover(index));
    }

    /// Pastes the entry at `index` (pointer click).
    ///
    /// Ignored when `index` is not a listed row.
    pub fn activate(&self, index: usize) {
        let listed = self.inner.state.with_untracked(|state| match &state.phase {
            PopupPhase::Listing { entries, .. } => index < entries.len(),
            _ => false,
        });
        if !listed {
            return;
        }
        self.dispatch(PopupAction::Hover(index));
        self.dispatch(PopupAction::Key(PopupKey::Enter));
    }

    /// Handles window focus loss.
    pub fn focus_lost(&self) {
        self.dispatch(PopupAction::FocusLost);
    }

    /// Handles window focus regain.
    pub fn focus_gained(&self) {
        self.dispatch(PopupAction::FocusGained);
    }

    /// Handles the start of a title-region drag.
    pub fn drag_started(&self) {
        self.dispatch(PopupAction::DragStarted);
    }

    /// Handles the end of a title-region drag.
    pub fn drag_ended(&self) {
        self.dispatch(PopupAction::DragEnded);
    }

    /// Cancels the blur timer; later responses and input are ignored.
    pub fn teardown(&self) {
        self.inner.torn_down.set(true);
        self.inner.blur_timer.borrow_mut().take();
    }

    fn dispatch(&self, action: PopupAction) {
        if self.inner.torn_down.get() {
            return;
        }
        let mut next = self.inner.state.get_untracked();
        let effects = reduce_popup(&mut next, action);
        if self.inner.state.with_untracked(|current| *current != next) {
            self.inner.state.set(next);
        }
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&self, effect: PopupEffect) {
        match effect {
            PopupEffect::FetchEntries => {
                let bridge = self.inner.bridge.clone();
                let weak = Rc::downgrade(&self.inner);
                self.inner.spawner.spawn(async move {
                    let action = match bridge.list_clipboard_history().await {
                        Ok(entries) => PopupAction::EntriesLoaded(entries),
                        Err(err) => {
                            logging::warn!("popup history load failed: {err}");
                            PopupAction::FetchFailed
                        }
                    };
                    if let Some(controller) = Self::from_weak(&weak) {
                        controller.dispatch(action);
                    }
                });
            }
            PopupEffect::ScrollIntoView(index) => self.inner.window.scroll_entry_into_view(index),
            PopupEffect::Paste { content, kind } => {
                let bridge = self.inner.bridge.clone();
                let weak = Rc::downgrade(&self.inner);
                self.inner.spawner.spawn(async move {
                    let succeeded = match bridge.paste_from_history(&content, kind).await {
                        Ok(()) => true,
                        Err(err) => {
                            logging::warn!("popup paste failed: {err}");
                            false
                        }
                    };
                    if let Some(controller) = Self::from_weak(&weak) {
                        controller.dispatch(PopupAction::PasteSettled { succeeded });
                    }
                });
            }
            PopupEffect::ScheduleBlurClose => {
                let weak = Rc::downgrade(&self.inner);
                let handle = self.inner.timers.set_timeout(
                    self.inner.blur_close_grace,
                    Box::new(move || {
                        if let Some(controller) = Self::from_weak(&weak) {
                            controller.dispatch(PopupAction::BlurGraceElapsed);
                        }
                    }),
                );
                *self.inner.blur_timer.borrow_mut() = Some(handle);
            }
            PopupEffect::CancelBlurClose => {
                self.inner.blur_timer.borrow_mut().take();
            }
            PopupEffect::CloseWindow => {
                self.inner.blur_timer.borrow_mut().take();
                let window = self.inner.window.clone();
                self.inner.spawner.spawn(async move {
                    if let Err(err) = window.close().await {
                        logging::warn!("popup close failed: {err}");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use buddy_host::{
        BridgeCommand, BridgeError, ManualTimerService, MemoryCommandBridge, MemoryPopupWindow,
    };
    use futures::executor::LocalPool;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{image, pool_spawner, text};

    fn listing(len: usize, selected: usize) -> PopupState {
        PopupState {
            phase: PopupPhase::Listing {
                entries: (0..len)
                    .map(|index| text(&format!("t{index}"), "2025-01-01T00:00:00Z").into())
                    .collect(),
                selected,
            },
            ..PopupState::default()
        }
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut state = listing(5, 0);
        assert!(reduce_popup(&mut state, PopupAction::Key(PopupKey::ArrowUp)).is_empty());
        assert_eq!(state.selected_index(), Some(0));

        let mut state = listing(5, 4);
        assert!(reduce_popup(&mut state, PopupAction::Key(PopupKey::ArrowDown)).is_empty());
        assert_eq!(state.selected_index(), Some(4));

        assert_eq!(
            reduce_popup(&mut state, PopupAction::Key(PopupKey::ArrowUp)),
            vec![PopupEffect::ScrollIntoView(3)]
        );
    }

    #[test]
    fn hover_outside_the_list_is_ignored() {
        let mut state = listing(3, 1);
        assert!(reduce_popup(&mut state, PopupAction::Hover(7)).is_empty());
        assert_eq!(state.selected_index(), Some(1));
        assert_eq!(
            reduce_popup(&mut state, PopupAction::Hover(2)),
            vec![PopupEffect::ScrollIntoView(2)]
        );
    }

    #[test]
    fn second_enter_during_paste_is_ignored() {
        let mut state = listing(2, 1);
        assert_eq!(
            reduce_popup(&mut state, PopupAction::Key(PopupKey::Enter)),
            vec![PopupEffect::Paste {
                content: "copied t1".to_string(),
                kind: ItemKind::Text,
            }]
        );
        assert!(reduce_popup(&mut state, PopupAction::Key(PopupKey::Enter)).is_empty());
    }

    #[test]
    fn focus_loss_while_dragging_keeps_popup_open() {
        let mut state = listing(1, 0);
        reduce_popup(&mut state, PopupAction::DragStarted);
        assert!(reduce_popup(&mut state, PopupAction::FocusLost).is_empty());
        reduce_popup(&mut state, PopupAction::DragEnded);
        assert_eq!(
            reduce_popup(&mut state, PopupAction::FocusLost),
            vec![PopupEffect::ScheduleBlurClose]
        );
    }

    #[test]
    fn escape_closes_even_while_loading() {
        let mut state = PopupState::default();
        assert_eq!(
            reduce_popup(&mut state, PopupAction::Key(PopupKey::Escape)),
            vec![PopupEffect::CloseWindow]
        );
        assert!(state.closed);
        assert!(reduce_popup(&mut state, PopupAction::EntriesLoaded(Vec::new())).is_empty());
    }

    struct Harness {
        pool: LocalPool,
        bridge: MemoryCommandBridge,
        timers: ManualTimerService,
        window: MemoryPopupWindow,
        controller: PopupController,
    }

    fn harness() -> Harness {
        let pool = LocalPool::new();
        let bridge = MemoryCommandBridge::new();
        let timers = ManualTimerService::new();
        let window = MemoryPopupWindow::default();
        let host = HostServices {
            commands: Rc::new(bridge.clone()),
            timers: Rc::new(timers.clone()),
            popup_window: Rc::new(window.clone()),
            ..HostServices::stub()
        };
        let controller =
            PopupController::new(&host, &RuntimeConfig::default(), pool_spawner(&pool));
        Harness {
            pool,
            bridge,
            timers,
            window,
            controller,
        }
    }

    #[test]
    fn mount_lists_history_with_first_row_selected() {
        let _ = leptos::create_runtime();
        let mut h = harness();
        h.bridge.set_images(vec![image("a.png", "2025-01-01T00:00:02Z")]);
        h.bridge.set_text_items(vec![text("t1", "2025-01-01T00:00:01Z")]);

        h.controller.mount();
        assert_eq!(h.controller.snapshot().phase, PopupPhase::Loading);
        h.pool.run_until_stalled();

        let state = h.controller.snapshot();
        assert_eq!(state.selected_index(), Some(0));
        assert_eq!(state.selected_entry().map(ClipboardEntry::key), Some("a.png"));
        assert_eq!(h.window.scrolled(), vec![0]);
    }

    #[test]
    fn failed_listing_shows_empty() {
        let _ = leptos::create_runtime();
        let mut h = harness();
        h.bridge.fail(
            BridgeCommand::ListClipboardHistory,
            BridgeError::Transport("ipc closed".to_string()),
        );

        h.controller.mount();
        h.pool.run_until_stalled();
        assert_eq!(h.controller.snapshot().phase, PopupPhase::Empty);
        assert!(!h.controller.key_down("ArrowDown"));
    }

    #[test]
    fn enter_pastes_selection_then_closes() {
        let _ = leptos::create_runtime();
        let mut h = harness();
        h.bridge.set_text_items(vec![
            text("t2", "2025-01-01T00:00:02Z"),
            text("t1", "2025-01-01T00:00:01Z"),
        ]);
        h.controller.mount();
        h.pool.run_until_stalled();

        assert!(h.controller.key_down("ArrowDown"));
        assert!(h.controller.key_down("Enter"));
        h.pool.run_until_stalled();

        assert_eq!(
            h.bridge.pasted(),
            vec![("copied t1".to_string(), ItemKind::Text)]
        );
        assert_eq!(h.window.close_count(), 1);
        assert!(h.controller.snapshot().closed);
    }

    #[test]
    fn activating_an_unlisted_row_pastes_nothing() {
        let _ = leptos::create_runtime();
        let mut h = harness();
        h.bridge.set_text_items(vec![
            text("t2", "2025-01-01T00:00:02Z"),
            text("t1", "2025-01-01T00:00:01Z"),
        ]);
        h.controller.mount();
        h.pool.run_until_stalled();

        h.controller.activate(5);
        h.pool.run_until_stalled();
        assert!(h.bridge.pasted().is_empty());
        assert!(!h.controller.snapshot().paste_in_flight);

        h.controller.activate(1);
        h.pool.run_until_stalled();
        assert_eq!(
            h.bridge.pasted(),
            vec![("copied t1".to_string(), ItemKind::Text)]
        );
    }

    #[test]
    fn failed_paste_keeps_popup_open() {
        let _ = leptos::create_runtime();
        let mut h = harness();
        h.bridge.set_text_items(vec![text("t1", "2025-01-01T00:00:01Z")]);
        h.bridge.fail(
            BridgeCommand::PasteFromHistory,
            BridgeError::Backend("focus lost".to_string()),
        );
        h.controller.mount();
        h.pool.run_until_stalled();

        h.controller.key_down("Enter");
        h.pool.run_until_stalled();

        let state = h.controller.snapshot();
        assert!(!state.closed);
        assert!(!state.paste_in_flight);
        assert_eq!(h.window.close_count(), 0);
    }

    #[test]
    fn blur_closes_after_grace_unless_focus_returns() {
        let _ = leptos::create_runtime();
        let mut h = harness();
        h.controller.mount();
        h.pool.run_until_stalled();

        h.controller.focus_lost();
        h.timers.advance(Duration::from_millis(200));
        h.controller.focus_gained();
        h.timers.advance(Duration::from_millis(500));
        h.pool.run_until_stalled();
        assert_eq!(h.window.close_count(), 0);

        h.controller.focus_lost();
        h.timers.advance(Duration::from_millis(300));
        h.pool.run_until_stalled();
        assert_eq!(h.window.close_count(), 1);
    }

    #[test]
    fn teardown_clears_blur_timer_and_ignores_late_listing() {
        let _ = leptos::create_runtime();
        let mut h = harness();
        h.bridge.set_text_items(vec![text("t1", "2025-01-01T00:00:01Z")]);
        let gate = h.bridge.hold_responses();
        h.controller.mount();
        h.pool.run_until_stalled();
        h.controller.focus_lost();
        assert_eq!(h.timers.pending(), 1);

        h.controller.teardown();
        assert_eq!(h.timers.pending(), 0);
        gate.release();
        h.pool.run_until_stalled();

        assert_eq!(h.controller.snapshot().phase, PopupPhase::Loading);
        assert!(h.window.scrolled().is_empty());
    }
}
