//! Keyboard-event to global-shortcut accelerator conversion and the recording session.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Platform-neutral snapshot of one keyboard event.
pub struct KeyInput {
    /// DOM `KeyboardEvent.key` value.
    pub key: String,
    /// Control held.
    pub ctrl: bool,
    /// Alt/Option held.
    pub alt: bool,
    /// Shift held.
    pub shift: bool,
    /// Meta/Super/Windows held.
    pub meta: bool,
}

impl KeyInput {
    /// Creates an input without modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Adds Control.
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Adds Alt.
    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Adds Shift.
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Adds Meta.
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

const MODIFIER_KEYS: [&str; 4] = ["Control", "Alt", "Shift", "Meta"];

fn special_key(key: &str) -> Option<&'static str> {
    Some(match key {
        " " => "Space",
        "ArrowUp" => "Up",
        "ArrowDown" => "Down",
        "ArrowLeft" => "Left",
        "ArrowRight" => "Right",
        "Escape" => "Escape",
        "Enter" => "Enter",
        "Backspace" => "Backspace",
        "Delete" => "Delete",
        "Tab" => "Tab",
        "Home" => "Home",
        "End" => "End",
        "PageUp" => "PageUp",
        "PageDown" => "PageDown",
        "Insert" => "Insert",
        _ => return None,
    })
}

fn is_function_key(key: &str) -> bool {
    key.len() > 1
        && key.starts_with('F')
        && key[1..].bytes().all(|byte| byte.is_ascii_digit())
}

/// Converts a key event into an accelerator string such as `Ctrl+Shift+V`.
///
/// Modifiers are emitted in `Ctrl`, `Alt`, `Shift`, `Super` order. Returns `None` for a bare
/// modifier key and for any key pressed without a modifier.
pub fn normalize_accelerator(input: &KeyInput) -> Option<String> {
    if MODIFIER_KEYS.contains(&input.key.as_str()) {
        return None;
    }

    let modifiers: Vec<&str> = [
        (input.ctrl, "Ctrl"),
        (input.alt, "Alt"),
        (input.shift, "Shift"),
        (input.meta, "Super"),
    ]
    .into_iter()
    .filter_map(|(held, name)| held.then_some(name))
    .collect();
    if modifiers.is_empty() {
        return None;
    }

    let key = if is_function_key(&input.key) {
        input.key.clone()
    } else {
        special_key(&input.key)
            .map(str::to_string)
            .unwrap_or_else(|| input.key.to_uppercase())
    };

    let mut accelerator = modifiers.join("+");
    accelerator.push('+');
    accelerator.push_str(&key);
    Some(accelerator)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of feeding one key event to a [`ShortcutRecorder`].
pub enum RecorderEvent {
    /// No recording session is active; the event should be handled normally.
    Ignored,
    /// The event was swallowed and the session keeps waiting.
    Pending,
    /// A valid combination ended the session.
    Captured(String),
    /// Escape released; the session ended without a shortcut.
    Cancelled,
}

impl RecorderEvent {
    /// Returns whether the browser default (and propagation) should be suppressed.
    pub const fn suppress_default(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Global-shortcut recording session.
pub struct ShortcutRecorder {
    recording: bool,
}

impl ShortcutRecorder {
    /// Returns whether a session is active.
    pub const fn is_recording(&self) -> bool {
        self.recording
    }

    /// Starts a session.
    pub fn start(&mut self) {
        self.recording = true;
    }

    /// Ends the session without a shortcut.
    pub fn cancel(&mut self) {
        self.recording = false;
    }

    /// Handles a key-down. Invalid combinations keep the session waiting.
    pub fn key_down(&mut self, input: &KeyInput) -> RecorderEvent {
        if !self.recording {
            return RecorderEvent::Ignored;
        }
        match normalize_accelerator(input) {
            Some(accelerator) => {
                self.recording = false;
                RecorderEvent::Captured(accelerator)
            }
            None => RecorderEvent::Pending,
        }
    }

    /// Handles a key-up; releasing Escape cancels the session.
    pub fn key_up(&mut self, input: &KeyInput) -> RecorderEvent {
        if !self.recording {
            return RecorderEvent::Ignored;
        }
        if input.key == "Escape" {
            self.recording = false;
            return RecorderEvent::Cancelled;
        }
        RecorderEvent::Pending
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn modifiers_are_ordered_and_letters_upper_cased() {
        assert_eq!(
            normalize_accelerator(&KeyInput::new("v").shift().ctrl()),
            Some("Ctrl+Shift+V".to_string())
        );
        assert_eq!(
            normalize_accelerator(&KeyInput::new("k").meta().alt().shift().ctrl()),
            Some("Ctrl+Alt+Shift+Super+K".to_string())
        );
    }

    #[test]
    fn special_and_function_keys_keep_their_names() {
        assert_eq!(
            normalize_accelerator(&KeyInput::new(" ").alt()),
            Some("Alt+Space".to_string())
        );
        assert_eq!(
            normalize_accelerator(&KeyInput::new("ArrowLeft").ctrl()),
            Some("Ctrl+Left".to_string())
        );
        assert_eq!(
            normalize_accelerator(&KeyInput::new("F12").shift()),
            Some("Shift+F12".to_string())
        );
        assert_eq!(
            normalize_accelerator(&KeyInput::new("PageDown").ctrl()),
            Some("Ctrl+PageDown".to_string())
        );
    }

    #[test]
    fn bare_modifiers_and_unmodified_keys_are_rejected() {
        assert_eq!(normalize_accelerator(&KeyInput::new("Shift").shift()), None);
        assert_eq!(normalize_accelerator(&KeyInput::new("Control").ctrl()), None);
        assert_eq!(normalize_accelerator(&KeyInput::new("Escape")), None);
        assert_eq!(normalize_accelerator(&KeyInput::new("a")), None);
    }

    #[test]
    fn recorder_captures_first_valid_combination() {
        let mut recorder = ShortcutRecorder::default();
        assert_eq!(
            recorder.key_down(&KeyInput::new("v").ctrl()),
            RecorderEvent::Ignored
        );

        recorder.start();
        let pending = recorder.key_down(&KeyInput::new("Shift").shift());
        assert_eq!(pending, RecorderEvent::Pending);
        assert!(pending.suppress_default());
        assert_eq!(
            recorder.key_down(&KeyInput::new("v").ctrl().shift()),
            RecorderEvent::Captured("Ctrl+Shift+V".to_string())
        );
        assert!(!recorder.is_recording());
    }

    #[test]
    fn escape_release_cancels_recording() {
        let mut recorder = ShortcutRecorder::default();
        recorder.start();
        assert_eq!(
            recorder.key_down(&KeyInput::new("Escape")),
            RecorderEvent::Pending
        );
        assert_eq!(
            recorder.key_up(&KeyInput::new("Escape")),
            RecorderEvent::Cancelled
        );
        assert!(!recorder.is_recording());
    }
}
