//! Bridge error type shared by every host contract.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failure of a request/response or subscription call to the backend.
pub enum BridgeError {
    /// The IPC transport itself failed (webview bridge missing, promise rejected before dispatch).
    #[error("bridge transport failed: {0}")]
    Transport(String),
    /// The backend handled the command and reported an error.
    #[error("backend rejected command: {0}")]
    Backend(String),
    /// The response payload did not match the expected shape.
    #[error("unexpected response payload: {0}")]
    Decode(String),
    /// The active host does not provide this capability.
    #[error("capability unavailable: {0}")]
    Unavailable(&'static str),
}

impl BridgeError {
    /// Returns whether the error came from the backend rather than the transport.
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_rejections_count_as_backend_errors() {
        assert!(BridgeError::Backend("locked".to_string()).is_backend());
        assert!(!BridgeError::Transport("ipc closed".to_string()).is_backend());
        assert!(!BridgeError::Unavailable("tauri-ipc").is_backend());
    }
}
