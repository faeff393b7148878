//! Diagnostics payloads for the developer-tools view.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Memory pressure bucket computed by the backend.
pub enum MemoryPressure {
    /// Usage below the warning threshold.
    #[default]
    Normal,
    /// Usage above the warning threshold.
    Warning,
    /// Usage close to the configured limit.
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Memory statistics of the backend-managed VM process.
pub struct MemoryStats {
    /// Resident memory in megabytes.
    pub used_mb: u64,
    /// Configured limit in megabytes.
    pub limit_mb: u64,
    /// `used_mb / limit_mb` as a percentage.
    pub usage_percent: f64,
    /// Pressure bucket.
    pub status: MemoryPressure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One resumable CLI session discovered by the backend.
pub struct SessionRecord {
    /// Session identifier.
    pub session_id: String,
    /// Project display name.
    pub project: String,
    /// Project directory.
    pub project_path: String,
    /// Last modification timestamp as reported.
    pub last_modified: String,
    /// Number of recorded messages.
    pub message_count: u32,
    /// Transcript size in kilobytes.
    pub size_kb: u64,
    /// Shell command that resumes the session.
    pub resume_command: String,
    /// First user message, used as a topic label.
    pub topic: String,
}
