//! Lifecycle phases of a streaming session.

use std::fmt;

/// The current phase of the streaming session.
///
/// ```text
///                 surface available
///  Idle ───────────────────────────► Starting ──► Active ◄──► Paused
///   ▲                                   │            │          │
///   │ (re-entry on a new surface)       ▼            ▼          ▼
///   └──────────────────────── Failed  Stopped ◄─────┴──────────┘
/// ```
///
/// `Stopped` and `Failed` are terminal for the current surface but accept a
/// fresh surface-available event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Nothing created yet.
    #[default]
    Idle,

    /// Client and session creation in progress.
    Starting,

    /// Session created and streaming.
    Active,

    /// Session created, capture stopped, handle retained.
    Paused,

    /// Torn down; client released.
    Stopped,

    /// Creation failed; nothing held.
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Starting => write!(f, "Starting"),
            Self::Active => write!(f, "Active"),
            Self::Paused => write!(f, "Paused"),
            Self::Stopped => write!(f, "Stopped"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl SessionState {
    /// Returns `true` while the client and session handles are held.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }

    /// Returns `true` when a surface-available event may start a session.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Failed)
    }
}
