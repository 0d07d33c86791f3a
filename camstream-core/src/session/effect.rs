//! Effects produced by the session state machine and the status messages
//! shown to the user.

use std::fmt;

use crate::geometry::Resolution;
use crate::transform::TransformMatrix;

/// Work the driver performs on the machine's behalf, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Size the preview surface's buffers to the selected resolution.
    SetBufferSize(Resolution),

    /// Replace the preview surface transform.
    ApplyTransform(TransformMatrix),

    /// Create the streaming client unless one is already held.
    AcquireClient,

    /// Create the media source. With a `preview`, the source captures at
    /// that size and is bound to the surface; without one it needs no
    /// surface.
    CreateSession { preview: Option<Resolution> },

    /// Start capture on the held session.
    StartSession,

    /// Stop capture on the held session.
    StopSession,

    /// Mark the next encoded frame as a still capture.
    CaptureStill,

    /// Ask the client to stop every media source it hosts.
    StopAllMediaSources,

    /// Drop the session and client handles and free the client.
    ReleaseClient,

    /// Surface a status message to the user.
    Report(Status),
}

/// A short, user-facing description of what a host event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Started,
    Resumed,
    Paused,
    Stopped,
    AlreadyStreaming,
    NotStreaming,
    PreviewUpdated { preview: Resolution },
    RotationChanged { degrees: f32 },
    PhotoTaken,
    /// A start attempt was aborted. Distinct from the routine statuses.
    StartFailed { reason: String },
}

impl Status {
    /// Returns `true` for the fatal start-failure status.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::StartFailed { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "started streaming"),
            Self::Resumed => write!(f, "resumed streaming"),
            Self::Paused => write!(f, "paused streaming"),
            Self::Stopped => write!(f, "stopped streaming"),
            Self::AlreadyStreaming => write!(f, "already streaming"),
            Self::NotStreaming => write!(f, "not streaming"),
            Self::PreviewUpdated { preview } => write!(f, "preview is now {preview}"),
            Self::RotationChanged { degrees } => write!(f, "the rotation is now {degrees}"),
            Self::PhotoTaken => write!(f, "photo taken!"),
            Self::StartFailed { reason } => write!(f, "unable to start streaming: {reason}"),
        }
    }
}
