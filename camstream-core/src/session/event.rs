//! Events consumed by the session state machine.

use crate::geometry::{Resolution, Viewport};

/// Every input the [`SessionMachine`](super::SessionMachine) reacts to.
///
/// Host events come from surface lifecycle callbacks, UI controls and
/// process pause/resume. `StartSucceeded` and `StartFailed` are fed back
/// by the driver after it has executed the start effects.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The preview surface became available.
    SurfaceAvailable {
        viewport: Viewport,
        /// Capture sizes the camera supports, in preference order.
        supported: Vec<Resolution>,
    },

    /// The preview surface was resized.
    SurfaceSizeChanged { viewport: Viewport },

    /// The preview surface is going away.
    SurfaceDestroyed,

    /// UI or host lifecycle pause.
    PauseRequested,

    /// UI or host lifecycle resume.
    ResumeRequested,

    /// The streaming toggle control was pressed. Stops a live session;
    /// for sources that need no surface it also starts one.
    UserToggleStreaming,

    /// The take-photo control was pressed.
    PhotoRequested,

    /// Device display rotation changed.
    RotationChanged { degrees: f32 },

    /// Client and session were created.
    StartSucceeded,

    /// Client or session creation failed.
    StartFailed { reason: String },
}
