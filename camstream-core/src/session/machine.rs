//! Pure session state machine.
//!
//! [`SessionMachine::handle`] consumes one [`SessionEvent`] and returns the
//! [`SessionEffect`]s the driver must execute, in order. No I/O happens
//! here, so every transition is testable without a surface or a client.

use tracing::{debug, warn};

use crate::error::StreamError;
use crate::geometry::{Resolution, Viewport};
use crate::selector::select_preview_size;
use crate::session::effect::{SessionEffect, Status};
use crate::session::event::SessionEvent;
use crate::session::state::SessionState;
use crate::transform::compute_transform;

/// Session lifecycle plus the geometry inputs it recomputes from.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    state: SessionState,
    supported: Vec<Resolution>,
    viewport: Option<Viewport>,
    selection: Option<Resolution>,
    rotation_degrees: f32,
    /// When `false`, selections still size the surface buffers but no
    /// transform is ever applied.
    transform_updates: bool,
    /// Whether the driver was told to create a session that has not been
    /// released since.
    has_session: bool,
    /// `false` for sources that stream without a preview surface. Those
    /// start from the toggle and stop on host pause.
    needs_surface: bool,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new(0.0, true)
    }
}

impl SessionMachine {
    pub fn new(rotation_degrees: f32, transform_updates: bool) -> Self {
        Self {
            state: SessionState::Idle,
            supported: Vec::new(),
            viewport: None,
            selection: None,
            rotation_degrees: rotation_degrees.rem_euclid(360.0),
            transform_updates,
            has_session: false,
            needs_surface: true,
        }
    }

    /// A machine for a source that streams without a preview surface.
    pub fn without_surface(mut self) -> Self {
        self.needs_surface = false;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The resolution chosen for the current viewport, while a session
    /// is being started or is live.
    pub fn selection(&self) -> Option<Resolution> {
        self.selection
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Device rotation in `[0, 360)`.
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn has_session(&self) -> bool {
        self.has_session
    }

    pub fn needs_surface(&self) -> bool {
        self.needs_surface
    }

    /// Advance the machine by one event.
    ///
    /// Returns `Err` only when a start attempt cannot even be planned
    /// (empty resolution set); the machine is then `Failed`.
    pub fn handle(&mut self, event: SessionEvent) -> Result<Vec<SessionEffect>, StreamError> {
        let from = self.state;
        let effects = match event {
            SessionEvent::SurfaceAvailable {
                viewport,
                supported,
            } => self.surface_available(viewport, supported)?,
            SessionEvent::StartSucceeded => self.start_succeeded(),
            SessionEvent::StartFailed { reason } => self.start_failed(reason),
            SessionEvent::SurfaceSizeChanged { viewport } => self.surface_size_changed(viewport)?,
            SessionEvent::PauseRequested => self.pause(),
            SessionEvent::ResumeRequested => self.resume(),
            SessionEvent::SurfaceDestroyed => self.teardown(),
            SessionEvent::UserToggleStreaming => self.toggle(),
            SessionEvent::PhotoRequested => self.photo(),
            SessionEvent::RotationChanged { degrees } => self.rotation_changed(degrees),
        };
        if from != self.state {
            debug!(%from, to = %self.state, "session transition");
        }
        Ok(effects)
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Valid from: `Idle`, `Stopped`, `Failed`.
    fn surface_available(
        &mut self,
        viewport: Viewport,
        supported: Vec<Resolution>,
    ) -> Result<Vec<SessionEffect>, StreamError> {
        if !self.state.can_start() {
            warn!(state = %self.state, %viewport, "surface available while streaming; ignoring");
            return Ok(vec![SessionEffect::Report(Status::AlreadyStreaming)]);
        }

        self.viewport = Some(viewport);
        let preview = match select_preview_size(&supported, viewport) {
            Ok(preview) => preview,
            Err(e) => {
                self.state = SessionState::Failed;
                self.selection = None;
                return Err(e);
            }
        };
        self.supported = supported;
        self.selection = Some(preview);
        self.state = SessionState::Starting;

        let mut effects = self.geometry_effects(preview, viewport);
        effects.extend([
            SessionEffect::AcquireClient,
            SessionEffect::CreateSession {
                preview: Some(preview),
            },
            SessionEffect::StartSession,
        ]);
        Ok(effects)
    }

    /// Starts a surfaceless source from `Idle`, `Stopped` or `Failed`;
    /// otherwise tears down.
    fn toggle(&mut self) -> Vec<SessionEffect> {
        if self.needs_surface || !self.state.can_start() {
            return self.teardown();
        }
        self.state = SessionState::Starting;
        self.selection = None;
        vec![
            SessionEffect::AcquireClient,
            SessionEffect::CreateSession { preview: None },
            SessionEffect::StartSession,
        ]
    }

    /// Valid from: `Starting`.
    fn start_succeeded(&mut self) -> Vec<SessionEffect> {
        if self.state != SessionState::Starting {
            warn!(state = %self.state, "start completion outside Starting; ignoring");
            return Vec::new();
        }
        self.state = SessionState::Active;
        self.has_session = true;
        vec![SessionEffect::Report(Status::Started)]
    }

    /// Valid from: `Starting`.
    fn start_failed(&mut self, reason: String) -> Vec<SessionEffect> {
        if self.state != SessionState::Starting {
            warn!(state = %self.state, "start failure outside Starting; ignoring");
            return Vec::new();
        }
        self.state = SessionState::Failed;
        self.has_session = false;
        self.selection = None;
        vec![
            SessionEffect::ReleaseClient,
            SessionEffect::Report(Status::StartFailed { reason }),
        ]
    }

    /// Recomputes geometry in `Active` and `Paused`; elsewhere only the
    /// viewport is remembered.
    fn surface_size_changed(
        &mut self,
        viewport: Viewport,
    ) -> Result<Vec<SessionEffect>, StreamError> {
        self.viewport = Some(viewport);
        if !self.state.is_live() {
            return Ok(vec![SessionEffect::Report(Status::NotStreaming)]);
        }

        let preview = select_preview_size(&self.supported, viewport)?;
        self.selection = Some(preview);
        let mut effects = self.geometry_effects(preview, viewport);
        effects.push(SessionEffect::Report(Status::PreviewUpdated { preview }));
        Ok(effects)
    }

    /// Surfaceless sources have nothing to keep on pause and tear down.
    fn pause(&mut self) -> Vec<SessionEffect> {
        if !self.needs_surface && self.state.is_live() {
            return self.teardown();
        }
        match self.state {
            SessionState::Active => {
                self.state = SessionState::Paused;
                vec![
                    SessionEffect::StopSession,
                    SessionEffect::Report(Status::Paused),
                ]
            }
            SessionState::Paused => vec![SessionEffect::Report(Status::Paused)],
            _ => vec![SessionEffect::Report(Status::NotStreaming)],
        }
    }

    fn resume(&mut self) -> Vec<SessionEffect> {
        match self.state {
            SessionState::Paused if self.has_session => {
                self.state = SessionState::Active;
                vec![
                    SessionEffect::StartSession,
                    SessionEffect::Report(Status::Resumed),
                ]
            }
            SessionState::Active => vec![SessionEffect::Report(Status::AlreadyStreaming)],
            _ => vec![SessionEffect::Report(Status::NotStreaming)],
        }
    }

    /// Valid from any state. Release effects are only emitted while
    /// something may be held, so repeated teardowns release nothing twice.
    fn teardown(&mut self) -> Vec<SessionEffect> {
        let held = matches!(
            self.state,
            SessionState::Starting | SessionState::Active | SessionState::Paused
        );
        self.state = SessionState::Stopped;
        self.has_session = false;
        self.selection = None;

        if held {
            vec![
                SessionEffect::StopSession,
                SessionEffect::StopAllMediaSources,
                SessionEffect::ReleaseClient,
                SessionEffect::Report(Status::Stopped),
            ]
        } else {
            vec![SessionEffect::Report(Status::NotStreaming)]
        }
    }

    fn rotation_changed(&mut self, degrees: f32) -> Vec<SessionEffect> {
        if !degrees.is_finite() {
            warn!(degrees, "non-finite rotation; keeping {}", self.rotation_degrees);
            return vec![SessionEffect::Report(Status::RotationChanged {
                degrees: self.rotation_degrees,
            })];
        }
        self.rotation_degrees = degrees.rem_euclid(360.0);
        let mut effects = Vec::new();
        if self.state.is_live() && self.transform_updates {
            if let (Some(viewport), Some(preview)) = (self.viewport, self.selection) {
                effects.extend(self.transform_effect(preview, viewport));
            }
        }
        effects.push(SessionEffect::Report(Status::RotationChanged {
            degrees: self.rotation_degrees,
        }));
        effects
    }

    fn photo(&mut self) -> Vec<SessionEffect> {
        match self.state {
            SessionState::Active => vec![
                SessionEffect::CaptureStill,
                SessionEffect::Report(Status::PhotoTaken),
            ],
            _ => vec![SessionEffect::Report(Status::NotStreaming)],
        }
    }

    // ── Geometry ─────────────────────────────────────────────────

    fn geometry_effects(&self, preview: Resolution, viewport: Viewport) -> Vec<SessionEffect> {
        let mut effects = vec![SessionEffect::SetBufferSize(preview)];
        if self.transform_updates {
            effects.extend(self.transform_effect(preview, viewport));
        }
        effects
    }

    /// A zero-sized viewport yields no transform; the next resize supplies one.
    fn transform_effect(&self, preview: Resolution, viewport: Viewport) -> Option<SessionEffect> {
        match compute_transform(viewport, preview, self.rotation_degrees) {
            Ok(matrix) => Some(SessionEffect::ApplyTransform(matrix)),
            Err(e) => {
                debug!("skipping transform: {e}");
                None
            }
        }
    }
}
