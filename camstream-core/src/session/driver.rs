//! Session driver.
//!
//! [`StreamSession`] owns the collaborators and the (client, session)
//! handle pair, feeds host callbacks into the [`SessionMachine`], and
//! executes the effects it returns:
//!
//! 1. The host calls an `on_*` method.
//! 2. The machine turns the event into effects.
//! 3. Each effect is executed against the surface, client, or session.
//! 4. Creation failures abort the remaining effects and are fed back as
//!    `StartFailed`; start/stop failures are logged and recorded.
//!
//! All calls are synchronous. Hosts that deliver callbacks from several
//! threads must serialize access to the driver.

use tracing::{debug, error, info, warn};

use crate::client::{
    ClientFactory, ClientOf, ClientParams, MediaSession, PreviewSurface, ResolutionProvider,
    SessionOf, StreamingClient, SurfaceOf,
};
use crate::error::StreamError;
use crate::geometry::{Resolution, Viewport};
use crate::media::MediaSourceConfig;
use crate::session::effect::{SessionEffect, Status};
use crate::session::event::SessionEvent;
use crate::session::machine::SessionMachine;
use crate::session::state::SessionState;

// ── SessionConfig ────────────────────────────────────────────────

/// Configuration for [`StreamSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Name of the cloud stream the media source publishes to.
    pub stream_name: String,
    /// Region and credentials for the streaming client.
    pub client: ClientParams,
    /// What the media source streams.
    pub source: MediaSourceConfig,
    /// Initial device rotation in degrees.
    pub rotation_degrees: f32,
    /// Apply preview transforms to the surface.
    pub transform_updates: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stream_name: "demo-stream".into(),
            client: ClientParams {
                region: "us-west-2".into(),
                credentials: None,
            },
            source: MediaSourceConfig::default(),
            rotation_degrees: 0.0,
            transform_updates: true,
        }
    }
}

// ── Outcome ──────────────────────────────────────────────────────

/// What one host callback did.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: Status,
    /// Non-fatal collaborator errors logged while handling the callback.
    pub recovered: Vec<StreamError>,
}

impl Outcome {
    fn new(status: Status) -> Self {
        Self {
            status,
            recovered: Vec::new(),
        }
    }

    /// Returns `true` when no collaborator call failed.
    pub fn is_clean(&self) -> bool {
        self.recovered.is_empty()
    }
}

// ── StreamSession ────────────────────────────────────────────────

/// Drives one streaming session through its lifecycle.
///
/// The session and client handles are `Some` exactly while the machine is
/// `Active` or `Paused`.
pub struct StreamSession<F: ClientFactory, P: ResolutionProvider> {
    config: SessionConfig,
    factory: F,
    resolutions: P,
    machine: SessionMachine,
    surface: Option<SurfaceOf<F>>,
    client: Option<ClientOf<F>>,
    session: Option<SessionOf<F>>,
}

impl<F: ClientFactory, P: ResolutionProvider> StreamSession<F, P> {
    pub fn new(config: SessionConfig, factory: F, resolutions: P) -> Self {
        let mut machine = SessionMachine::new(config.rotation_degrees, config.transform_updates);
        if !config.source.needs_surface() {
            machine = machine.without_surface();
        }
        Self {
            config,
            factory,
            resolutions,
            machine,
            surface: None,
            client: None,
            session: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    /// The preview resolution currently in use.
    pub fn selection(&self) -> Option<Resolution> {
        self.machine.selection()
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.machine.rotation_degrees()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    // ── Host callbacks ───────────────────────────────────────────

    /// The preview surface is ready: select, transform, create, start.
    ///
    /// Returns `Err` when the client or session cannot be created; the
    /// session is then `Failed` with nothing held. The surface is ignored
    /// if a session is already live.
    pub fn on_surface_available(
        &mut self,
        viewport: Viewport,
        surface: SurfaceOf<F>,
    ) -> Result<Outcome, StreamError> {
        let camera_id = self.config.source.camera_id().unwrap_or_default();
        let supported = self.resolutions.supported_resolutions(camera_id);
        debug!(%viewport, count = supported.len(), "surface available");

        let effects = self
            .machine
            .handle(SessionEvent::SurfaceAvailable {
                viewport,
                supported,
            })
            .inspect_err(|e| error!("unable to start streaming: {e}"))?;

        if self.machine.state() != SessionState::Starting {
            return self.execute(effects);
        }

        self.surface = Some(surface);
        self.complete_start(effects)
    }

    /// The preview surface was resized.
    pub fn on_surface_size_changed(&mut self, viewport: Viewport) -> Result<Outcome, StreamError> {
        self.dispatch(SessionEvent::SurfaceSizeChanged { viewport })
    }

    /// The preview surface is gone: tear everything down.
    pub fn on_surface_destroyed(&mut self) -> Result<Outcome, StreamError> {
        let outcome = self.dispatch(SessionEvent::SurfaceDestroyed);
        self.surface = None;
        outcome
    }

    pub fn on_pause_requested(&mut self) -> Result<Outcome, StreamError> {
        self.dispatch(SessionEvent::PauseRequested)
    }

    pub fn on_resume_requested(&mut self) -> Result<Outcome, StreamError> {
        self.dispatch(SessionEvent::ResumeRequested)
    }

    /// The streaming toggle was pressed: tear down, keeping the surface.
    ///
    /// Sources that need no surface are started instead when nothing is
    /// streaming; creation failures are then returned as `Err` as in
    /// [`on_surface_available`](Self::on_surface_available).
    pub fn on_user_toggle_streaming(&mut self) -> Result<Outcome, StreamError> {
        let effects = self.machine.handle(SessionEvent::UserToggleStreaming)?;
        if self.machine.state() == SessionState::Starting {
            self.complete_start(effects)
        } else {
            self.execute(effects)
        }
    }

    /// The take-photo control was pressed.
    pub fn on_take_photo(&mut self) -> Result<Outcome, StreamError> {
        self.dispatch(SessionEvent::PhotoRequested)
    }

    /// The device display rotation changed.
    pub fn on_rotation_changed(&mut self, degrees: f32) -> Result<Outcome, StreamError> {
        self.dispatch(SessionEvent::RotationChanged { degrees })
    }

    /// Rotate the preview a quarter turn clockwise.
    pub fn on_rotate_right(&mut self) -> Result<Outcome, StreamError> {
        let degrees = (self.machine.rotation_degrees() + 90.0) % 360.0;
        self.on_rotation_changed(degrees)
    }

    /// Tear down whatever is held. Safe to call at any time.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.dispatch(SessionEvent::SurfaceDestroyed) {
            warn!("shutdown: {e}");
        }
        self.surface = None;
    }

    // ── Effect execution ─────────────────────────────────────────

    /// Execute planned start effects and feed the result back into the
    /// machine.
    fn complete_start(&mut self, effects: Vec<SessionEffect>) -> Result<Outcome, StreamError> {
        let mut outcome = Outcome::new(Status::NotStreaming);
        match self.run(effects, &mut outcome) {
            Ok(()) => {
                let effects = self.machine.handle(SessionEvent::StartSucceeded)?;
                self.run(effects, &mut outcome)?;
                info!(stream = %self.config.stream_name, "streaming started");
                Ok(outcome)
            }
            Err(e) => {
                error!("unable to start streaming: {e}");
                let effects = self.machine.handle(SessionEvent::StartFailed {
                    reason: e.to_string(),
                })?;
                self.run(effects, &mut outcome)?;
                Err(e)
            }
        }
    }

    fn dispatch(&mut self, event: SessionEvent) -> Result<Outcome, StreamError> {
        let effects = self.machine.handle(event)?;
        self.execute(effects)
    }

    fn execute(&mut self, effects: Vec<SessionEffect>) -> Result<Outcome, StreamError> {
        let mut outcome = Outcome::new(Status::NotStreaming);
        self.run(effects, &mut outcome)?;
        Ok(outcome)
    }

    /// Execute `effects` in order, stopping at the first fatal error.
    fn run(
        &mut self,
        effects: Vec<SessionEffect>,
        outcome: &mut Outcome,
    ) -> Result<(), StreamError> {
        for effect in effects {
            self.apply(effect, outcome)?;
        }
        Ok(())
    }

    fn apply(&mut self, effect: SessionEffect, outcome: &mut Outcome) -> Result<(), StreamError> {
        match effect {
            SessionEffect::SetBufferSize(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.set_default_buffer_size(size);
                }
            }
            SessionEffect::ApplyTransform(matrix) => {
                if let Some(surface) = self.surface.as_mut() {
                    debug!(%matrix, "applying preview transform");
                    surface.set_transform(&matrix);
                }
            }
            SessionEffect::AcquireClient => {
                if self.client.is_none() {
                    let client = self
                        .factory
                        .create(&self.config.client)
                        .map_err(StreamError::into_fatal)?;
                    info!(region = %self.config.client.region, "streaming client created");
                    self.client = Some(client);
                }
            }
            SessionEffect::CreateSession { preview } => {
                let client = self
                    .client
                    .as_mut()
                    .ok_or_else(|| StreamError::configuration("no streaming client"))?;
                let source = match preview {
                    Some(preview) => self.config.source.for_preview(preview),
                    None => self.config.source.clone(),
                };
                let surface = match preview {
                    Some(_) => Some(
                        self.surface
                            .as_ref()
                            .ok_or_else(|| StreamError::configuration("no preview surface"))?,
                    ),
                    None => None,
                };
                let mut session = client
                    .create_media_source(&self.config.stream_name, &source)
                    .map_err(StreamError::into_fatal)?;
                if let Some(surface) = surface {
                    session.set_preview_surface(surface);
                }
                info!(?preview, stream = %self.config.stream_name, "media source created");
                self.session = Some(session);
            }
            SessionEffect::StartSession => {
                if let Some(session) = self.session.as_mut() {
                    if let Err(e) = session.start() {
                        warn!("unable to resume streaming: {e}");
                        outcome.recovered.push(e);
                    }
                }
            }
            SessionEffect::StopSession => {
                if let Some(session) = self.session.as_mut() {
                    if let Err(e) = session.stop() {
                        warn!("unable to pause streaming: {e}");
                        outcome.recovered.push(e);
                    }
                }
            }
            SessionEffect::CaptureStill => {
                if let Some(session) = self.session.as_mut() {
                    if let Err(e) = session.capture_still() {
                        warn!("unable to take photo: {e}");
                        outcome.recovered.push(e);
                    }
                }
            }
            SessionEffect::StopAllMediaSources => {
                if let Some(client) = self.client.as_mut() {
                    if let Err(e) = client.stop_all_media_sources() {
                        warn!("failed to stop media sources: {e}");
                        outcome.recovered.push(e);
                    }
                }
            }
            SessionEffect::ReleaseClient => {
                self.session = None;
                if self.client.take().is_some() {
                    self.factory.free();
                    info!("streaming client released");
                }
            }
            SessionEffect::Report(status) => {
                outcome.status = status;
            }
        }
        Ok(())
    }
}

impl<F: ClientFactory, P: ResolutionProvider> Drop for StreamSession<F, P> {
    fn drop(&mut self) {
        if self.client.is_some() || self.session.is_some() {
            self.shutdown();
        }
    }
}
