//! Integration tests: full session lifecycle against recording fake
//! collaborators: start, resize, pause/resume, teardown, frame-file
//! sources, and failure paths.

use std::cell::RefCell;
use std::rc::Rc;

use camstream_core::{
    ClientFactory, ClientParams, FrameSequence, MediaSession, MediaSourceConfig, PreviewSurface,
    Resolution, SessionConfig, SessionState, Status, StreamError, StreamSession, StreamingClient,
    TransformMatrix, Viewport,
};

// ── Fakes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateClient,
    FreeClient,
    CreateSource(Resolution),
    CreateFrameSource(usize),
    SetPreviewSurface,
    Start,
    Stop,
    CaptureStill,
    StopAll,
    BufferSize(Resolution),
    Transform,
}

#[derive(Debug, Clone, Default)]
struct Log(Rc<RefCell<Vec<Call>>>);

impl Log {
    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    create_client: bool,
    create_source: bool,
    start: bool,
    stop: bool,
}

struct FakeFactory {
    log: Log,
    faults: Faults,
}

struct FakeClient {
    log: Log,
    faults: Faults,
}

struct FakeSession {
    log: Log,
    faults: Faults,
}

struct FakeSurface {
    log: Log,
}

impl ClientFactory for FakeFactory {
    type Client = FakeClient;

    fn create(&mut self, _params: &ClientParams) -> Result<FakeClient, StreamError> {
        if self.faults.create_client {
            return Err(StreamError::configuration("invalid credentials"));
        }
        self.log.push(Call::CreateClient);
        Ok(FakeClient {
            log: self.log.clone(),
            faults: self.faults,
        })
    }

    fn free(&mut self) {
        self.log.push(Call::FreeClient);
    }
}

impl StreamingClient for FakeClient {
    type Session = FakeSession;

    fn create_media_source(
        &mut self,
        _stream_name: &str,
        config: &MediaSourceConfig,
    ) -> Result<FakeSession, StreamError> {
        if self.faults.create_source {
            return Err(StreamError::session("camera unavailable"));
        }
        match config {
            MediaSourceConfig::Camera(camera) => {
                self.log.push(Call::CreateSource(camera.resolution));
            }
            MediaSourceConfig::ImageFiles(frames) => {
                self.log.push(Call::CreateFrameSource(frames.len()));
            }
        }
        Ok(FakeSession {
            log: self.log.clone(),
            faults: self.faults,
        })
    }

    fn stop_all_media_sources(&mut self) -> Result<(), StreamError> {
        self.log.push(Call::StopAll);
        Ok(())
    }
}

impl MediaSession for FakeSession {
    type Surface = FakeSurface;

    fn set_preview_surface(&mut self, _surface: &FakeSurface) {
        self.log.push(Call::SetPreviewSurface);
    }

    fn start(&mut self) -> Result<(), StreamError> {
        self.log.push(Call::Start);
        if self.faults.start {
            return Err(StreamError::session("encoder busy"));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), StreamError> {
        self.log.push(Call::Stop);
        if self.faults.stop {
            return Err(StreamError::session("camera disconnected"));
        }
        Ok(())
    }

    fn capture_still(&mut self) -> Result<(), StreamError> {
        self.log.push(Call::CaptureStill);
        Ok(())
    }
}

impl PreviewSurface for FakeSurface {
    fn set_default_buffer_size(&mut self, size: Resolution) {
        self.log.push(Call::BufferSize(size));
    }

    fn set_transform(&mut self, _transform: &TransformMatrix) {
        self.log.push(Call::Transform);
    }
}

// ── Helpers ──────────────────────────────────────────────────────

type Session = StreamSession<FakeFactory, Vec<Resolution>>;

fn supported() -> Vec<Resolution> {
    vec![
        Resolution::new(640, 480),
        Resolution::new(1280, 720),
        Resolution::new(1920, 1080),
    ]
}

fn session_with(faults: Faults) -> (Session, Log) {
    session_for(SessionConfig::default(), faults)
}

fn frames_session_with(faults: Faults) -> (Session, Log) {
    let config = SessionConfig {
        source: MediaSourceConfig::ImageFiles(FrameSequence::default()),
        ..SessionConfig::default()
    };
    session_for(config, faults)
}

fn session_for(config: SessionConfig, faults: Faults) -> (Session, Log) {
    let log = Log::default();
    let factory = FakeFactory {
        log: log.clone(),
        faults,
    };
    (StreamSession::new(config, factory, supported()), log)
}

fn surface(log: &Log) -> FakeSurface {
    FakeSurface { log: log.clone() }
}

fn portrait() -> Viewport {
    Viewport::new(720, 1280)
}

fn assert_handles_match_state(session: &Session) {
    let live = session.state().is_live();
    assert_eq!(session.has_client(), live, "client in {}", session.state());
    assert_eq!(session.has_session(), live, "session in {}", session.state());
}

// ── Start ────────────────────────────────────────────────────────

#[test]
fn surface_available_starts_streaming() {
    let (mut session, log) = session_with(Faults::default());

    let outcome = session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();

    assert_eq!(outcome.status, Status::Started);
    assert!(outcome.is_clean());
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.selection(), Some(Resolution::new(1280, 720)));
    assert_eq!(
        log.calls(),
        vec![
            Call::BufferSize(Resolution::new(1280, 720)),
            Call::Transform,
            Call::CreateClient,
            Call::CreateSource(Resolution::new(1280, 720)),
            Call::SetPreviewSurface,
            Call::Start,
        ]
    );
    assert_handles_match_state(&session);
}

#[test]
fn failing_client_creation_is_fatal_and_never_active() {
    let (mut session, log) = session_with(Faults {
        create_client: true,
        ..Default::default()
    });

    let err = session
        .on_surface_available(portrait(), surface(&log))
        .unwrap_err();

    assert!(matches!(err, StreamError::Configuration(_)));
    assert!(err.is_fatal());
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(log.count(&Call::Start), 0);
    assert_eq!(log.count(&Call::FreeClient), 0);
    assert_handles_match_state(&session);
}

#[test]
fn failing_source_creation_releases_the_client() {
    let (mut session, log) = session_with(Faults {
        create_source: true,
        ..Default::default()
    });

    let err = session
        .on_surface_available(portrait(), surface(&log))
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(log.count(&Call::CreateClient), 1);
    assert_eq!(log.count(&Call::FreeClient), 1);
    assert_eq!(log.count(&Call::Start), 0);
    assert_handles_match_state(&session);
}

#[test]
fn teardown_after_failed_start_is_a_noop() {
    let (mut session, log) = session_with(Faults {
        create_client: true,
        ..Default::default()
    });
    assert!(session.on_surface_available(portrait(), surface(&log)).is_err());

    let outcome = session.on_surface_destroyed().unwrap();
    assert_eq!(outcome.status, Status::NotStreaming);
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(log.count(&Call::FreeClient), 0);
}

#[test]
fn start_failure_after_creation_is_recovered() {
    let (mut session, log) = session_with(Faults {
        start: true,
        ..Default::default()
    });

    let outcome = session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();

    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(outcome.recovered.len(), 1);
    assert!(!outcome.recovered[0].is_fatal());
    assert_handles_match_state(&session);
}

#[test]
fn second_surface_while_active_is_ignored() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();
    log.clear();

    let outcome = session
        .on_surface_available(Viewport::new(1920, 1080), surface(&log))
        .unwrap();

    assert_eq!(outcome.status, Status::AlreadyStreaming);
    assert!(log.calls().is_empty());
    assert_eq!(session.selection(), Some(Resolution::new(1280, 720)));
}

// ── Geometry updates ─────────────────────────────────────────────

#[test]
fn resize_reapplies_geometry_without_restart() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();
    log.clear();

    let outcome = session
        .on_surface_size_changed(Viewport::new(1080, 1920))
        .unwrap();

    assert_eq!(
        outcome.status,
        Status::PreviewUpdated {
            preview: Resolution::new(1920, 1080)
        }
    );
    assert_eq!(
        log.calls(),
        vec![Call::BufferSize(Resolution::new(1920, 1080)), Call::Transform]
    );
    assert_eq!(session.state(), SessionState::Active);
}

#[test]
fn rotate_right_advances_a_quarter_turn() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();
    log.clear();

    for expected in [90.0, 180.0, 270.0, 0.0] {
        let outcome = session.on_rotate_right().unwrap();
        assert_eq!(outcome.status, Status::RotationChanged { degrees: expected });
    }
    assert_eq!(log.count(&Call::Transform), 4);
}

// ── Pause / resume ───────────────────────────────────────────────

#[test]
fn pause_and_resume_keep_the_session() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();
    log.clear();

    let outcome = session.on_pause_requested().unwrap();
    assert_eq!(outcome.status, Status::Paused);
    assert_eq!(session.state(), SessionState::Paused);
    assert_handles_match_state(&session);

    let outcome = session.on_resume_requested().unwrap();
    assert_eq!(outcome.status, Status::Resumed);
    assert_eq!(session.state(), SessionState::Active);

    assert_eq!(log.calls(), vec![Call::Stop, Call::Start]);
}

#[test]
fn pause_failure_still_pauses() {
    let (mut session, log) = session_with(Faults {
        stop: true,
        ..Default::default()
    });
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();

    let outcome = session.on_pause_requested().unwrap();

    assert_eq!(session.state(), SessionState::Paused);
    assert_eq!(outcome.status, Status::Paused);
    assert_eq!(outcome.recovered.len(), 1);
}

#[test]
fn resume_failure_still_resumes() {
    let (mut session, log) = session_with(Faults {
        start: true,
        ..Default::default()
    });
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();
    session.on_pause_requested().unwrap();

    let outcome = session.on_resume_requested().unwrap();

    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(outcome.status, Status::Resumed);
    assert_eq!(outcome.recovered.len(), 1);
    assert!(!outcome.recovered[0].is_fatal());
    assert_handles_match_state(&session);
}

#[test]
fn pause_while_idle_reports_not_streaming() {
    let (mut session, log) = session_with(Faults::default());

    let outcome = session.on_pause_requested().unwrap();

    assert_eq!(outcome.status, Status::NotStreaming);
    assert_eq!(session.state(), SessionState::Idle);
    assert!(log.calls().is_empty());
}

#[test]
fn resume_while_idle_reports_not_streaming() {
    let (mut session, log) = session_with(Faults::default());
    let outcome = session.on_resume_requested().unwrap();
    assert_eq!(outcome.status, Status::NotStreaming);
    assert!(log.calls().is_empty());
}

// ── Teardown ─────────────────────────────────────────────────────

#[test]
fn teardown_releases_everything_once() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();

    let first = session.on_user_toggle_streaming().unwrap();
    let second = session.on_surface_destroyed().unwrap();

    assert_eq!(first.status, Status::Stopped);
    assert_eq!(second.status, Status::NotStreaming);
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(log.count(&Call::StopAll), 1);
    assert_eq!(log.count(&Call::FreeClient), 1);
    assert_handles_match_state(&session);
}

#[test]
fn teardown_from_paused_releases() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();
    session.on_pause_requested().unwrap();

    session.on_surface_destroyed().unwrap();

    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(log.count(&Call::StopAll), 1);
    assert_eq!(log.count(&Call::FreeClient), 1);
    assert_handles_match_state(&session);
}

#[test]
fn teardown_with_failing_stop_still_releases() {
    let (mut session, log) = session_with(Faults {
        stop: true,
        ..Default::default()
    });
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();

    let outcome = session.on_surface_destroyed().unwrap();

    assert_eq!(outcome.status, Status::Stopped);
    assert_eq!(outcome.recovered.len(), 1);
    assert_eq!(log.count(&Call::FreeClient), 1);
    assert_handles_match_state(&session);
}

#[test]
fn teardown_without_any_session_is_a_noop() {
    let (mut session, log) = session_with(Faults::default());

    session.on_surface_destroyed().unwrap();
    session.on_user_toggle_streaming().unwrap();

    assert!(log.calls().is_empty());
    assert_eq!(session.state(), SessionState::Stopped);
}

#[test]
fn restart_after_stop_uses_a_fresh_client() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();
    session.on_surface_destroyed().unwrap();

    let outcome = session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();

    assert_eq!(outcome.status, Status::Started);
    assert_eq!(log.count(&Call::CreateClient), 2);
    assert_eq!(log.count(&Call::FreeClient), 1);
    assert_handles_match_state(&session);
}

#[test]
fn dropping_a_live_session_releases_the_client() {
    let log = Log::default();
    {
        let factory = FakeFactory {
            log: log.clone(),
            faults: Faults::default(),
        };
        let mut session = StreamSession::new(SessionConfig::default(), factory, supported());
        session
            .on_surface_available(portrait(), surface(&log))
            .unwrap();
    }
    assert_eq!(log.count(&Call::StopAll), 1);
    assert_eq!(log.count(&Call::FreeClient), 1);
}

// ── Photo ────────────────────────────────────────────────────────

#[test]
fn photo_marks_a_still_while_streaming() {
    let (mut session, log) = session_with(Faults::default());
    session
        .on_surface_available(portrait(), surface(&log))
        .unwrap();

    let outcome = session.on_take_photo().unwrap();

    assert_eq!(outcome.status, Status::PhotoTaken);
    assert_eq!(log.count(&Call::CaptureStill), 1);
}

#[test]
fn photo_while_idle_reports_not_streaming() {
    let (mut session, log) = session_with(Faults::default());
    let outcome = session.on_take_photo().unwrap();
    assert_eq!(outcome.status, Status::NotStreaming);
    assert!(log.calls().is_empty());
}

// ── Frame-file sources ───────────────────────────────────────────

#[test]
fn toggle_starts_and_stops_a_frame_source() {
    let (mut session, log) = frames_session_with(Faults::default());

    let outcome = session.on_user_toggle_streaming().unwrap();

    assert_eq!(outcome.status, Status::Started);
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(session.selection(), None);
    assert_eq!(
        log.calls(),
        vec![Call::CreateClient, Call::CreateFrameSource(375), Call::Start]
    );
    assert_handles_match_state(&session);
    log.clear();

    let outcome = session.on_user_toggle_streaming().unwrap();

    assert_eq!(outcome.status, Status::Stopped);
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(log.calls(), vec![Call::Stop, Call::StopAll, Call::FreeClient]);
    assert_handles_match_state(&session);

    session.on_user_toggle_streaming().unwrap();
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(log.count(&Call::CreateClient), 1);
}

#[test]
fn host_pause_stops_a_frame_source() {
    let (mut session, log) = frames_session_with(Faults::default());
    session.on_user_toggle_streaming().unwrap();

    let outcome = session.on_pause_requested().unwrap();

    assert_eq!(outcome.status, Status::Stopped);
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(log.count(&Call::FreeClient), 1);
    assert_handles_match_state(&session);
}

#[test]
fn frame_source_client_failure_is_fatal() {
    let (mut session, log) = frames_session_with(Faults {
        create_client: true,
        ..Default::default()
    });

    let err = session.on_user_toggle_streaming().unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(session.state(), SessionState::Failed);
    assert!(log.calls().is_empty());
    assert_handles_match_state(&session);
}
