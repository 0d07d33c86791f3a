//! In-process stand-ins for the cloud streaming SDK.
//!
//! Every call is logged through `tracing`; failures are injected from
//! [`SimulationConfig`].

use tracing::{debug, info};

use camstream_core::{
    ClientFactory, ClientParams, MediaSession, MediaSourceConfig, PreviewSurface, Resolution,
    StreamError, StreamingClient, TransformMatrix,
};

use crate::config::SimulationConfig;

// ── Factory ──────────────────────────────────────────────────────

/// Builds [`SimulatedClient`]s and counts how often it was asked to.
#[derive(Debug, Default)]
pub struct SimulatedFactory {
    faults: SimulationConfig,
    created: u32,
    freed: u32,
}

impl SimulatedFactory {
    pub fn new(faults: SimulationConfig) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    /// Clients created so far.
    pub fn created(&self) -> u32 {
        self.created
    }

    /// Clients freed so far.
    pub fn freed(&self) -> u32 {
        self.freed
    }
}

impl ClientFactory for SimulatedFactory {
    type Client = SimulatedClient;

    fn create(&mut self, params: &ClientParams) -> Result<SimulatedClient, StreamError> {
        if self.faults.fail_client_creation {
            return Err(StreamError::configuration(format!(
                "cannot create client in region {}",
                params.region
            )));
        }
        self.created += 1;
        info!(
            region = %params.region,
            static_credentials = params.credentials.is_some(),
            "simulated client created"
        );
        Ok(SimulatedClient {
            faults: self.faults,
            sources: 0,
        })
    }

    fn free(&mut self) {
        self.freed += 1;
        info!("simulated client freed");
    }
}

// ── Client ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SimulatedClient {
    faults: SimulationConfig,
    sources: u32,
}

impl StreamingClient for SimulatedClient {
    type Session = SimulatedSession;

    fn create_media_source(
        &mut self,
        stream_name: &str,
        config: &MediaSourceConfig,
    ) -> Result<SimulatedSession, StreamError> {
        if self.faults.fail_source_creation {
            return Err(StreamError::configuration(format!(
                "stream {stream_name} rejected the media source"
            )));
        }
        match config {
            MediaSourceConfig::Camera(camera) => info!(
                stream = stream_name,
                camera = %camera.camera_id,
                resolution = %camera.resolution,
                fps = camera.frame_rate,
                bitrate = camera.bitrate,
                mime = %camera.encoder_mime_type,
                "camera source created"
            ),
            MediaSourceConfig::ImageFiles(frames) => info!(
                stream = stream_name,
                dir = %frames.dir.display(),
                frames = frames.len(),
                duration_ms = frames.duration().as_millis() as u64,
                "frame-file source created"
            ),
        }
        self.sources += 1;
        Ok(SimulatedSession {
            stream_name: stream_name.to_string(),
            faults: self.faults,
            streaming: false,
            surface: None,
            stills: 0,
        })
    }

    fn stop_all_media_sources(&mut self) -> Result<(), StreamError> {
        info!(sources = self.sources, "stopping all media sources");
        self.sources = 0;
        Ok(())
    }
}

// ── Session ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SimulatedSession {
    stream_name: String,
    faults: SimulationConfig,
    streaming: bool,
    surface: Option<u32>,
    stills: u32,
}

impl SimulatedSession {
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Stills requested over the session's lifetime.
    pub fn stills(&self) -> u32 {
        self.stills
    }
}

impl MediaSession for SimulatedSession {
    type Surface = SimulatedSurface;

    fn set_preview_surface(&mut self, surface: &SimulatedSurface) {
        debug!(surface = surface.id, "preview surface attached");
        self.surface = Some(surface.id);
    }

    fn start(&mut self) -> Result<(), StreamError> {
        if self.faults.fail_session_start {
            return Err(StreamError::session(format!(
                "encoder for {} refused to start",
                self.stream_name
            )));
        }
        self.streaming = true;
        info!(stream = %self.stream_name, surface = ?self.surface, "session started");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), StreamError> {
        if self.faults.fail_session_stop {
            return Err(StreamError::session(format!(
                "encoder for {} refused to stop",
                self.stream_name
            )));
        }
        self.streaming = false;
        info!(stream = %self.stream_name, "session stopped");
        Ok(())
    }

    fn capture_still(&mut self) -> Result<(), StreamError> {
        self.stills += 1;
        info!(stream = %self.stream_name, stills = self.stills, "next frame kept as a still");
        Ok(())
    }
}

// ── Surface ──────────────────────────────────────────────────────

/// A preview target that remembers what was last applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedSurface {
    id: u32,
    buffer_size: Option<Resolution>,
    transform: TransformMatrix,
}

impl SimulatedSurface {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            buffer_size: None,
            transform: TransformMatrix::IDENTITY,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn buffer_size(&self) -> Option<Resolution> {
        self.buffer_size
    }

    pub fn transform(&self) -> &TransformMatrix {
        &self.transform
    }
}

impl PreviewSurface for SimulatedSurface {
    fn set_default_buffer_size(&mut self, size: Resolution) {
        debug!(surface = self.id, %size, "default buffer size set");
        self.buffer_size = Some(size);
    }

    fn set_transform(&mut self, transform: &TransformMatrix) {
        debug!(surface = self.id, %transform, "transform set");
        self.transform = *transform;
    }
}

// ── Tests ────────────────────────────────────────────────────────
