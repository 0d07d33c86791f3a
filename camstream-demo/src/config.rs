//! Configuration for the demo shell.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use camstream_core::{
    CameraFacing, CameraSourceConfig, ClientParams, Credentials, FrameSequence, MediaSourceConfig,
    Resolution, SessionConfig,
};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Stream and client settings.
    pub stream: StreamConfig,
    /// Camera capture settings.
    pub camera: CameraConfig,
    /// Preview display settings.
    pub display: DisplayConfig,
    /// Frame-file source settings.
    pub frames: FramesConfig,
    /// Fault injection for the simulated client.
    pub simulation: SimulationConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Which media source the session creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Camera,
    Frames,
}

/// Stream and client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Cloud stream name.
    pub stream_name: String,
    /// Service region.
    pub region: String,
    /// Media source kind: "camera" or "frames".
    pub source: SourceKind,
    /// Static access key id. Empty means use the default provider.
    pub access_key_id: String,
    /// Static secret key.
    pub secret_access_key: String,
}

/// Camera capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera identifier.
    pub camera_id: String,
    /// "front" or "back".
    pub facing: CameraFacing,
    /// Sensor mounting orientation in degrees.
    pub sensor_orientation: u16,
    /// Encoder MIME type.
    pub encoder_mime_type: String,
    /// Capture frame rate.
    pub frame_rate: u32,
    /// Encoder bitrate in kilobits per second.
    pub bitrate_kbps: u32,
    /// Key-frame interval in milliseconds.
    pub key_frame_interval_ms: u64,
    /// Stream retention in hours.
    pub retention_hours: u64,
    /// Capture sizes the simulated camera reports, in preference order.
    pub supported_resolutions: Vec<Resolution>,
}

/// Preview display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial device rotation in degrees.
    pub rotation_degrees: f32,
    /// Apply preview transforms on surface and rotation changes.
    pub transform_updates: bool,
}

/// Frame-file source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramesConfig {
    /// Playback rate.
    pub fps: u32,
    /// Directory holding the frame files.
    pub dir: String,
    /// File name format with one `%d` / `%0Nd` placeholder.
    pub filename_format: String,
    /// First frame index.
    pub start_index: u32,
    /// Last frame index (inclusive).
    pub end_index: u32,
}

/// Fault injection for the simulated client.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fail every client creation.
    pub fail_client_creation: bool,
    /// Fail every media source creation.
    pub fail_source_creation: bool,
    /// Fail every session start.
    pub fail_session_start: bool,
    /// Fail every session stop.
    pub fail_session_stop: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            stream_name: "demo-stream".into(),
            region: "us-west-2".into(),
            source: SourceKind::Camera,
            access_key_id: String::new(),
            secret_access_key: String::new(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            camera_id: "0".into(),
            facing: CameraFacing::Back,
            sensor_orientation: 90,
            encoder_mime_type: "video/avc".into(),
            frame_rate: 30,
            bitrate_kbps: 384,
            key_frame_interval_ms: 2000,
            retention_hours: 2,
            supported_resolutions: vec![
                Resolution::new(640, 480),
                Resolution::new(1280, 720),
                Resolution::new(1920, 1080),
            ],
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rotation_degrees: 0.0,
            transform_updates: true,
        }
    }
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            fps: 25,
            dir: "sample_frames".into(),
            filename_format: "frame-%03d.h264".into(),
            start_index: 1,
            end_index: 375,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl DemoConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The frame-file sequence described by `[frames]`.
    pub fn frame_sequence(&self) -> FrameSequence {
        FrameSequence {
            fps: self.frames.fps.clamp(1, 120),
            dir: PathBuf::from(&self.frames.dir),
            filename_format: self.frames.filename_format.clone(),
            start_index: self.frames.start_index,
            end_index: self.frames.end_index,
        }
    }

    /// Convert into the core `SessionConfig`.
    pub fn to_session_config(&self) -> SessionConfig {
        let credentials = (!self.stream.access_key_id.is_empty()).then(|| Credentials {
            access_key_id: self.stream.access_key_id.clone(),
            secret_access_key: self.stream.secret_access_key.clone(),
            session_token: None,
        });

        let source = match self.stream.source {
            SourceKind::Camera => MediaSourceConfig::Camera(CameraSourceConfig {
                camera_id: self.camera.camera_id.clone(),
                facing: self.camera.facing,
                sensor_orientation: self.camera.sensor_orientation % 360,
                encoder_mime_type: self.camera.encoder_mime_type.clone(),
                frame_rate: self.camera.frame_rate.clamp(1, 60),
                bitrate: self.camera.bitrate_kbps.saturating_mul(1000),
                key_frame_interval: Duration::from_millis(self.camera.key_frame_interval_ms),
                retention: Duration::from_secs(
                    self.camera.retention_hours.saturating_mul(60 * 60),
                ),
                ..CameraSourceConfig::default()
            }),
            SourceKind::Frames => MediaSourceConfig::ImageFiles(self.frame_sequence()),
        };

        SessionConfig {
            stream_name: self.stream.stream_name.clone(),
            client: ClientParams {
                region: self.stream.region.clone(),
                credentials,
            },
            source,
            rotation_degrees: self.display.rotation_degrees,
            transform_updates: self.display.transform_updates,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
