//! Media-source configuration handed to
//! [`StreamingClient::create_media_source`](crate::client::StreamingClient::create_media_source).

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::Resolution;

// ── MediaSourceConfig ────────────────────────────────────────────

/// What a media source streams from.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSourceConfig {
    /// Live camera capture.
    Camera(CameraSourceConfig),
    /// A numbered sequence of pre-encoded frame files.
    ImageFiles(FrameSequence),
}

impl Default for MediaSourceConfig {
    fn default() -> Self {
        Self::Camera(CameraSourceConfig::default())
    }
}

impl MediaSourceConfig {
    /// Camera whose resolutions drive preview selection, if any.
    pub fn camera_id(&self) -> Option<&str> {
        match self {
            Self::Camera(camera) => Some(&camera.camera_id),
            Self::ImageFiles(_) => None,
        }
    }

    /// Whether the source draws into a preview surface. Frame files
    /// stream without one.
    pub fn needs_surface(&self) -> bool {
        matches!(self, Self::Camera(_))
    }

    /// The configuration to create a source with once `preview` is chosen.
    pub fn for_preview(&self, preview: Resolution) -> Self {
        match self {
            Self::Camera(camera) => Self::Camera(camera.with_resolution(preview)),
            Self::ImageFiles(frames) => Self::ImageFiles(frames.clone()),
        }
    }
}

// ── Camera ───────────────────────────────────────────────────────

/// Which way the camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Front,
    #[default]
    Back,
}

/// Capture and encoder settings for a camera media source.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSourceConfig {
    pub camera_id: String,
    pub facing: CameraFacing,
    /// Sensor mounting orientation in degrees.
    pub sensor_orientation: u16,
    pub encoder_mime_type: String,
    pub frame_rate: u32,
    /// Encoder bitrate in bits per second.
    pub bitrate: u32,
    pub key_frame_interval: Duration,
    pub retention: Duration,
    /// Capture size; filled with the preview selection when the session
    /// is created.
    pub resolution: Resolution,
}

impl Default for CameraSourceConfig {
    fn default() -> Self {
        Self {
            camera_id: "0".into(),
            facing: CameraFacing::Back,
            sensor_orientation: 90,
            encoder_mime_type: "video/avc".into(),
            frame_rate: 30,
            bitrate: 384_000,
            key_frame_interval: Duration::from_secs(2),
            retention: Duration::from_secs(2 * 60 * 60),
            resolution: Resolution::new(1280, 720),
        }
    }
}

impl CameraSourceConfig {
    /// Copy of this config capturing at `resolution`.
    pub fn with_resolution(&self, resolution: Resolution) -> Self {
        Self {
            resolution,
            ..self.clone()
        }
    }
}

// ── FrameSequence ────────────────────────────────────────────────

/// A directory of numbered frame files replayed at a fixed rate.
///
/// `filename_format` holds a single printf-style index placeholder:
/// `%d`, or `%0Nd` for zero padding to `N` digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    pub fps: u32,
    pub dir: PathBuf,
    pub filename_format: String,
    pub start_index: u32,
    /// Inclusive.
    pub end_index: u32,
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self {
            fps: 25,
            dir: PathBuf::from("sample_frames"),
            filename_format: "frame-%03d.h264".into(),
            start_index: 1,
            end_index: 375,
        }
    }
}

impl FrameSequence {
    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        if self.end_index < self.start_index {
            0
        } else {
            (self.end_index - self.start_index) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How long the sequence plays at `fps`.
    pub fn duration(&self) -> Duration {
        if self.fps == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.len() as f64 / f64::from(self.fps))
    }

    /// File name for frame `index`.
    pub fn filename(&self, index: u32) -> String {
        format_index(&self.filename_format, index)
    }

    /// Path of frame `index` inside `dir`.
    pub fn path(&self, index: u32) -> PathBuf {
        self.dir.join(self.filename(index))
    }

    /// Paths of every frame, in playback order.
    pub fn paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        (self.start_index..=self.end_index).map(move |i| self.path(i))
    }
}

/// Expand the first `%d` / `%0Nd` placeholder in `format` with `index`.
///
/// A format without a placeholder is returned unchanged.
fn format_index(format: &str, index: u32) -> String {
    let Some(start) = format.find('%') else {
        return format.to_string();
    };
    let directive = &format[start + 1..];
    let Some(d_pos) = directive.find('d') else {
        return format.to_string();
    };
    let width_digits = &directive[..d_pos];
    if !width_digits.chars().all(|c| c.is_ascii_digit()) {
        return format.to_string();
    }
    let width: usize = width_digits.trim_start_matches('0').parse().unwrap_or(0);
    let zero_pad = width_digits.starts_with('0');

    let number = if zero_pad {
        format!("{index:0width$}")
    } else {
        format!("{index:width$}")
    };
    format!("{}{}{}", &format[..start], number, &directive[d_pos + 1..])
}
