//! # camstream-core
//!
//! Preview geometry and session lifecycle for a camera streaming client.
//!
//! This crate contains:
//! - **Geometry**: `Resolution`, `Viewport`
//! - **Selector**: `select_preview_size`, the tightest supported size covering a viewport
//! - **Transform**: `compute_transform`, the crop-to-fill preview matrix with sensor-rotation correction
//! - **Client**: collaborator traits for the streaming client, media session, surface, and camera
//! - **Media**: `MediaSourceConfig` for camera and frame-file sources
//! - **Session**: the pure `SessionMachine` and the `StreamSession` driver
//! - **Error**: `StreamError`, separating fatal from recoverable failures

pub mod client;
pub mod error;
pub mod geometry;
pub mod media;
pub mod selector;
pub mod session;
pub mod transform;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use client::{
    ClientFactory, ClientParams, Credentials, MediaSession, PreviewSurface, ResolutionProvider,
    StreamingClient,
};
pub use error::StreamError;
pub use geometry::{Resolution, Viewport};
pub use media::{CameraFacing, CameraSourceConfig, FrameSequence, MediaSourceConfig};
pub use selector::select_preview_size;
pub use session::{
    Outcome, SessionConfig, SessionEffect, SessionEvent, SessionMachine, SessionState, Status,
    StreamSession,
};
pub use transform::{TransformMatrix, compute_transform};
