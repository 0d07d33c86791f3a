//! Domain-specific error types for camstream.
//!
//! All fallible operations return `Result<T, StreamError>`.
//! No panics on invalid input: every error is typed, and
//! [`StreamError::is_fatal`] tells callers whether to propagate or log.

use thiserror::Error;

use crate::geometry::{Resolution, Viewport};

/// The canonical error type for camstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    // ── Fatal ────────────────────────────────────────────────────
    /// The streaming client or media source could not be constructed
    /// (bad credentials, region, or client setup).
    #[error("configuration error: {0}")]
    Configuration(String),

    // ── Recoverable ──────────────────────────────────────────────
    /// A start, stop, or release call on a live session failed.
    #[error("session error: {0}")]
    Session(String),

    // ── Input contract ───────────────────────────────────────────
    /// The camera reported no supported resolutions.
    #[error("supported resolution set is empty")]
    EmptyResolutionSet,

    /// A viewport or preview with a zero dimension was supplied.
    #[error("degenerate geometry: viewport {viewport}, preview {preview}")]
    DegenerateGeometry {
        viewport: Viewport,
        preview: Resolution,
    },
}

impl StreamError {
    /// Returns `true` for errors that abort a start attempt and must be
    /// escalated to the host.
    ///
    /// `Session` errors are recovered locally; everything else is fatal
    /// when it occurs while starting.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Session(_))
    }

    /// Promote a recoverable error to a fatal one, for failures that
    /// happen while creating the client or session.
    pub fn into_fatal(self) -> Self {
        match self {
            Self::Session(reason) => Self::Configuration(reason),
            other => other,
        }
    }

    /// Build a `Configuration` error from anything displayable.
    pub fn configuration(reason: impl std::fmt::Display) -> Self {
        Self::Configuration(reason.to_string())
    }

    /// Build a `Session` error from anything displayable.
    pub fn session(reason: impl std::fmt::Display) -> Self {
        Self::Session(reason.to_string())
    }
}
