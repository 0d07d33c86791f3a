//! Collaborator interfaces for the streaming client.
//!
//! The session driver never talks to a concrete SDK. Hosts provide these
//! traits; tests provide recording fakes. All calls are synchronous and
//! may fail; background capture and encoding are the implementor's
//! business.

use std::fmt;

use crate::error::StreamError;
use crate::geometry::Resolution;
use crate::media::MediaSourceConfig;
use crate::transform::TransformMatrix;

// ── ClientParams ─────────────────────────────────────────────────

/// Static credentials for a streaming client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything a [`ClientFactory`] needs to build a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientParams {
    pub region: String,
    /// `None` defers to whatever default provider the factory uses.
    pub credentials: Option<Credentials>,
}

// ── Traits ───────────────────────────────────────────────────────

/// The on-screen target the camera feed is drawn into.
pub trait PreviewSurface {
    /// Size of the buffers the camera will produce into this surface.
    fn set_default_buffer_size(&mut self, size: Resolution);

    /// Replace the surface transform. Never composed with the previous one.
    fn set_transform(&mut self, transform: &TransformMatrix);
}

/// A live binding between camera capture and a cloud stream.
pub trait MediaSession {
    type Surface: PreviewSurface;

    fn set_preview_surface(&mut self, surface: &Self::Surface);

    fn start(&mut self) -> Result<(), StreamError>;

    fn stop(&mut self) -> Result<(), StreamError>;

    /// Flag the next encoded frame to be kept as a still image.
    fn capture_still(&mut self) -> Result<(), StreamError>;
}

/// A constructed streaming client that can host media sources.
pub trait StreamingClient {
    type Session: MediaSession;

    fn create_media_source(
        &mut self,
        stream_name: &str,
        config: &MediaSourceConfig,
    ) -> Result<Self::Session, StreamError>;

    fn stop_all_media_sources(&mut self) -> Result<(), StreamError>;
}

/// Builds and frees the process-wide streaming client.
pub trait ClientFactory {
    type Client: StreamingClient;

    /// Fails with [`StreamError::Configuration`] on bad region or credentials.
    fn create(&mut self, params: &ClientParams) -> Result<Self::Client, StreamError>;

    /// Release whatever process-wide state `create` set up.
    fn free(&mut self);
}

/// Reports the capture sizes a camera supports, in preference order.
pub trait ResolutionProvider {
    fn supported_resolutions(&self, camera_id: &str) -> Vec<Resolution>;
}

/// A fixed resolution list, independent of camera id.
impl ResolutionProvider for Vec<Resolution> {
    fn supported_resolutions(&self, _camera_id: &str) -> Vec<Resolution> {
        self.clone()
    }
}

// ── Type aliases ─────────────────────────────────────────────────

pub type ClientOf<F> = <F as ClientFactory>::Client;
pub type SessionOf<F> = <ClientOf<F> as StreamingClient>::Session;
pub type SurfaceOf<F> = <SessionOf<F> as MediaSession>::Surface;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_secrets() {
        let creds = Credentials {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "wJalrXUtnFEMI".into(),
            session_token: Some("token".into()),
        };
        let text = format!("{creds:?}");
        assert!(text.contains("AKIDEXAMPLE"));
        assert!(!text.contains("wJalrXUtnFEMI"));
        assert!(!text.contains("\"token\""));
    }

    #[test]
    fn vec_provider_ignores_camera_id() {
        let provider = vec![Resolution::new(640, 480)];
        assert_eq!(provider.supported_resolutions("1"), provider);
    }
}
