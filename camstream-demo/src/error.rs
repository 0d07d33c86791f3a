//! Error type for the demo shell.

use thiserror::Error;

use camstream_core::StreamError;

#[derive(Debug, Error)]
pub enum DemoError {
    /// A session error escalated by the core (fatal start failures).
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A shell line could not be parsed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Reading a script or stdin failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The default configuration could not be rendered.
    #[error("config encoding error: {0}")]
    ConfigEncoding(#[from] toml::ser::Error),
}
