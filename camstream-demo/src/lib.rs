//! # camstream-demo: streaming session shell
//!
//! Drives a `camstream_core::StreamSession` against a simulated streaming
//! client. Host UI events (surface lifecycle, pause/resume, the streaming
//! toggle, the rotate-right button) are typed as shell commands or read
//! from a script file.
//!
//! ## Modules
//!
//! - **config**: TOML configuration and conversion to `SessionConfig`.
//! - **shell**: command parsing and dispatch to the session.
//! - **simulated**: logging stand-ins for the cloud streaming SDK.

pub mod config;
pub mod error;
pub mod shell;
pub mod simulated;
