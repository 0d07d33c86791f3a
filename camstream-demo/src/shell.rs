//! Line-oriented command shell standing in for the host UI.
//!
//! Each line maps onto one host callback of [`StreamSession`]:
//!
//! ```text
//! surface <W>x<H>   preview surface became available
//! resize <W>x<H>    preview surface changed size
//! destroy           preview surface destroyed
//! pause | resume    host lifecycle
//! toggle            streaming start/stop button
//! rotate            rotate-right button (+90°)
//! rotation <deg>    device rotation changed
//! photo             take-photo button
//! status            print session state
//! frames            describe the frame-file source
//! help | quit
//! ```

use std::str::FromStr;

use tracing::warn;

use camstream_core::{FrameSequence, Outcome, Resolution, StreamError, StreamSession, Viewport};

use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::simulated::{SimulatedFactory, SimulatedSurface};

pub const HELP: &str = "\
commands:
  surface <W>x<H>   attach a preview surface and start streaming
  resize <W>x<H>    resize the preview surface
  destroy           destroy the preview surface
  pause             pause streaming
  resume            resume streaming
  toggle            stop streaming, keeping the surface; starts a
                    frame-file source when nothing is streaming
  rotate            rotate the preview 90 degrees clockwise
  rotation <deg>    set the device rotation
  photo             keep the next encoded frame as a still
  status            show the session state
  frames            describe the frame-file source
  help              show this text
  quit              tear down and exit";

// ── ShellCommand ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellCommand {
    Surface(Viewport),
    Resize(Viewport),
    Destroy,
    Pause,
    Resume,
    Toggle,
    Rotate,
    Rotation(f32),
    Photo,
    Status,
    Frames,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = DemoError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| DemoError::InvalidCommand("empty line".into()))?;
        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(DemoError::InvalidCommand(format!(
                "unexpected argument '{extra}'"
            )));
        }

        let command = match (verb.to_ascii_lowercase().as_str(), arg) {
            ("surface", Some(size)) => Self::Surface(parse_size(size)?),
            ("resize", Some(size)) => Self::Resize(parse_size(size)?),
            ("rotation", Some(deg)) => Self::Rotation(parse_degrees(deg)?),
            ("surface" | "resize" | "rotation", None) => {
                return Err(DemoError::InvalidCommand(format!(
                    "'{verb}' needs an argument"
                )));
            }
            (verb, Some(arg)) if !matches!(verb, "surface" | "resize" | "rotation") => {
                return Err(DemoError::InvalidCommand(format!(
                    "'{verb}' takes no argument, got '{arg}'"
                )));
            }
            ("destroy", None) => Self::Destroy,
            ("pause", None) => Self::Pause,
            ("resume", None) => Self::Resume,
            ("toggle", None) => Self::Toggle,
            ("rotate", None) => Self::Rotate,
            ("photo", None) => Self::Photo,
            ("status", None) => Self::Status,
            ("frames", None) => Self::Frames,
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            (other, _) => {
                return Err(DemoError::InvalidCommand(format!("unknown command '{other}'")));
            }
        };
        Ok(command)
    }
}

/// Parse `<W>x<H>`.
fn parse_size(text: &str) -> Result<Viewport, DemoError> {
    let invalid = || DemoError::InvalidCommand(format!("'{text}' is not a <W>x<H> size"));
    let (w, h) = text.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = w.parse().map_err(|_| invalid())?;
    let height = h.parse().map_err(|_| invalid())?;
    Ok(Viewport::new(width, height))
}

/// Parse a finite angle in degrees.
fn parse_degrees(text: &str) -> Result<f32, DemoError> {
    text.parse::<f32>()
        .ok()
        .filter(|deg| deg.is_finite())
        .ok_or_else(|| DemoError::InvalidCommand(format!("'{text}' is not a number of degrees")))
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, DemoError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    line.parse().map(Some)
}

// ── Shell ────────────────────────────────────────────────────────

/// What the caller should do after a line.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Print(String),
    Silent,
    Quit,
}

pub type DemoSession = StreamSession<SimulatedFactory, Vec<Resolution>>;

pub struct Shell {
    session: DemoSession,
    frames: FrameSequence,
    next_surface: u32,
}

impl Shell {
    pub fn new(config: &DemoConfig) -> Self {
        let session = StreamSession::new(
            config.to_session_config(),
            SimulatedFactory::new(config.simulation),
            config.camera.supported_resolutions.clone(),
        );
        Self {
            session,
            frames: config.frame_sequence(),
            next_surface: 1,
        }
    }

    pub fn session(&self) -> &DemoSession {
        &self.session
    }

    /// Parse and run one line.
    ///
    /// Parse errors are turned into a printed hint; only fatal session
    /// errors are returned as `Err`.
    pub fn handle_line(&mut self, line: &str) -> Result<Reply, DemoError> {
        match parse_line(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Reply::Silent),
            Err(e) => {
                warn!("{e}");
                Ok(Reply::Print(format!("{e} (type 'help')")))
            }
        }
    }

    pub fn execute(&mut self, command: ShellCommand) -> Result<Reply, DemoError> {
        let outcome = match command {
            ShellCommand::Surface(viewport) => {
                let surface = SimulatedSurface::new(self.next_surface);
                self.next_surface += 1;
                self.session.on_surface_available(viewport, surface)
            }
            ShellCommand::Resize(viewport) => self.session.on_surface_size_changed(viewport),
            ShellCommand::Destroy => self.session.on_surface_destroyed(),
            ShellCommand::Pause => self.session.on_pause_requested(),
            ShellCommand::Resume => self.session.on_resume_requested(),
            ShellCommand::Toggle => self.session.on_user_toggle_streaming(),
            ShellCommand::Rotate => self.session.on_rotate_right(),
            ShellCommand::Rotation(degrees) => self.session.on_rotation_changed(degrees),
            ShellCommand::Photo => self.session.on_take_photo(),
            ShellCommand::Status => return Ok(Reply::Print(self.status())),
            ShellCommand::Frames => return Ok(Reply::Print(self.describe_frames())),
            ShellCommand::Help => return Ok(Reply::Print(HELP.into())),
            ShellCommand::Quit => {
                self.session.shutdown();
                return Ok(Reply::Quit);
            }
        };
        outcome.map(|o| Reply::Print(render(&o))).or_else(escalate)
    }

    /// `true` while a session is streaming or paused.
    pub fn is_live(&self) -> bool {
        self.session.state().is_live()
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    fn status(&self) -> String {
        let preview = self
            .session
            .selection()
            .map_or_else(|| "none".to_string(), |r| r.to_string());
        format!(
            "state: {}, preview: {preview}, rotation: {}",
            self.session.state(),
            self.session.rotation_degrees()
        )
    }

    fn describe_frames(&self) -> String {
        let frames = &self.frames;
        if frames.is_empty() {
            return "no frames configured".into();
        }
        format!(
            "{} frames ({:.1}s at {} fps): {} .. {}",
            frames.len(),
            frames.duration().as_secs_f32(),
            frames.fps,
            frames.path(frames.start_index).display(),
            frames.path(frames.end_index).display()
        )
    }
}

/// Fatal errors end the shell; anything else is shown and the shell goes on.
fn escalate(error: StreamError) -> Result<Reply, DemoError> {
    if error.is_fatal() {
        Err(error.into())
    } else {
        Ok(Reply::Print(format!("error: {error}")))
    }
}

fn render(outcome: &Outcome) -> String {
    outcome
        .recovered
        .iter()
        .fold(outcome.status.to_string(), |text, e| {
            format!("{text} (warning: {e})")
        })
}

// ── Tests ────────────────────────────────────────────────────────
