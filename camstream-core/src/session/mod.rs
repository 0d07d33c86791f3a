//! Streaming-session lifecycle.
//!
//! | Module    | Purpose                                              |
//! |-----------|------------------------------------------------------|
//! | `state`   | `SessionState` phases                                |
//! | `event`   | Closed set of host and driver events                 |
//! | `effect`  | Effects the machine emits and user-facing `Status`   |
//! | `machine` | Pure `(state, event) -> effects` transition logic    |
//! | `driver`  | `StreamSession`, which executes effects and owns handles |

pub mod driver;
pub mod effect;
pub mod event;
pub mod machine;
pub mod state;

pub use driver::{Outcome, SessionConfig, StreamSession};
pub use effect::{SessionEffect, Status};
pub use event::SessionEvent;
pub use machine::SessionMachine;
pub use state::SessionState;
