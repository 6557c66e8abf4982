//! Tank Battle: a side-scrolling tank game simulation.
//!
//! The library holds the whole simulation (entities, level factory, camera and
//! the [`Session`](session::Session) state machine). Drawing, audio playback
//! and raw input polling belong to the host; see `main.rs` for the terminal host.

pub mod audio;
pub mod camera;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod level;
pub mod session;

pub use config::GameConfig;
pub use error::GameError;
pub use input::{Action, InputState};
pub use session::{Phase, RenderSnapshot, Session};
