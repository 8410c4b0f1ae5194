//! Falling-block puzzle engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] holds the plain data: piece shapes, the 10×20 board and the
//!   collision test.
//! - [`engine`] drives a game on top of it: the active piece, scoring and
//!   levels, the undo history and the time-based game loop.
//!
//! Rendering, audio and input devices are left to the caller. They observe
//! the engine through [`GameObserver`] and feed it [`Command`]s.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting active piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SetPieceError {
    #[display("piece colliding when setting active piece")]
    PieceCollision(PieceCollisionError),
    #[display("game is over")]
    GameOver,
}
