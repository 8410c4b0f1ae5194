//! Game logic layered over the core board and pieces.
//!
//! - [`GameSession`] - One game: board, active piece, score, history
//! - [`GameLoop`] - Fall timer, pause and event dispatch around a session
//! - [`ActivePiece`] - The falling piece and its movement rules
//! - [`GameStats`] - Score, cleared rows and the derived level
//! - [`History`] - Bounded undo stack of pre-spawn snapshots
//! - [`PieceGenerator`] - Seeded uniform or 7-bag piece selection
//! - [`EngineConfig`] - Tunables loaded from JSON
//!
//! # Game Flow
//!
//! 1. A session spawns a piece, snapshotting the board first
//! 2. Ticks move the piece down; commands shift, rotate or drop it
//! 3. A piece that cannot descend locks, full rows clear and score
//! 4. The next piece spawns, or the game ends if it does not fit
//!
//! [`GameLoop`] turns elapsed time into ticks and forwards the
//! [`GameEvent`]s of each step to a [`GameObserver`].
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Board, Command, GameSession};
//!
//! let mut session = GameSession::new();
//! session.submit(Command::MoveLeft);
//! session.submit(Command::HardDrop);
//! assert_eq!(session.stats().locked_pieces(), 1);
//!
//! // Undo returns to the snapshot taken before the current piece spawned...
//! assert!(session.undo());
//! assert!(session.active_piece().is_none());
//! assert_eq!(session.stats().locked_pieces(), 1);
//!
//! // ...and once more to before the first piece.
//! assert!(session.undo());
//! assert_eq!(session.stats().locked_pieces(), 0);
//! assert_eq!(session.board(), &Board::EMPTY);
//! ```

pub use self::{
    active_piece::*, config::*, event::*, game_loop::*, game_session::*, game_stats::*,
    history::*, piece_generator::*,
};

mod active_piece;
mod config;
mod event;
mod game_loop;
mod game_session;
mod game_stats;
mod history;
mod piece_generator;
