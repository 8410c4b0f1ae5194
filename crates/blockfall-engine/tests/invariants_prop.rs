//! Property tests over random shapes and command sequences.
//!
//! Invariants covered:
//! - Four clockwise rotations return the original shape.
//! - Every spawn position fits an empty board.
//! - After any command sequence the board holds only valid cells and no
//!   complete rows, the level matches the cleared-row count and the history
//!   stays within its capacity.
//! - Without undo the score never decreases.

use blockfall_engine::{
    Board, Command, EngineConfig, GameSession, PieceKind, PieceSeed, Randomizer, can_place,
    level_for_rows,
};
use proptest::prelude::*;

fn piece_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn command() -> impl Strategy<Value = Command> {
    prop::sample::select(Command::ALL.to_vec())
}

fn play_command() -> impl Strategy<Value = Command> {
    command().prop_filter("undo", |command| *command != Command::Undo)
}

fn config(seed: [u8; 16], bag: bool, history_capacity: usize) -> EngineConfig {
    EngineConfig {
        seed: Some(PieceSeed::from_bytes(seed)),
        randomizer: if bag {
            Randomizer::Bag
        } else {
            Randomizer::Uniform
        },
        history_capacity,
        ..EngineConfig::default()
    }
}

fn assert_session_consistent(session: &GameSession) {
    let stats = session.stats();
    assert!(session.board().is_valid());
    assert_eq!(session.board().complete_row_count(), 0);
    assert_eq!(stats.level(), level_for_rows(stats.total_cleared_rows()));
    assert_eq!(stats.level(), stats.total_cleared_rows() / 10 + 1);
    assert!(session.history().len() <= session.history().capacity());
    if let Some(piece) = session.active_piece() {
        assert!(piece.fits(session.board()));
    }
}

proptest! {
    #[test]
    fn rotation_has_order_four(kind in piece_kind()) {
        let shape = kind.shape();
        let turned = shape
            .rotated_right()
            .rotated_right()
            .rotated_right()
            .rotated_right();
        prop_assert_eq!(turned, shape);
        prop_assert_eq!(shape.rotated_right().occupied_cells().len(), 4);
    }

    #[test]
    fn spawn_fits_empty_board(kind in piece_kind()) {
        let piece = blockfall_engine::ActivePiece::spawn(kind);
        prop_assert!(can_place(&Board::EMPTY, piece.shape(), piece.x(), piece.y()));
    }

    #[test]
    fn random_commands_keep_session_consistent(
        seed in any::<[u8; 16]>(),
        bag in any::<bool>(),
        capacity in 0usize..12,
        commands in prop::collection::vec(command(), 1..200),
    ) {
        let mut session = GameSession::with_config(config(seed, bag, capacity)).unwrap();
        for command in commands {
            session.submit(command);
            assert_session_consistent(&session);
            session.tick();
            assert_session_consistent(&session);
        }
    }

    #[test]
    fn score_never_decreases_without_undo(
        seed in any::<[u8; 16]>(),
        commands in prop::collection::vec(play_command(), 1..200),
    ) {
        let mut session = GameSession::with_config(config(seed, false, 10)).unwrap();
        let mut score = session.score();
        for command in commands {
            session.submit(command);
            session.tick();
            prop_assert!(session.score() >= score);
            score = session.score();
        }
    }

    #[test]
    fn undo_restores_the_last_snapshot(
        seed in any::<[u8; 16]>(),
        drops in 1usize..8,
    ) {
        let mut session = GameSession::with_config(config(seed, true, 10)).unwrap();
        let mut last = (session.board().clone(), session.stats().clone());
        for _ in 0..drops {
            if session.is_game_over() {
                break;
            }
            session.submit(Command::HardDrop);
            last = (session.board().clone(), session.stats().clone());
        }
        prop_assert!(session.undo());
        prop_assert_eq!(session.board(), &last.0);
        prop_assert_eq!(session.stats(), &last.1);
    }
}
