use std::{str::FromStr, time::Duration};

use crate::{
    PieceCollisionError, SetPieceError,
    core::{board::Board, piece::PieceKind},
};

use super::{
    active_piece::{ActivePiece, PiecePhase},
    config::{ConfigError, EngineConfig},
    event::{GameEvent, GameRecord},
    game_stats::{GameStats, interval_for_level},
    history::{History, HistoryEntry},
    piece_generator::PieceGenerator,
};

/// A discrete player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Undo,
}

impl Command {
    pub const ALL: [Self; 6] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::HardDrop,
        Command::Rotate,
        Command::Undo,
    ];
}

/// Error returned when text does not name a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown command: {input:?}")]
pub struct UnknownCommandError {
    input: String,
}

/// Parses command names case-insensitively, ignoring `-`, `_` and spaces.
///
/// ```
/// use blockfall_engine::Command;
///
/// assert_eq!("move-left".parse(), Ok(Command::MoveLeft));
/// assert_eq!("HARD_DROP".parse(), Ok(Command::HardDrop));
/// assert!("jump".parse::<Command>().is_err());
/// ```
impl FromStr for Command {
    type Err = UnknownCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Command::ALL
            .into_iter()
            .find(|command| command.to_string().to_lowercase() == key)
            .ok_or_else(|| UnknownCommandError {
                input: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// A single game: board, active piece, statistics and undo history.
///
/// The session has no clock of its own. A driver such as
/// [`GameLoop`](super::GameLoop) calls [`tick`](Self::tick) every
/// [`fall_interval`](Self::fall_interval) and forwards player input through
/// [`submit`](Self::submit). Events produced by the most recent call are
/// available from [`events`](Self::events).
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, GameSession};
///
/// let mut session = GameSession::new();
/// assert!(session.active_piece().is_some());
///
/// session.submit(Command::MoveLeft);
/// session.submit(Command::Rotate);
/// session.submit(Command::HardDrop);
///
/// assert!(session.score() > 0);
/// assert_eq!(session.stats().locked_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: EngineConfig,
    board: Board,
    active_piece: Option<ActivePiece>,
    phase: PiecePhase,
    stats: GameStats,
    history: History,
    generator: PieceGenerator,
    session_state: SessionState,
    events: Vec<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a game with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::start(EngineConfig::default(), Board::EMPTY)
    }

    /// Starts a game on an empty board after validating `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_board(config, Board::EMPTY)
    }

    /// Starts a game on a prepared board.
    ///
    /// If the first piece cannot spawn the session begins in game-over.
    pub fn with_board(config: EngineConfig, board: Board) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config, board))
    }

    fn start(config: EngineConfig, board: Board) -> Self {
        debug_assert!(board.is_valid());
        let mut this = Self {
            config,
            board,
            active_piece: None,
            phase: PiecePhase::Spawning,
            stats: GameStats::new(),
            history: History::new(config.history_capacity),
            generator: new_generator(&config),
            session_state: SessionState::Playing,
            events: Vec::new(),
        };
        this.spawn_next();
        this
    }

    /// Discards the current game and starts over on an empty board.
    pub fn new_game(&mut self) {
        *self = Self::start(self.config, Board::EMPTY);
    }

    /// Returns the configuration the session was started with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the locked cells, without the active piece.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece, if any.
    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active_piece.as_ref()
    }

    /// Returns where the active piece is in its lifecycle.
    #[must_use]
    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    /// Returns the score, cleared rows and lock counters.
    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Returns the current score.
    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    /// Returns the current level, starting at 1.
    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    /// Returns the `{score, level}` record handed out on game-over.
    #[must_use]
    pub fn record(&self) -> GameRecord {
        self.stats.record()
    }

    /// Returns the undo snapshots.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session_state.is_game_over()
    }

    /// Time between automatic fall ticks at the current level.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        interval_for_level(self.level(), &self.config)
    }

    /// Events produced by the most recent tick, command or spawn.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Where the active piece would land on a hard drop.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<ActivePiece> {
        self.active_piece
            .map(|piece| piece.drop_position(&self.board).0)
    }

    /// Returns the board with the active piece drawn onto it.
    #[must_use]
    pub fn render_board(&self) -> Board {
        let mut board = self.board.clone();
        if let Some(piece) = &self.active_piece {
            piece.merge_into(&mut board);
        }
        board
    }

    /// Replaces the active piece with a caller-provided placement.
    pub fn set_active_piece(&mut self, piece: ActivePiece) -> Result<(), SetPieceError> {
        if self.is_game_over() {
            return Err(SetPieceError::GameOver);
        }
        if !piece.fits(&self.board) {
            return Err(SetPieceError::PieceCollision(PieceCollisionError));
        }
        self.active_piece = Some(piece);
        self.phase = PiecePhase::Falling;
        Ok(())
    }

    /// Advances the game by one fall step.
    ///
    /// Moves the active piece down one row, or locks it if it cannot move.
    /// With no active piece (after an undo) the next piece is spawned.
    pub fn tick(&mut self) {
        self.events.clear();
        if self.is_game_over() {
            return;
        }
        match self.active_piece {
            None => {
                self.spawn_next();
            }
            Some(piece) => match piece.try_shift(&self.board, 0, 1) {
                Some(moved) => self.active_piece = Some(moved),
                None => self.lock_piece(),
            },
        }
    }

    /// Applies a player command and returns whether the game changed.
    ///
    /// Blocked moves and rotations are ignored. After game-over only
    /// [`Command::Undo`] has an effect.
    pub fn submit(&mut self, command: Command) -> bool {
        self.events.clear();
        match command {
            Command::Undo => self.undo_inner(),
            Command::MoveLeft => {
                self.apply_move(command, |piece, board| piece.try_shift(board, -1, 0))
            }
            Command::MoveRight => {
                self.apply_move(command, |piece, board| piece.try_shift(board, 1, 0))
            }
            Command::SoftDrop => {
                self.apply_move(command, |piece, board| piece.try_shift(board, 0, 1))
            }
            Command::Rotate => self.apply_move(command, ActivePiece::try_rotate),
            Command::HardDrop => {
                let Some(piece) = self.playable_piece(command) else {
                    return false;
                };
                self.hard_drop(piece);
                true
            }
        }
    }

    /// Spawns the next piece if none is active.
    ///
    /// Returns `true` if a piece was placed. A blocked spawn ends the game.
    pub fn spawn_piece(&mut self) -> bool {
        self.events.clear();
        if self.is_game_over() || self.active_piece.is_some() {
            return false;
        }
        self.spawn_next()
    }

    /// Rolls back to the snapshot taken before the latest spawn.
    ///
    /// The active piece is discarded and no new one is spawned; call
    /// [`spawn_piece`](Self::spawn_piece) or [`tick`](Self::tick) to continue.
    /// Returns `false` when the history is empty.
    pub fn undo(&mut self) -> bool {
        self.events.clear();
        self.undo_inner()
    }

    fn undo_inner(&mut self) -> bool {
        let Some(entry) = self.history.pop() else {
            log::trace!("undo with empty history");
            return false;
        };
        let (board, stats) = entry.into_parts();
        self.board = board;
        self.stats = stats;
        self.active_piece = None;
        self.phase = PiecePhase::Spawning;
        self.session_state = SessionState::Playing;
        log::debug!(
            "undo: score {}, level {}, {} snapshots left",
            self.score(),
            self.level(),
            self.history.len()
        );
        true
    }

    /// Returns the active piece if `command` may act on it.
    fn playable_piece(&self, command: Command) -> Option<ActivePiece> {
        if self.is_game_over() {
            log::trace!("ignoring {command} after game over");
            return None;
        }
        if self.active_piece.is_none() {
            log::trace!("ignoring {command} without an active piece");
        }
        self.active_piece
    }

    fn apply_move<F>(&mut self, command: Command, f: F) -> bool
    where
        F: FnOnce(&ActivePiece, &Board) -> Option<ActivePiece>,
    {
        let Some(piece) = self.playable_piece(command) else {
            return false;
        };
        let Some(moved) = f(&piece, &self.board) else {
            log::trace!("{command} rejected at ({}, {})", piece.x(), piece.y());
            return false;
        };
        self.active_piece = Some(moved);
        self.events.push(if command == Command::Rotate {
            GameEvent::Rotated
        } else {
            GameEvent::Moved
        });
        true
    }

    fn hard_drop(&mut self, piece: ActivePiece) {
        let (dropped, rows) = piece.drop_position(&self.board);
        self.stats.add_hard_drop(rows);
        self.active_piece = Some(dropped);
        self.lock_piece();
    }

    fn lock_piece(&mut self) {
        let Some(piece) = self.active_piece.take() else {
            return;
        };
        self.phase = PiecePhase::Locking;
        piece.merge_into(&mut self.board);
        self.phase = PiecePhase::Locked;
        self.events.push(GameEvent::Locked);

        let level_before = self.level();
        let cleared = self.board.clear_lines();
        let points = self.stats.complete_piece_drop(cleared);
        log::debug!(
            "locked {:?} at ({}, {}): {cleared} rows, {points} points",
            piece.kind(),
            piece.x(),
            piece.y()
        );
        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared(cleared));
        }
        if self.level() > level_before {
            log::info!("level up: {}", self.level());
            self.events.push(GameEvent::LevelUp(self.level()));
        }

        self.spawn_next();
    }

    fn spawn_next(&mut self) -> bool {
        self.history
            .push(HistoryEntry::new(self.board.clone(), self.stats.clone()));
        self.phase = PiecePhase::Spawning;

        let kind: PieceKind = self.generator.next_kind();
        let piece = ActivePiece::spawn(kind);
        if !piece.fits(&self.board) {
            self.session_state = SessionState::GameOver;
            let record = self.record();
            log::info!(
                "game over: {kind:?} cannot spawn, score {}, level {}",
                record.score,
                record.level
            );
            self.events.push(GameEvent::GameOver(record));
            return false;
        }

        log::debug!("spawned {kind:?} at ({}, {})", piece.x(), piece.y());
        self.active_piece = Some(piece);
        self.phase = PiecePhase::Falling;
        true
    }
}

fn new_generator(config: &EngineConfig) -> PieceGenerator {
    match config.seed {
        Some(seed) => PieceGenerator::with_seed(config.randomizer, seed),
        None => PieceGenerator::new(config.randomizer),
    }
}
