use std::time::Duration;

use crate::core::board::Board;

use super::{
    event::GameObserver,
    game_session::{Command, GameSession, UnknownCommandError},
};

/// Drives a [`GameSession`] from elapsed time and input commands.
///
/// The loop owns the fall timer: the caller reports how much time has passed
/// with [`advance`](Self::advance) and the loop issues one
/// [`GameSession::tick`] per elapsed fall interval. The interval is read
/// again after every tick, so a level-up speeds up the very next step.
///
/// Pausing only stops the timer. Events are forwarded to the observer
/// right after the tick or command that produced them, in order.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::{Command, GameEvent, GameLoop, GameSession};
///
/// let mut game = GameLoop::new(GameSession::new(), Vec::<GameEvent>::new());
///
/// assert_eq!(game.advance(Duration::from_millis(2500)), 2);
/// game.submit(Command::HardDrop);
/// assert!(game.observer().contains(&GameEvent::Locked));
///
/// game.pause();
/// assert_eq!(game.advance(Duration::from_secs(10)), 0);
/// ```
#[derive(Debug, Clone)]
pub struct GameLoop<O = ()> {
    session: GameSession,
    observer: O,
    elapsed: Duration,
    paused: bool,
}

impl<O> GameLoop<O>
where
    O: GameObserver,
{
    /// Wraps `session` and forwards its pending events to `observer`.
    ///
    /// A session that starts in game-over has already buffered its
    /// [`GameEvent::GameOver`](super::GameEvent::GameOver), so the observer
    /// hears about it here.
    #[must_use]
    pub fn new(session: GameSession, observer: O) -> Self {
        let mut this = Self {
            session,
            observer,
            elapsed: Duration::ZERO,
            paused: false,
        };
        this.dispatch();
        this
    }

    /// Returns the wrapped session for read-only queries.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Releases the session and the observer.
    pub fn into_parts(self) -> (GameSession, O) {
        (self.session, self.observer)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.session.board()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.session.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.session.level()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session.is_game_over()
    }

    /// Reports whether the fall timer is stopped.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stops the fall timer. Commands are still accepted.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Restarts the fall timer from where it stopped.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Pauses a running loop or resumes a paused one.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Time accumulated toward the next tick.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.elapsed
    }

    /// Reports elapsed wall time and returns the number of ticks issued.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.paused {
            return 0;
        }
        if self.session.is_game_over() {
            self.elapsed = Duration::ZERO;
            return 0;
        }

        self.elapsed += elapsed;
        let mut ticks = 0;
        loop {
            let interval = self.session.fall_interval();
            if self.elapsed < interval {
                break;
            }
            self.elapsed -= interval;
            self.tick();
            ticks += 1;
            if self.session.is_game_over() {
                self.elapsed = Duration::ZERO;
                break;
            }
        }
        ticks
    }

    /// Issues one fall step immediately, ignoring the timer.
    pub fn tick(&mut self) {
        self.session.tick();
        self.dispatch();
    }

    /// Forwards a command to the session.
    pub fn submit(&mut self, command: Command) -> bool {
        let changed = self.session.submit(command);
        self.dispatch();
        changed
    }

    /// Parses and forwards a textual command.
    ///
    /// Unrecognized text is rejected before it reaches the session.
    pub fn submit_str(&mut self, input: &str) -> Result<bool, UnknownCommandError> {
        let command = input.trim().parse().inspect_err(|err| {
            log::warn!("{err}");
        })?;
        Ok(self.submit(command))
    }

    /// Requests the next piece after an undo. See [`GameSession::spawn_piece`].
    pub fn spawn_piece(&mut self) -> bool {
        let spawned = self.session.spawn_piece();
        self.dispatch();
        spawned
    }

    /// Starts a fresh game, clearing the timer and the pause flag.
    pub fn new_game(&mut self) {
        self.session.new_game();
        self.elapsed = Duration::ZERO;
        self.paused = false;
        self.dispatch();
    }

    fn dispatch(&mut self) {
        for &event in self.session.events() {
            event.dispatch(&mut self.observer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivePiece, EngineConfig, GameEvent, GameRecord, PieceKind, PieceSeed};

    fn game() -> GameLoop<Vec<GameEvent>> {
        let config = EngineConfig {
            seed: Some(PieceSeed::from_bytes([3; 16])),
            ..EngineConfig::default()
        };
        GameLoop::new(GameSession::with_config(config).unwrap(), Vec::new())
    }

    #[test]
    fn test_advance_accumulates_partial_intervals() {
        let mut game = game();
        let y0 = game.session().active_piece().unwrap().y();

        assert_eq!(game.advance(Duration::from_millis(600)), 0);
        assert_eq!(game.advance(Duration::from_millis(600)), 1);
        assert_eq!(game.pending(), Duration::from_millis(200));
        assert_eq!(game.session().active_piece().unwrap().y(), y0 + 1);
    }

    #[test]
    fn test_pause_suspends_ticks_only() {
        let mut game = game();
        game.pause();
        assert_eq!(game.advance(Duration::from_secs(5)), 0);
        assert_eq!(game.pending(), Duration::ZERO);

        // Commands still reach the session while paused.
        assert!(game.submit(Command::HardDrop));
        assert_eq!(game.session().stats().locked_pieces(), 1);

        game.resume();
        assert_eq!(game.advance(Duration::from_secs(1)), 1);
    }

    #[test]
    fn test_events_reach_observer_in_order() {
        let mut board = Board::EMPTY;
        for x in 4..Board::WIDTH {
            board.fill_cell(x, Board::HEIGHT - 1, PieceKind::J);
        }
        let mut session = GameSession::with_board(EngineConfig::default(), board).unwrap();
        session
            .set_active_piece(ActivePiece::at(PieceKind::I, 0, 10))
            .unwrap();
        let mut game = GameLoop::new(session, Vec::<GameEvent>::new());

        assert!(!game.submit(Command::MoveLeft));
        assert!(game.submit(Command::HardDrop));

        assert_eq!(
            game.observer().as_slice(),
            &[GameEvent::Locked, GameEvent::LinesCleared(1)]
        );
        // Eight rows of hard drop plus a single clear at level 1.
        assert_eq!(game.score(), 8 + 40);
    }

    #[test]
    fn test_game_over_is_reported_once() {
        let mut board = Board::EMPTY;
        for y in 0..4 {
            for x in 1..Board::WIDTH {
                board.fill_cell(x, y, PieceKind::S);
            }
        }
        let session = GameSession::with_board(EngineConfig::default(), board).unwrap();
        assert!(session.is_game_over());
        assert_eq!(
            session.events(),
            &[GameEvent::GameOver(GameRecord { score: 0, level: 1 })]
        );

        let expected = [GameEvent::GameOver(GameRecord { score: 0, level: 1 })];
        let mut game = GameLoop::new(session, Vec::<GameEvent>::new());
        assert_eq!(game.observer().as_slice(), &expected);

        assert_eq!(game.advance(Duration::from_secs(60)), 0);
        assert!(!game.submit(Command::Rotate));
        assert_eq!(game.observer().as_slice(), &expected);
    }

    #[test]
    fn test_level_up_shortens_the_next_interval() {
        let mut board = Board::EMPTY;
        for y in 10..Board::HEIGHT {
            for x in 0..Board::WIDTH - 1 {
                board.fill_cell(x, y, PieceKind::T);
            }
        }
        // Vertical I-bar filling column 9, rows 16..20.
        let column_bar = ActivePiece::at(PieceKind::I, 7, 16).rotated_right();

        let mut session = GameSession::with_board(EngineConfig::default(), board).unwrap();
        for _ in 0..2 {
            session.set_active_piece(column_bar).unwrap();
            session.tick();
        }
        assert_eq!(session.stats().total_cleared_rows(), 8);
        session.set_active_piece(column_bar).unwrap();

        let mut game = GameLoop::new(session, Vec::<GameEvent>::new());
        game.observer_mut().clear();
        assert_eq!(game.session().fall_interval(), Duration::from_millis(1000));

        // The first tick locks and clears two rows; the second one already
        // runs on the level-2 interval.
        assert_eq!(game.advance(Duration::from_millis(1000 + 900)), 2);
        assert_eq!(game.pending(), Duration::ZERO);
        assert_eq!(game.level(), 2);
        assert!(game.observer().contains(&GameEvent::LevelUp(2)));
        assert_eq!(game.session().fall_interval(), Duration::from_millis(900));

        assert_eq!(game.advance(Duration::from_millis(899)), 0);
        assert_eq!(game.pending(), Duration::from_millis(899));
        assert_eq!(game.advance(Duration::from_millis(1)), 1);
        assert_eq!(game.pending(), Duration::ZERO);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game = game();
        game.toggle_pause();
        assert!(game.is_paused());
        assert_eq!(game.advance(Duration::from_secs(2)), 0);
        game.toggle_pause();
        assert!(!game.is_paused());
        assert_eq!(game.advance(Duration::from_secs(2)), 2);
    }

    #[test]
    fn test_submit_str_rejects_unknown_input() {
        let mut game = game();
        let before = game.session().active_piece().copied();
        assert!(game.submit_str("teleport").is_err());
        assert_eq!(game.session().active_piece().copied(), before);

        assert_eq!(game.submit_str(" rotate "), Ok(true));
        assert_eq!(game.observer().as_slice(), &[GameEvent::Rotated]);
    }

    #[test]
    fn test_new_game_clears_timer_and_pause() {
        let mut game = game();
        game.advance(Duration::from_millis(500));
        game.pause();
        game.new_game();
        assert!(!game.is_paused());
        assert_eq!(game.pending(), Duration::ZERO);
        assert_eq!(game.score(), 0);
    }
}
