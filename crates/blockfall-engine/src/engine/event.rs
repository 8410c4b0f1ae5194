use serde::{Deserialize, Serialize};

/// Final result of a game, handed to the leaderboard on game-over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameRecord {
    pub score: usize,
    pub level: usize,
}

/// Something that happened during a tick or command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// The active piece moved in response to a player command.
    Moved,
    Rotated,
    /// The active piece was merged into the board.
    Locked,
    /// Rows were removed after a lock (always nonzero).
    LinesCleared(usize),
    /// The level increased; carries the new level.
    LevelUp(usize),
    GameOver(GameRecord),
}

impl GameEvent {
    /// Calls the observer method matching this event.
    pub fn dispatch<O>(self, observer: &mut O)
    where
        O: GameObserver + ?Sized,
    {
        match self {
            GameEvent::Moved => observer.on_move(),
            GameEvent::Rotated => observer.on_rotate(),
            GameEvent::Locked => observer.on_lock(),
            GameEvent::LinesCleared(count) => observer.on_lines_cleared(count),
            GameEvent::LevelUp(level) => observer.on_level_up(level),
            GameEvent::GameOver(record) => observer.on_game_over(record),
        }
    }
}

/// Receives engine events as they are dispatched by [`GameLoop`](super::GameLoop).
///
/// Audio cues and leaderboard submission attach here. All methods default to
/// doing nothing, so implementors only override what they need.
pub trait GameObserver {
    fn on_move(&mut self) {}
    fn on_rotate(&mut self) {}
    fn on_lock(&mut self) {}
    fn on_lines_cleared(&mut self, _count: usize) {}
    fn on_level_up(&mut self, _level: usize) {}
    fn on_game_over(&mut self, _record: GameRecord) {}
}

impl GameObserver for () {}

/// Records every event in order.
impl GameObserver for Vec<GameEvent> {
    fn on_move(&mut self) {
        self.push(GameEvent::Moved);
    }

    fn on_rotate(&mut self) {
        self.push(GameEvent::Rotated);
    }

    fn on_lock(&mut self) {
        self.push(GameEvent::Locked);
    }

    fn on_lines_cleared(&mut self, count: usize) {
        self.push(GameEvent::LinesCleared(count));
    }

    fn on_level_up(&mut self, level: usize) {
        self.push(GameEvent::LevelUp(level));
    }

    fn on_game_over(&mut self, record: GameRecord) {
        self.push(GameEvent::GameOver(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_round_trips_through_recorder() {
        let events = [
            GameEvent::Moved,
            GameEvent::Rotated,
            GameEvent::Locked,
            GameEvent::LinesCleared(2),
            GameEvent::LevelUp(3),
            GameEvent::GameOver(GameRecord { score: 10, level: 3 }),
        ];
        let mut recorded = Vec::new();
        for event in events {
            event.dispatch(&mut recorded);
        }
        assert_eq!(recorded, events);
    }

    #[test]
    fn test_record_json() {
        let record = GameRecord {
            score: 1240,
            level: 2,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"score":1240,"level":2}"#);
        assert_eq!(serde_json::from_str::<GameRecord>(&json).unwrap(), record);
    }
}
