use std::time::Duration;

use super::{config::EngineConfig, event::GameRecord};

/// Base points for line clears, indexed by rows cleared in one lock.
///
/// The awarded points are the table value multiplied by the current level:
/// - 0 rows: 0 points
/// - 1 row: 40 points
/// - 2 rows: 100 points
/// - 3 rows: 300 points
/// - 4 rows: 1200 points
pub const SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1200];

/// Cleared rows needed to advance one level.
pub const ROWS_PER_LEVEL: usize = 10;

/// Returns the level reached after clearing `total_cleared_rows` rows.
#[must_use]
pub const fn level_for_rows(total_cleared_rows: usize) -> usize {
    total_cleared_rows / ROWS_PER_LEVEL + 1
}

/// Returns the time between automatic fall ticks at `level`.
///
/// The interval shrinks by `interval_step_ms` per level from
/// `initial_interval_ms` and never drops below `min_interval_ms`.
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::{EngineConfig, interval_for_level};
///
/// let config = EngineConfig::default();
/// assert_eq!(interval_for_level(1, &config), Duration::from_millis(1000));
/// assert_eq!(interval_for_level(4, &config), Duration::from_millis(700));
/// assert_eq!(interval_for_level(30, &config), Duration::from_millis(100));
/// ```
#[must_use]
pub fn interval_for_level(level: usize, config: &EngineConfig) -> Duration {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    let millis = config
        .initial_interval_ms
        .saturating_sub(steps.saturating_mul(config.interval_step_ms))
        .max(config.min_interval_ms);
    Duration::from_millis(millis)
}

/// Game statistics tracking score, cleared rows, and piece count.
///
/// - **Score**: line-clear points scaled by level, plus hard-drop points
/// - **Level**: derived from total rows cleared (1 level per 10 rows, starting at 1)
/// - **Locked pieces**: total number of pieces merged into the board
/// - **Line clear distribution**: count of 0, 1, 2, 3 and 4 row clears
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.complete_piece_drop(4), 1200);
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_rows(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    locked_pieces: usize,
    total_cleared_rows: usize,
    hard_drop_points: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            locked_pieces: 0,
            total_cleared_rows: 0,
            hard_drop_points: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        level_for_rows(self.total_cleared_rows)
    }

    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Points earned from hard drops, already included in [`Self::score`].
    #[must_use]
    pub const fn hard_drop_points(&self) -> usize {
        self.hard_drop_points
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// `[0]` counts locks that cleared nothing, `[4]` counts four-row clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    #[must_use]
    pub const fn record(&self) -> GameRecord {
        GameRecord {
            score: self.score,
            level: self.level(),
        }
    }

    /// Awards one point per row of hard-drop descent.
    pub const fn add_hard_drop(&mut self, rows: usize) {
        self.score += rows;
        self.hard_drop_points += rows;
    }

    /// Updates statistics after a piece locks and returns the points awarded.
    ///
    /// Points use the level in effect before the cleared rows are counted.
    pub fn complete_piece_drop(&mut self, cleared_rows: usize) -> usize {
        let index = cleared_rows.min(SCORE_TABLE.len() - 1);
        let points = SCORE_TABLE[index] * self.level();

        self.locked_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        self.line_cleared_counter[index] += 1;
        self.score += points;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.locked_pieces(), 0);
    }

    #[test]
    fn test_points_scale_with_level() {
        for (cleared, base) in SCORE_TABLE.iter().enumerate() {
            let mut stats = GameStats::new();
            // Reach level 3 without clearing in the measured lock.
            stats.total_cleared_rows = 20;
            assert_eq!(stats.level(), 3);
            assert_eq!(stats.complete_piece_drop(cleared), base * 3);
        }
    }

    #[test]
    fn test_level_follows_cleared_rows() {
        let mut stats = GameStats::new();
        for _ in 0..9 {
            stats.complete_piece_drop(1);
        }
        assert_eq!(stats.level(), 1);
        stats.complete_piece_drop(1);
        assert_eq!(stats.level(), 2);
        stats.complete_piece_drop(4);
        assert_eq!(stats.total_cleared_rows(), 14);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_level_before_clear_is_used() {
        let mut stats = GameStats::new();
        stats.total_cleared_rows = 8;
        // Crosses into level 2, but scores at level 1.
        assert_eq!(stats.complete_piece_drop(4), 1200);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_hard_drop_points() {
        let mut stats = GameStats::new();
        stats.add_hard_drop(17);
        assert_eq!(stats.score(), 17);
        assert_eq!(stats.hard_drop_points(), 17);
        assert_eq!(stats.locked_pieces(), 0);
    }

    #[test]
    fn test_line_cleared_counter() {
        let mut stats = GameStats::new();
        for cleared in [0, 0, 1, 2, 4] {
            stats.complete_piece_drop(cleared);
        }
        assert_eq!(stats.line_cleared_counter(), &[2, 1, 1, 0, 1]);
        assert_eq!(stats.locked_pieces(), 5);
    }

    #[test]
    fn test_interval_is_non_increasing_and_clamped() {
        let config = EngineConfig::default();
        let mut prev = interval_for_level(1, &config);
        for level in 2..40 {
            let interval = interval_for_level(level, &config);
            assert!(interval <= prev);
            assert!(interval >= Duration::from_millis(config.min_interval_ms));
            prev = interval;
        }
        assert_eq!(prev, Duration::from_millis(100));
    }

    #[test]
    fn test_record() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2);
        assert_eq!(stats.record(), GameRecord { score: 100, level: 1 });
    }
}
