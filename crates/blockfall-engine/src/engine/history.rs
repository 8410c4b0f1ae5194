use std::collections::VecDeque;

use crate::core::board::Board;

use super::game_stats::GameStats;

/// Snapshot of the game taken just before a piece spawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    board: Board,
    stats: GameStats,
}

impl HistoryEntry {
    /// Captures a board and the statistics that go with it.
    #[must_use]
    pub fn new(board: Board, stats: GameStats) -> Self {
        Self { board, stats }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    pub(crate) fn into_parts(self) -> (Board, GameStats) {
        (self.board, self.stats)
    }
}

/// Bounded stack of undo snapshots.
///
/// Pushing beyond the capacity evicts the oldest entry.
///
/// ```
/// use blockfall_engine::{Board, GameStats, History, HistoryEntry};
///
/// let mut history = History::new(2);
/// for _ in 0..3 {
///     history.push(HistoryEntry::new(Board::EMPTY, GameStats::new()));
/// }
/// assert_eq!(history.len(), 2);
/// assert!(history.pop().is_some());
/// assert!(history.pop().is_some());
/// assert!(history.pop().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// Creates an empty history keeping at most `capacity` snapshots.
    ///
    /// A capacity of `0` keeps nothing, which disables undo.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores a snapshot, evicting the oldest one when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Removes and returns the most recent snapshot.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }
}
