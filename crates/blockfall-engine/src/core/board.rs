use std::{fmt, str::FromStr};

use super::{
    collision,
    piece::{PieceKind, Shape},
};

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 20;

/// A single row of the board.
///
/// Each cell is `0` when empty or the identifier of the [`PieceKind`] that
/// locked there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardRow {
    cells: [u8; BOARD_WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [0; BOARD_WIDTH],
    };

    /// Returns the cell identifiers from left to right.
    #[must_use]
    pub fn cells(&self) -> &[u8; BOARD_WIDTH] {
        &self.cells
    }

    /// Checks if every cell of the row is occupied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&c| c != 0)
    }

    /// Checks if no cell of the row is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }
}

/// The playing field: a fixed 10×20 grid of locked cells.
///
/// Row `0` is the top of the board and `x` grows to the right. The board is
/// a plain value: it is cloned for undo checkpoints and otherwise mutated in
/// place by [`Board::merge`] and [`Board::clear_lines`].
///
/// # Text format
///
/// `Display` writes one line per row, `.` for empty cells and the piece
/// letter for occupied ones. `FromStr` reads the same format; when fewer than
/// [`Board::HEIGHT`] lines are given they are taken as the bottom rows.
///
/// ```
/// use blockfall_engine::Board;
///
/// let mut board: Board = "IIII.OOTTT".parse().unwrap();
/// assert_eq!(board.complete_row_count(), 0);
/// assert_eq!(board.clear_lines(), 0);
/// assert_eq!(board.to_string().lines().last(), Some("IIII.OOTTT"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [BoardRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BoardRow::EMPTY; BOARD_HEIGHT],
    };

    /// Returns the rows from top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[BoardRow; BOARD_HEIGHT] {
        &self.rows
    }

    /// Returns the cell at column `x`, row `y`, or `None` outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        self.rows.get(y)?.cells.get(x).copied()
    }

    pub(crate) fn is_cell_empty(&self, x: usize, y: usize) -> bool {
        self.rows[y].cells[x] == 0
    }

    /// Occupies a single cell with the given piece kind.
    ///
    /// # Panics
    ///
    /// Panics if `x >= Board::WIDTH` or `y >= Board::HEIGHT`. Use
    /// [`Board::cell`] to probe coordinates that may be off the board.
    pub fn fill_cell(&mut self, x: usize, y: usize, kind: PieceKind) {
        self.rows[y].cells[x] = kind.id();
    }

    /// Copies every occupied cell of `shape` onto the board at `(x, y)`.
    ///
    /// Cells above the top row are dropped. The placement is expected to
    /// have passed [`collision::can_place`].
    pub fn merge(&mut self, shape: &Shape, x: i32, y: i32) {
        debug_assert!(
            collision::can_place(self, shape, x, y),
            "merging a colliding shape at ({x}, {y})"
        );
        for (bx, by, id) in collision::cells_at(shape, x, y) {
            let (Ok(bx), Ok(by)) = (usize::try_from(bx), usize::try_from(by)) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(by).and_then(|row| row.cells.get_mut(bx)) {
                *cell = id;
            }
        }
        debug_assert!(self.is_valid());
    }

    /// Removes complete rows and returns how many were removed.
    ///
    /// Rows are scanned from the bottom up. When a row is removed everything
    /// above shifts down by one and an empty row appears at the top; the same
    /// index is then tested again, since it now holds the row that was above.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = Self::HEIGHT;
        while y > 0 {
            if self.rows[y - 1].is_complete() {
                self.rows.copy_within(0..y - 1, 1);
                self.rows[0] = BoardRow::EMPTY;
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        debug_assert!(self.is_valid());
        cleared
    }

    /// Number of rows whose cells are all occupied.
    #[must_use]
    pub fn complete_row_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_complete()).count()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_cell_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|&&c| c != 0)
            .count()
    }

    /// Checks that every occupied cell holds a valid piece identifier.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .all(|&c| c == 0 || PieceKind::from_id(c).is_some())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for &cell in row.cells() {
                let c = PieceKind::from_id(cell).map_or('.', PieceKind::as_char);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Error returned when parsing a [`Board`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("too many rows: got {count}, the board has {max}")]
    TooManyRows { count: usize, max: usize },
    #[display("row {row} has {width} cells, expected {expected}")]
    RowWidth {
        row: usize,
        width: usize,
        expected: usize,
    },
    #[display("invalid cell {cell:?} in row {row}")]
    InvalidCell { row: usize, cell: char },
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() > Self::HEIGHT {
            return Err(ParseBoardError::TooManyRows {
                count: lines.len(),
                max: Self::HEIGHT,
            });
        }

        let mut board = Self::EMPTY;
        let top = Self::HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let width = line.chars().count();
            if width != Self::WIDTH {
                return Err(ParseBoardError::RowWidth {
                    row: i,
                    width,
                    expected: Self::WIDTH,
                });
            }
            let row = &mut board.rows[top + i];
            for (x, c) in line.chars().enumerate() {
                row.cells[x] = match c {
                    '.' => 0,
                    _ => PieceKind::from_char(c)
                        .ok_or(ParseBoardError::InvalidCell { row: i, cell: c })?
                        .id(),
                };
            }
        }
        Ok(board)
    }
}
