use crate::core::{
    board::Board,
    collision::{self, can_place},
    piece::{PieceKind, Shape},
};

/// Lifecycle of the active piece between two spawns.
///
/// ```text
/// Spawning -> Falling -> Locking -> Locked -> Spawning ...
/// ```
///
/// `Spawning` also describes the state with no active piece at all: right
/// after an undo and after game-over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PiecePhase {
    /// Waiting for the next piece to be generated.
    Spawning,
    /// A piece is on the board and accepts commands.
    Falling,
    /// The piece could not descend and is being merged into the board.
    Locking,
    /// The piece has been merged; line clears and scoring follow.
    Locked,
}

/// The falling piece: its kind, current orientation and top-left anchor.
///
/// Pieces are immutable values. Movement and rotation return new pieces;
/// the `try_*` variants return `None` when the result would collide.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ActivePiece, Board, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = ActivePiece::spawn(PieceKind::T);
/// assert_eq!((piece.x(), piece.y()), (3, 0));
///
/// let moved = piece.try_shift(&board, -1, 0).unwrap();
/// assert_eq!(moved.x(), 2);
/// let (landed, rows) = moved.drop_position(&board);
/// assert_eq!(rows, 18);
/// assert_eq!(landed.y(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    kind: PieceKind,
    shape: Shape,
    x: i32,
    y: i32,
}

impl ActivePiece {
    /// Places `kind` in its spawn orientation, centered horizontally on row 0.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        let shape = kind.shape();
        Self {
            kind,
            shape,
            x: spawn_x(&shape),
            y: 0,
        }
    }

    /// Places `kind` in its spawn orientation at an arbitrary anchor.
    #[must_use]
    pub const fn at(kind: PieceKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            x,
            y,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Board coordinates of the occupied cells (rows may be negative).
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        collision::cells_at(&self.shape, self.x, self.y).map(|(x, y, _)| (x, y))
    }

    #[must_use]
    pub fn fits(&self, board: &Board) -> bool {
        can_place(board, &self.shape, self.x, self.y)
    }

    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Rotates 90° clockwise around the same anchor.
    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        Self {
            shape: self.shape.rotated_right(),
            ..*self
        }
    }

    #[must_use]
    pub fn try_shift(&self, board: &Board, dx: i32, dy: i32) -> Option<Self> {
        Some(self.shifted(dx, dy)).filter(|piece| piece.fits(board))
    }

    /// Rotates clockwise if the rotated shape fits in place.
    ///
    /// No alternative offsets are tried: a colliding rotation is rejected.
    #[must_use]
    pub fn try_rotate(&self, board: &Board) -> Option<Self> {
        Some(self.rotated_right()).filter(|piece| piece.fits(board))
    }

    /// Returns the lowest position reachable by moving straight down, and
    /// the number of rows descended to get there.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> (Self, usize) {
        let mut dropped = *self;
        let mut rows = 0;
        while let Some(piece) = dropped.try_shift(board, 0, 1) {
            dropped = piece;
            rows += 1;
        }
        (dropped, rows)
    }

    pub(crate) fn merge_into(&self, board: &mut Board) {
        board.merge(&self.shape, self.x, self.y);
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn spawn_x(shape: &Shape) -> i32 {
    ((Board::WIDTH - shape.size()) / 2) as i32
}
