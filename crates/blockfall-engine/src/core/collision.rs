use super::{board::Board, piece::Shape};

/// Yields the board coordinates and identifiers of the occupied cells of
/// `shape` anchored at `(x, y)`.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) fn cells_at(shape: &Shape, x: i32, y: i32) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
    shape
        .occupied_cells()
        .into_iter()
        .map(move |(sx, sy)| (x + sx as i32, y + sy as i32, shape.cell(sx, sy)))
}

/// Reports whether `shape` fits on `board` with its top-left corner at `(x, y)`.
///
/// Every occupied cell must lie within the side walls and above the floor,
/// and must not overlap a locked cell. Cells above the top row are always
/// passable, so a piece may spawn partially off the board.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceKind, can_place};
///
/// let board = Board::EMPTY;
/// let o = PieceKind::O.shape();
/// assert!(can_place(&board, &o, 0, 0));
/// assert!(can_place(&board, &o, 0, -1));
/// assert!(!can_place(&board, &o, -1, 0));
/// assert!(!can_place(&board, &o, 0, 19));
/// ```
#[must_use]
pub fn can_place(board: &Board, shape: &Shape, x: i32, y: i32) -> bool {
    cells_at(shape, x, y).all(|(bx, by, _)| {
        let Ok(bx) = usize::try_from(bx) else {
            return false;
        };
        if bx >= Board::WIDTH {
            return false;
        }
        let Ok(by) = usize::try_from(by) else {
            return true;
        };
        by < Board::HEIGHT && board.is_cell_empty(bx, by)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceKind;

    #[test]
    fn test_walls_and_floor() {
        let board = Board::EMPTY;
        let i = PieceKind::I.shape();
        // Horizontal I occupies row 1 of its box.
        assert!(can_place(&board, &i, 0, 0));
        assert!(can_place(&board, &i, 6, 0));
        assert!(!can_place(&board, &i, 7, 0));
        assert!(!can_place(&board, &i, -1, 0));
        assert!(can_place(&board, &i, 0, 18));
        assert!(!can_place(&board, &i, 0, 19));
    }

    #[test]
    fn test_empty_columns_may_hang_outside() {
        let board = Board::EMPTY;
        // Vertical I lives in column 2 of its box.
        let i = PieceKind::I.shape().rotated_right();
        assert!(can_place(&board, &i, -2, 0));
        assert!(!can_place(&board, &i, -3, 0));
        assert!(can_place(&board, &i, 7, 0));
        assert!(!can_place(&board, &i, 8, 0));
    }

    #[test]
    fn test_cells_above_board_are_passable() {
        let mut board = Board::EMPTY;
        for x in 0..Board::WIDTH {
            board.fill_cell(x, 0, PieceKind::Z);
        }
        let o = PieceKind::O.shape();
        assert!(can_place(&board, &o, 4, -2));
        assert!(!can_place(&board, &o, 4, -1));
    }

    #[test]
    fn test_overlap_with_locked_cell() {
        let mut board = Board::EMPTY;
        board.fill_cell(5, 10, PieceKind::J);
        let t = PieceKind::T.shape();
        // T occupies (1,0), (0,1), (1,1), (2,1) of its box.
        assert!(!can_place(&board, &t, 4, 9));
        assert!(!can_place(&board, &t, 4, 10));
        assert!(can_place(&board, &t, 4, 11));
        assert!(can_place(&board, &t, 6, 9));
    }

    #[test]
    fn test_every_spawn_fits_empty_board() {
        let board = Board::EMPTY;
        for kind in PieceKind::ALL {
            let shape = kind.shape();
            let x = i32::try_from((Board::WIDTH - shape.size()) / 2).unwrap();
            assert!(can_place(&board, &shape, x, 0), "{kind:?}");
        }
    }
}
