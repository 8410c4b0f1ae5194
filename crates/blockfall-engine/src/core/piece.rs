use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
///
/// The discriminant doubles as the piece identifier stored in board cells,
/// so it ranges over `1..=7` and `0` is left free for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 1,
    /// J-piece.
    J = 2,
    /// L-piece.
    L = 3,
    /// O-piece.
    O = 4,
    /// S-piece.
    S = 5,
    /// T-piece.
    T = 6,
    /// Z-piece.
    Z = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds, in identifier order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Returns the cell identifier of this kind (`1..=7`).
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Looks up the kind stored in a board cell.
    ///
    /// Returns `None` for `0` (empty) and for any value outside `1..=7`.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::J),
            3 => Some(PieceKind::L),
            4 => Some(PieceKind::O),
            5 => Some(PieceKind::S),
            6 => Some(PieceKind::T),
            7 => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Returns the spawn orientation of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        PIECE_SHAPES[self as usize - 1]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'Z' => Some(PieceKind::Z),
            _ => None,
        }
    }
}

/// An N×N piece matrix (N ∈ {2, 3, 4}).
///
/// Cells hold `0` for empty and the piece identifier otherwise. Shapes are
/// values: [`Shape::rotated_right`] returns a new matrix and never touches
/// the original.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceKind;
///
/// let t = PieceKind::T.shape();
/// assert_eq!(t.size(), 3);
/// assert_eq!(t.rotated_right().rotated_right().rotated_right().rotated_right(), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: usize,
    cells: [[u8; Shape::MAX_SIZE]; Shape::MAX_SIZE],
}

impl Shape {
    /// Largest bounding box of any piece.
    pub const MAX_SIZE: usize = 4;

    /// Side length of the bounding box.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Cell value at column `x`, row `y` of the bounding box.
    ///
    /// Positions inside the 4×4 storage but outside [`Shape::size`] read as
    /// empty.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is at least [`Shape::MAX_SIZE`].
    #[must_use]
    pub const fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y][x]
    }

    /// Iterates over the rows of the bounding box.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.cells[..self.size].iter().map(|row| &row[..self.size])
    }

    /// Returns `(x, y)` offsets of the occupied cells, row by row.
    #[must_use]
    pub fn occupied_cells(&self) -> ArrayVec<(usize, usize), 4> {
        let mut cells = ArrayVec::new();
        for (y, row) in self.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Returns this shape rotated 90° clockwise.
    ///
    /// `rotated[x][n - 1 - y] = original[y][x]`.
    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        let n = self.size;
        let mut cells = [[0; Self::MAX_SIZE]; Self::MAX_SIZE];
        let mut y = 0;
        while y < n {
            let mut x = 0;
            while x < n {
                cells[x][n - 1 - y] = self.cells[y][x];
                x += 1;
            }
            y += 1;
        }
        Self { size: n, cells }
    }
}

const PIECE_SHAPES: [Shape; PieceKind::LEN] = {
    const I: u8 = PieceKind::I.id();
    const J: u8 = PieceKind::J.id();
    const L: u8 = PieceKind::L.id();
    const O: u8 = PieceKind::O.id();
    const S: u8 = PieceKind::S.id();
    const T: u8 = PieceKind::T.id();
    const Z: u8 = PieceKind::Z.id();
    const E: u8 = 0;
    const EEEE: [u8; 4] = [E; 4];

    const fn shape(size: usize, cells: [[u8; 4]; 4]) -> Shape {
        Shape { size, cells }
    }

    [
        shape(4, [EEEE, [I, I, I, I], EEEE, EEEE]),
        shape(3, [[J, E, E, E], [J, J, J, E], EEEE, EEEE]),
        shape(3, [[E, E, L, E], [L, L, L, E], EEEE, EEEE]),
        shape(2, [[O, O, E, E], [O, O, E, E], EEEE, EEEE]),
        shape(3, [[E, S, S, E], [S, S, E, E], EEEE, EEEE]),
        shape(3, [[E, T, E, E], [T, T, T, E], EEEE, EEEE]),
        shape(3, [[Z, Z, E, E], [E, Z, Z, E], EEEE, EEEE]),
    ]
};
