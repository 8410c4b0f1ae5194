pub use self::{board::*, collision::can_place, piece::*};

pub(crate) mod board;
pub(crate) mod collision;
pub(crate) mod piece;
