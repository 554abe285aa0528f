use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Coord, Direction, Rect, Shape};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub shape: Shape,
    pub position: Coord,
    pub key: bool,
}

impl Piece {
    #[must_use]
    pub const fn new(id: PieceId, shape: Shape, position: Coord, key: bool) -> Self {
        Self {
            id,
            shape,
            position,
            key,
        }
    }

    #[inline]
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.position, self.shape)
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = Coord> {
        self.rect().cells()
    }

    /// The cells a one step move in `direction` would newly cover: a strip one
    /// cell deep along the leading edge. Everything else the piece covers after
    /// the move it already covers now.
    pub fn candidate_strip(&self, direction: Direction) -> impl Iterator<Item = Coord> {
        let Self { shape, position, .. } = *self;
        let (origin, strip) = match direction {
            Direction::Up => (Coord::new(position.x, position.y - 1), Shape::new(shape.width, 1)),
            Direction::Down => (Coord::new(position.x, position.y + shape.height), Shape::new(shape.width, 1)),
            Direction::Left => (Coord::new(position.x - 1, position.y), Shape::new(1, shape.height)),
            Direction::Right => (Coord::new(position.x + shape.width, position.y), Shape::new(1, shape.height)),
        };
        Rect::new(origin, strip).cells()
    }

    /// The cells the piece leaves behind when it moves in `direction`.
    pub(crate) fn trailing_strip(&self, direction: Direction) -> impl Iterator<Item = Coord> {
        // the trailing edge is the leading strip of the opposite move, shifted back inside
        let back = direction.vector();
        self.candidate_strip(direction.inverse()).map(move |cell| cell + back)
    }

    /// Shifts the piece one cell. Legality is the board's job.
    #[inline]
    pub fn apply_move(&mut self, direction: Direction) {
        self.position += direction.vector();
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID:{} POS:{}", self.id, self.position)?;
        if self.key {
            write!(f, " KEY")?;
        }
        Ok(())
    }
}
