use std::fmt;
use std::ops::{Add, AddAssign, Neg};

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter};
use thiserror::Error;

/// A cell coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl Add for Coord {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coord {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a rectangle, in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub width: i32,
    pub height: i32,
}

impl Shape {
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl From<[i32; 2]> for Shape {
    fn from([width, height]: [i32; 2]) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle anchored at its top-left cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub origin: Coord,
    pub shape: Shape,
}

impl Rect {
    #[must_use]
    pub const fn new(origin: Coord, shape: Shape) -> Self {
        Self { origin, shape }
    }

    /// Builds the rectangle spanned by two inclusive corner cells, in any order.
    /// `None` when the span does not fit in an `i32`.
    #[must_use]
    pub fn from_corners(a: Coord, b: Coord) -> Option<Self> {
        let span = |p: i32, q: i32| i32::try_from((i64::from(p) - i64::from(q)).abs() + 1).ok();
        let origin = Coord::new(a.x.min(b.x), a.y.min(b.y));
        let shape = Shape::new(span(a.x, b.x)?, span(a.y, b.y)?);
        Some(Self { origin, shape })
    }

    /// The bottom-right cell, inclusive. Saturates for rectangles reaching
    /// past the coordinate range.
    #[must_use]
    pub const fn far_corner(&self) -> Coord {
        Coord::new(
            self.origin.x.saturating_add(self.shape.width.saturating_sub(1)),
            self.origin.y.saturating_add(self.shape.height.saturating_sub(1)),
        )
    }

    // exclusive right and bottom edges, widened so they cannot overflow
    const fn far_edges(&self) -> (i64, i64) {
        (
            self.origin.x as i64 + self.shape.width as i64,
            self.origin.y as i64 + self.shape.height as i64,
        )
    }

    #[must_use]
    pub const fn contains(&self, cell: Coord) -> bool {
        let (right, bottom) = self.far_edges();
        cell.x >= self.origin.x && cell.y >= self.origin.y && (cell.x as i64) < right && (cell.y as i64) < bottom
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn encloses(&self, other: &Self) -> bool {
        let (right, bottom) = self.far_edges();
        let (other_right, other_bottom) = other.far_edges();
        other.origin.x >= self.origin.x && other.origin.y >= self.origin.y && other_right <= right && other_bottom <= bottom
    }

    #[must_use]
    pub const fn intersects(&self, other: &Self) -> bool {
        let (right, bottom) = self.far_edges();
        let (other_right, other_bottom) = other.far_edges();
        (self.origin.x as i64) < other_right
            && (other.origin.x as i64) < right
            && (self.origin.y as i64) < other_bottom
            && (other.origin.y as i64) < bottom
    }

    /// Row-major iterator over every cell of the rectangle.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let Self { origin, shape } = *self;
        (origin.y..origin.y.saturating_add(shape.height))
            .flat_map(move |y| (origin.x..origin.x.saturating_add(shape.width)).map(move |x| Coord::new(x, y)))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.far_corner())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error("({dx}, {dy}) is not a unit step along one axis")]
pub struct InvalidDirection {
    pub dx: i32,
    pub dy: i32,
}

/// One of the four unit moves. The declaration order is the order in which
/// the solver tries directions for a piece.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumCount,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn vector(self) -> Coord {
        match self {
            Self::Up => Coord::new(0, -1),
            Self::Down => Coord::new(0, 1),
            Self::Left => Coord::new(-1, 0),
            Self::Right => Coord::new(1, 0),
        }
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    pub const fn from_vector(dx: i32, dy: i32) -> Result<Self, InvalidDirection> {
        match (dx, dy) {
            (0, -1) => Ok(Self::Up),
            (0, 1) => Ok(Self::Down),
            (-1, 0) => Ok(Self::Left),
            (1, 0) => Ok(Self::Right),
            _ => Err(InvalidDirection { dx, dy }),
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = InvalidDirection;

    fn try_from((dx, dy): (i32, i32)) -> Result<Self, Self::Error> {
        Self::from_vector(dx, dy)
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self {
        self.inverse()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn unit_vectors_round_trip() {
        for direction in Direction::iter() {
            let v = direction.vector();
            assert_eq!(Direction::from_vector(v.x, v.y), Ok(direction));
            assert_eq!(v + direction.inverse().vector(), Coord::default());
        }
        assert_eq!(Direction::iter().collect::<Vec<_>>(), Direction::ALL);
    }

    #[test]
    fn rejects_non_unit_vectors() {
        for (dx, dy) in [(0, 0), (1, 1), (-1, 1), (2, 0), (0, -3), (5, 7)] {
            assert_eq!(Direction::try_from((dx, dy)), Err(InvalidDirection { dx, dy }));
        }
    }

    #[test]
    fn rect_from_corners_is_order_independent() {
        let a = Rect::from_corners(Coord::new(1, 3), Coord::new(2, 4)).unwrap();
        let b = Rect::from_corners(Coord::new(2, 4), Coord::new(1, 3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.shape, Shape::new(2, 2));
        assert_eq!(a.far_corner(), Coord::new(2, 4));
        assert_eq!(a.cells().count(), 4);
    }

    #[test]
    fn corners_spanning_the_whole_range_do_not_fit() {
        assert_eq!(Rect::from_corners(Coord::new(i32::MIN, 0), Coord::new(i32::MAX, 0)), None);
        let widest = Rect::from_corners(Coord::new(0, 0), Coord::new(i32::MAX - 1, 0)).unwrap();
        assert_eq!(widest.shape, Shape::new(i32::MAX, 1));
    }

    #[test]
    fn extreme_rects_stay_in_range() {
        let far = Rect::new(Coord::new(i32::MAX, 0), Shape::new(2, 1));
        assert_eq!(far.far_corner(), Coord::new(i32::MAX, 0));
        assert!(far.contains(Coord::new(i32::MAX, 0)));
        assert!(!far.contains(Coord::new(0, 0)));

        let board = Rect::new(Coord::default(), Shape::new(2, 1));
        assert!(!board.encloses(&far));
        assert!(!board.intersects(&far));
        assert!(board.encloses(&Rect::new(Coord::new(1, 0), Shape::new(1, 1))));
        assert!(!board.encloses(&Rect::new(Coord::new(1, 0), Shape::new(i32::MAX, 1))));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(Coord::new(0, 0), Shape::new(2, 2));
        assert!(a.intersects(&Rect::new(Coord::new(1, 1), Shape::new(1, 1))));
        assert!(!a.intersects(&Rect::new(Coord::new(2, 0), Shape::new(1, 2))));
        assert!(!a.intersects(&Rect::new(Coord::new(0, 2), Shape::new(2, 1))));
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Right.to_string(), "right");
    }
}
