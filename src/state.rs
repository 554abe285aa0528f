//! Order independent encoding of a board configuration.
//!
//! Each `(piece id, position)` pair is packed into one `u64` and the pairs
//! are sorted by id, so the key does not depend on the order pieces are
//! stored in. Ids take the high 32 bits and each coordinate 16 bits; boards
//! are limited to `MAX_BOARD_SIDE` cells per side, which keeps the packing
//! injective.

use std::fmt;

use crate::geometry::Coord;
use crate::piece::{Piece, PieceId};

pub const MAX_BOARD_SIDE: i32 = u16::MAX as i32;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CanonicalState(Box<[u64]>);

impl CanonicalState {
    pub fn from_pieces<'p, I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = &'p Piece>,
    {
        let mut packed: Vec<u64> = pieces.into_iter().map(|p| pack(p.id, p.position)).collect();
        // the id lives in the high bits, so sorting the packed words sorts by id
        packed.sort_unstable();
        Self(packed.into_boxed_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = (PieceId, Coord)> + '_ {
        self.0.iter().map(|&word| unpack(word))
    }
}

#[inline]
fn pack(id: PieceId, position: Coord) -> u64 {
    debug_assert!((0..=MAX_BOARD_SIDE).contains(&position.x));
    debug_assert!((0..=MAX_BOARD_SIDE).contains(&position.y));
    (u64::from(id.0) << 32) | ((position.x as u64 & 0xFFFF) << 16) | (position.y as u64 & 0xFFFF)
}

#[inline]
fn unpack(word: u64) -> (PieceId, Coord) {
    let id = PieceId((word >> 32) as u32);
    let x = ((word >> 16) & 0xFFFF) as i32;
    let y = (word & 0xFFFF) as i32;
    (id, Coord::new(x, y))
}

impl fmt::Debug for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (id, position) in self.entries() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{id}@{position}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Shape;

    fn piece(id: u32, x: i32, y: i32) -> Piece {
        Piece::new(PieceId(id), Shape::new(1, 1), Coord::new(x, y), false)
    }

    #[test]
    fn ordering_does_not_matter() {
        let a = [piece(0, 0, 0), piece(1, 3, 2), piece(2, 1, 4)];
        let b = [piece(2, 1, 4), piece(0, 0, 0), piece(1, 3, 2)];
        assert_eq!(CanonicalState::from_pieces(&a), CanonicalState::from_pieces(&b));
    }

    #[test]
    fn swapping_positions_changes_the_key() {
        let a = [piece(0, 0, 0), piece(1, 1, 0)];
        let b = [piece(0, 1, 0), piece(1, 0, 0)];
        assert_ne!(CanonicalState::from_pieces(&a), CanonicalState::from_pieces(&b));
    }

    #[test]
    fn entries_unpack_in_id_order() {
        let pieces = [piece(7, 40000, 3), piece(1, 2, 65535)];
        let state = CanonicalState::from_pieces(&pieces);
        let entries: Vec<_> = state.entries().collect();
        assert_eq!(
            entries,
            vec![(PieceId(1), Coord::new(2, 65535)), (PieceId(7), Coord::new(40000, 3))]
        );
        assert_eq!(state.to_string(), "1@(2, 65535) 7@(40000, 3)");
    }
}
