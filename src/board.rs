use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, MoveError};
use crate::geometry::{Coord, Direction, Rect, Shape};
use crate::piece::{Piece, PieceId};
use crate::state::{CanonicalState, MAX_BOARD_SIDE};

/// A single unit move of one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub direction: Direction,
}

impl Move {
    #[must_use]
    pub const fn new(piece: PieceId, direction: Direction) -> Self {
        Self { piece, direction }
    }

    #[must_use]
    pub const fn inverse(self) -> Self {
        Self::new(self.piece, self.direction.inverse())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Moved piece {} {}", self.piece, self.direction)
    }
}

/// Why a set of cells cannot be claimed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Blocked {
    OutOfBounds(Coord),
    Occupied { cell: Coord, by: PieceId },
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(cell) => write!(f, "{cell} out of bounds"),
            Self::Occupied { cell, by } => write!(f, "{cell} occupied by piece {by}"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    Blocked(Blocked),
}

impl Availability {
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("ok"),
            Self::Blocked(reason) => reason.fmt(f),
        }
    }
}

/// The result of a legal move: the configuration it led to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: CanonicalState,
    pub solved: bool,
}

#[derive(Clone, Debug)]
pub struct Board {
    shape: Shape,
    exit: Rect,
    pieces: Vec<Piece>,
    key_slot: usize,
    // row major, holds the slot in `pieces` covering each cell
    grid: Vec<Option<usize>>,
}

impl Board {
    /// Builds a board, rejecting any layout that breaks the board invariants.
    pub fn new(shape: Shape, exit: Rect, pieces: Vec<Piece>) -> Result<Self, DefinitionError> {
        if !shape.is_positive() {
            return Err(DefinitionError::BoardShape(shape));
        }
        if shape.width > MAX_BOARD_SIDE || shape.height > MAX_BOARD_SIDE {
            return Err(DefinitionError::BoardTooLarge {
                shape,
                max: MAX_BOARD_SIDE,
            });
        }

        for (slot, piece) in pieces.iter().enumerate() {
            if let Some(other) = pieces[..slot].iter().find(|other| other.id == piece.id) {
                return Err(DefinitionError::DuplicateId(other.id));
            }
        }

        let key_slot = Self::find_key_slot(&pieces)?;
        let grid = Self::layout(shape, &pieces)?;

        let board_rect = Rect::new(Coord::default(), shape);
        if !exit.shape.is_positive() || !board_rect.encloses(&exit) {
            return Err(DefinitionError::ExitOutOfBounds(exit));
        }
        let key_shape = pieces[key_slot].shape;
        if exit.shape != key_shape {
            return Err(DefinitionError::ExitShapeMismatch { exit, key_shape });
        }

        Ok(Self {
            shape,
            exit,
            pieces,
            key_slot,
            grid,
        })
    }

    fn find_key_slot(pieces: &[Piece]) -> Result<usize, DefinitionError> {
        let mut keys = pieces.iter().enumerate().filter(|(_, p)| p.key);
        let (slot, first) = keys.next().ok_or(DefinitionError::NoKeyPiece)?;
        if let Some((_, second)) = keys.next() {
            return Err(DefinitionError::MultipleKeyPieces {
                first: first.id,
                second: second.id,
            });
        }
        Ok(slot)
    }

    /// Paints every piece into a fresh occupancy grid.
    fn layout(shape: Shape, pieces: &[Piece]) -> Result<Vec<Option<usize>>, DefinitionError> {
        let board_rect = Rect::new(Coord::default(), shape);
        let mut grid = vec![None; (shape.width as usize) * (shape.height as usize)];

        for (slot, piece) in pieces.iter().enumerate() {
            if !piece.shape.is_positive() {
                return Err(DefinitionError::PieceShape {
                    id: piece.id,
                    shape: piece.shape,
                });
            }
            if !board_rect.encloses(&piece.rect()) {
                return Err(DefinitionError::PieceOutOfBounds {
                    id: piece.id,
                    rect: piece.rect(),
                });
            }
            for cell in piece.occupied_cells() {
                let index = Self::index_in(shape, cell);
                if let Some(other) = grid[index] {
                    let other: &Piece = &pieces[other];
                    return Err(DefinitionError::Overlap {
                        first: other.id,
                        second: piece.id,
                        cell,
                    });
                }
                grid[index] = Some(slot);
            }
        }

        Ok(grid)
    }

    #[inline(always)]
    const fn index_in(shape: Shape, cell: Coord) -> usize {
        (cell.y * shape.width + cell.x) as usize
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub const fn exit(&self) -> Rect {
        self.exit
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[must_use]
    pub fn key_piece(&self) -> &Piece {
        &self.pieces[self.key_slot]
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub(crate) fn slot_of(&self, id: PieceId) -> Result<usize, MoveError> {
        self.pieces
            .iter()
            .position(|p| p.id == id)
            .ok_or(MoveError::UnknownPiece(id))
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, cell: Coord) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.shape.width && cell.y < self.shape.height
    }

    /// The piece covering `cell`, if any.
    #[must_use]
    pub fn piece_at(&self, cell: Coord) -> Option<&Piece> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.grid[Self::index_in(self.shape, cell)].map(|slot| &self.pieces[slot])
    }

    /// Checks that every cell is on the board and not covered by any piece.
    pub fn is_available<I>(&self, cells: I) -> Availability
    where
        I: IntoIterator<Item = Coord>,
    {
        self.availability(cells, None)
    }

    /// Like [`Board::is_available`], but cells covered by `moving` count as free.
    pub fn is_available_for<I>(&self, cells: I, moving: PieceId) -> Result<Availability, MoveError>
    where
        I: IntoIterator<Item = Coord>,
    {
        Ok(self.availability(cells, Some(self.slot_of(moving)?)))
    }

    fn availability<I>(&self, cells: I, moving: Option<usize>) -> Availability
    where
        I: IntoIterator<Item = Coord>,
    {
        for cell in cells {
            if !self.in_bounds(cell) {
                return Availability::Blocked(Blocked::OutOfBounds(cell));
            }
            match self.grid[Self::index_in(self.shape, cell)] {
                Some(slot) if Some(slot) != moving => {
                    return Availability::Blocked(Blocked::Occupied {
                        cell,
                        by: self.pieces[slot].id,
                    });
                }
                _ => {}
            }
        }
        Availability::Available
    }

    #[inline]
    pub(crate) fn can_move_slot(&self, slot: usize, direction: Direction) -> Availability {
        let piece = &self.pieces[slot];
        self.availability(piece.candidate_strip(direction), Some(slot))
    }

    pub fn can_move(&self, id: PieceId, direction: Direction) -> Result<Availability, MoveError> {
        Ok(self.can_move_slot(self.slot_of(id)?, direction))
    }

    /// Same as [`Board::can_move`] for a raw `(dx, dy)` step, which must be one
    /// of the four unit vectors.
    pub fn can_move_by(&self, id: PieceId, dx: i32, dy: i32) -> Result<Availability, MoveError> {
        let direction = Direction::from_vector(dx, dy)?;
        self.can_move(id, direction)
    }

    /// Every legal `(slot, direction)` pair for the current configuration.
    pub(crate) fn legal_moves(&self) -> impl Iterator<Item = (usize, Direction)> + '_ {
        (0..self.pieces.len()).flat_map(move |slot| {
            Direction::ALL
                .into_iter()
                .filter(move |&direction| self.can_move_slot(slot, direction).is_available())
                .map(move |direction| (slot, direction))
        })
    }

    #[must_use]
    pub fn legal_move_count(&self) -> usize {
        self.legal_moves().count()
    }

    /// Every legal move for the current configuration, by piece id.
    #[must_use]
    pub fn available_moves(&self) -> Vec<Move> {
        self.legal_moves()
            .map(|(slot, direction)| Move::new(self.pieces[slot].id, direction))
            .collect()
    }

    /// Moves a piece without any legality check, keeping the grid in sync.
    /// Only valid when the candidate strip is known to be free, e.g. when
    /// undoing the move that just vacated it.
    pub(crate) fn shift(&mut self, slot: usize, direction: Direction) {
        let piece = &self.pieces[slot];
        for cell in piece.trailing_strip(direction) {
            self.grid[Self::index_in(self.shape, cell)] = None;
        }
        for cell in piece.candidate_strip(direction) {
            self.grid[Self::index_in(self.shape, cell)] = Some(slot);
        }
        self.pieces[slot].apply_move(direction);

        #[cfg(feature = "paranoid")]
        if let Err(violation) = self.check_invariants() {
            panic!("board invariant broken after moving slot {slot} {direction}: {violation}");
        }
    }

    /// Validates the move, applies it on success and reports where it led.
    pub(crate) fn apply_and_check(&mut self, slot: usize, direction: Direction) -> Result<Transition, Blocked> {
        if let Availability::Blocked(reason) = self.can_move_slot(slot, direction) {
            return Err(reason);
        }
        self.shift(slot, direction);
        Ok(Transition {
            state: self.canonical_state(),
            solved: self.is_solved(),
        })
    }

    /// Checked single move through the public API. The board is unchanged on error.
    pub fn apply_move(&mut self, id: PieceId, direction: Direction) -> Result<Transition, MoveError> {
        let slot = self.slot_of(id)?;
        self.apply_and_check(slot, direction)
            .map_err(|reason| MoveError::Blocked { id, direction, reason })
    }

    /// Plays a move log from the current configuration, stopping at the first
    /// illegal move.
    pub fn replay<'m, I>(&mut self, moves: I) -> Result<(), MoveError>
    where
        I: IntoIterator<Item = &'m Move>,
    {
        for mv in moves {
            self.apply_move(mv.piece, mv.direction)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn canonical_state(&self) -> CanonicalState {
        CanonicalState::from_pieces(&self.pieces)
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.key_piece().rect() == self.exit
    }

    /// Recomputes the occupancy from the piece positions alone and compares it
    /// with the incrementally maintained grid.
    ///
    /// # Panics
    ///
    /// If the grid has drifted from the piece positions, which only a bug in
    /// the move bookkeeping can cause.
    pub fn check_invariants(&self) -> Result<(), DefinitionError> {
        let fresh = Self::layout(self.shape, &self.pieces)?;
        assert_eq!(fresh, self.grid, "occupancy grid out of sync with piece positions");
        Ok(())
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.exit == other.exit && self.canonical_state() == other.canonical_state()
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for piece in &self.pieces {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "{piece}")?;
        }
        Ok(())
    }
}
