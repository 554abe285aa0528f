#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod config;
pub mod definition;
pub mod error;
pub mod geometry;
pub mod piece;
pub mod render;
pub mod solver;
pub mod state;

pub use board::{Availability, Blocked, Board, Move, Transition};
pub use config::{Memoization, SolverConfig};
pub use definition::PuzzleDefinition;
pub use error::{DefinitionError, KlotskiError, MoveError};
pub use geometry::{Coord, Direction, InvalidDirection, Rect, Shape};
pub use piece::{Piece, PieceId};
pub use solver::{SearchOutcome, SearchStats, SolveStatus, Solver};
pub use state::CanonicalState;
