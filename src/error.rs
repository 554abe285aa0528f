use thiserror::Error;

use crate::board::Blocked;
use crate::geometry::{Coord, Direction, InvalidDirection, Rect, Shape};
use crate::piece::PieceId;

/// A puzzle definition that violates a structural rule. A board is never
/// built from a definition that produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("board shape {0} must be positive in both dimensions")]
    BoardShape(Shape),

    #[error("board shape {shape} exceeds the maximum side of {max} cells")]
    BoardTooLarge { shape: Shape, max: i32 },

    #[error("{0} pieces do not fit in a piece id")]
    TooManyPieces(usize),

    #[error("piece {id} has non-positive shape {shape}")]
    PieceShape { id: PieceId, shape: Shape },

    #[error("piece {id} at {rect} does not fit on the board")]
    PieceOutOfBounds { id: PieceId, rect: Rect },

    #[error("pieces {first} and {second} overlap at {cell}")]
    Overlap { first: PieceId, second: PieceId, cell: Coord },

    #[error("duplicate piece id {0}")]
    DuplicateId(PieceId),

    #[error("no piece is marked as the key piece")]
    NoKeyPiece,

    #[error("pieces {first} and {second} are both marked as the key piece")]
    MultipleKeyPieces { first: PieceId, second: PieceId },

    #[error("exit corners {from} and {to} span more cells than a board can have")]
    ExitSpan { from: Coord, to: Coord },

    #[error("exit space {0} does not fit on the board")]
    ExitOutOfBounds(Rect),

    #[error("exit space {exit} does not match key piece shape {key_shape}")]
    ExitShapeMismatch { exit: Rect, key_shape: Shape },
}

/// Failure of a checked move requested through the public board API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece with id {0}")]
    UnknownPiece(PieceId),

    #[error(transparent)]
    InvalidDirection(#[from] InvalidDirection),

    #[error("piece {id} cannot move {direction}: {reason}")]
    Blocked {
        id: PieceId,
        direction: Direction,
        reason: Blocked,
    },
}

#[derive(Debug, Error)]
pub enum KlotskiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("malformed puzzle definition: {0}")]
    MalformedDefinition(#[from] DefinitionError),

    #[error("step of {seconds} seconds is not a usable delay")]
    StepDelay {
        seconds: f64,
        source: std::time::TryFromFloatSecsError,
    },
}
