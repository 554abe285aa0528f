use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{DefinitionError, KlotskiError};
use crate::geometry::{Coord, Rect, Shape};
use crate::piece::{Piece, PieceId};

/// A puzzle as it is written down: board shape, the two inclusive corners
/// of the exit and the pieces. Piece ids are the list indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub board_shape: [i32; 2],
    pub exit_space: [[i32; 2]; 2],
    pub pieces: Vec<PieceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDefinition {
    pub shape: [i32; 2],
    pub position: [i32; 2],
    #[serde(default)]
    pub key: bool,
}

impl PuzzleDefinition {
    /// The 4x5 puzzle the solver ships with.
    #[must_use]
    pub fn classic() -> Self {
        let piece = |shape, position, key| PieceDefinition { shape, position, key };
        Self {
            board_shape: [4, 5],
            exit_space: [[1, 3], [2, 4]],
            pieces: vec![
                piece([1, 2], [0, 0], false),
                piece([1, 2], [0, 2], false),
                piece([1, 1], [0, 4], false),
                piece([2, 2], [1, 0], true),
                piece([2, 1], [1, 2], false),
                piece([1, 1], [1, 3], false),
                piece([1, 1], [2, 3], false),
                piece([1, 2], [3, 0], false),
                piece([1, 2], [3, 2], false),
                piece([1, 1], [3, 4], false),
            ],
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, KlotskiError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, KlotskiError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Loads and validates a definition in one go.
    pub fn load_board(path: impl AsRef<Path>) -> Result<Board, KlotskiError> {
        Ok(Self::from_json_file(path)?.build()?)
    }

    pub fn exit_rect(&self) -> Result<Rect, DefinitionError> {
        let [from, to] = self.exit_space.map(Coord::from);
        Rect::from_corners(from, to).ok_or(DefinitionError::ExitSpan { from, to })
    }

    pub fn to_pieces(&self) -> Result<Vec<Piece>, DefinitionError> {
        self.pieces
            .iter()
            .enumerate()
            .map(|(index, def)| {
                let id = PieceId(u32::try_from(index).map_err(|_| DefinitionError::TooManyPieces(self.pieces.len()))?);
                Ok(Piece::new(id, Shape::from(def.shape), Coord::from(def.position), def.key))
            })
            .collect()
    }

    /// Validates the definition and builds the board it describes.
    pub fn build(&self) -> Result<Board, DefinitionError> {
        Board::new(self.board_shape.into(), self.exit_rect()?, self.to_pieces()?)
    }
}

impl TryFrom<&PuzzleDefinition> for Board {
    type Error = DefinitionError;

    fn try_from(definition: &PuzzleDefinition) -> Result<Self, Self::Error> {
        definition.build()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classic_puzzle_builds() {
        let board = PuzzleDefinition::classic().build().unwrap();
        assert_eq!(board.shape(), Shape::new(4, 5));
        assert_eq!(board.exit(), Rect::new(Coord::new(1, 3), Shape::new(2, 2)));
        assert_eq!(board.pieces().len(), 10);
        assert_eq!(board.key_piece().id, PieceId(3));
        assert!(!board.is_solved());
    }

    #[test]
    fn key_defaults_to_false() {
        let definition = PuzzleDefinition::from_json_str(
            r#"{"board_shape": [2, 1], "exit_space": [[1, 0], [1, 0]],
                "pieces": [{"shape": [1, 1], "position": [0, 0], "key": true},
                           {"shape": [1, 1], "position": [1, 0]}]}"#,
        )
        .unwrap();
        assert!(!definition.pieces[1].key);
        assert!(definition.build().is_ok());
    }

    #[test]
    fn exit_corners_may_be_swapped() {
        let mut definition = PuzzleDefinition::classic();
        definition.exit_space = [[2, 4], [1, 3]];
        let board = definition.build().unwrap();
        assert_eq!(board.exit(), Rect::new(Coord::new(1, 3), Shape::new(2, 2)));
    }

    #[test]
    fn malformed_definitions_are_rejected() {
        let mut overlapping = PuzzleDefinition::classic();
        overlapping.pieces[5].position = [1, 2];
        assert!(matches!(overlapping.build(), Err(DefinitionError::Overlap { .. })));

        let mut keyless = PuzzleDefinition::classic();
        keyless.pieces[3].key = false;
        assert_eq!(keyless.build(), Err(DefinitionError::NoKeyPiece));

        let mut two_keys = PuzzleDefinition::classic();
        two_keys.pieces[0].key = true;
        assert_eq!(
            two_keys.build(),
            Err(DefinitionError::MultipleKeyPieces {
                first: PieceId(0),
                second: PieceId(3)
            })
        );

        let mut small_exit = PuzzleDefinition::classic();
        small_exit.exit_space = [[1, 4], [2, 4]];
        assert!(matches!(small_exit.build(), Err(DefinitionError::ExitShapeMismatch { .. })));

        let mut negative = PuzzleDefinition::classic();
        negative.board_shape = [-4, 5];
        assert_eq!(negative.build(), Err(DefinitionError::BoardShape(Shape::new(-4, 5))));

        let mut off_board = PuzzleDefinition::classic();
        off_board.pieces[9].position = [3, 5];
        assert!(matches!(off_board.build(), Err(DefinitionError::PieceOutOfBounds { .. })));
    }

    #[test]
    fn extreme_coordinates_are_rejected() {
        let far_piece = PuzzleDefinition::from_json_str(
            r#"{"board_shape": [2, 1], "exit_space": [[1, 0], [1, 0]],
                "pieces": [{"shape": [1, 1], "position": [0, 0], "key": true},
                           {"shape": [1, 1], "position": [2147483647, 0]}]}"#,
        )
        .unwrap();
        assert_eq!(
            far_piece.build(),
            Err(DefinitionError::PieceOutOfBounds {
                id: PieceId(1),
                rect: Rect::new(Coord::new(i32::MAX, 0), Shape::new(1, 1))
            })
        );

        let mut wide_exit = far_piece;
        wide_exit.pieces.truncate(1);
        wide_exit.exit_space = [[i32::MIN, 0], [i32::MAX, 0]];
        assert_eq!(
            wide_exit.build(),
            Err(DefinitionError::ExitSpan {
                from: Coord::new(i32::MIN, 0),
                to: Coord::new(i32::MAX, 0)
            })
        );

        let mut stray_exit = wide_exit;
        stray_exit.exit_space = [[i32::MAX, 0], [i32::MAX, 0]];
        assert!(matches!(stray_exit.build(), Err(DefinitionError::ExitOutOfBounds(_))));
    }

    #[test]
    fn classic_matches_test_data() {
        let from_file = PuzzleDefinition::from_json_file("test_data/solvable/classic.json").unwrap();
        assert_eq!(from_file, PuzzleDefinition::classic());
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        assert!(matches!(
            PuzzleDefinition::from_json_str(r#"{"board_shape": [4]}"#),
            Err(KlotskiError::Json(_))
        ));
    }
}
