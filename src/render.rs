use cli_table::format::Justify;
use cli_table::{Cell, CellStruct, Color, Style, Table, TableStruct};

use crate::board::{Board, Move};
use crate::geometry::{Coord, Direction, Shape};

const PALETTE: [Color; 6] = [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta, Color::Blue, Color::Red];

/// What the last replayed move was, so the renderer can mark the piece that
/// moved and the cells it left.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub last_move: Move,
}

fn shape_color(shapes: &[Shape], shape: Shape) -> Option<Color> {
    shapes
        .iter()
        .position(|s| *s == shape)
        .map(|index| PALETTE[index % PALETTE.len()])
}

// shapes in order of first appearance, so colours are stable for one puzzle
fn distinct_shapes(board: &Board) -> Vec<Shape> {
    let mut shapes: Vec<Shape> = vec![];
    for piece in board.pieces() {
        if !shapes.contains(&piece.shape) {
            shapes.push(piece.shape);
        }
    }
    shapes
}

fn vacated_cells(board: &Board, highlight: Option<Highlight>) -> Vec<Coord> {
    let Some(Highlight { last_move }) = highlight else {
        return vec![];
    };
    let Some(piece) = board.piece(last_move.piece) else {
        return vec![];
    };
    // stepping back would cover exactly the cells the move left
    piece.candidate_strip(last_move.direction.inverse()).collect()
}

#[must_use]
pub fn board_table(board: &Board, highlight: Option<Highlight>) -> TableStruct {
    let shapes = distinct_shapes(board);
    let vacated = vacated_cells(board, highlight);
    let shape = board.shape();

    let rows = (0..shape.height).map(|y| {
        (0..shape.width)
            .map(|x| {
                let cell = Coord::new(x, y);
                render_cell(board, cell, &shapes, &vacated, highlight)
            })
            .collect::<Vec<CellStruct>>()
    });

    rows.collect::<Vec<_>>().table()
}

fn render_cell(board: &Board, cell: Coord, shapes: &[Shape], vacated: &[Coord], highlight: Option<Highlight>) -> CellStruct {
    match board.piece_at(cell) {
        Some(piece) => {
            let moved = highlight.is_some_and(|h| h.last_move.piece == piece.id);
            piece
                .id
                .cell()
                .justify(Justify::Center)
                .background_color(shape_color(shapes, piece.shape))
                .foreground_color(Some(Color::Black))
                .bold(piece.key || moved)
                .underline(moved)
        }
        None if vacated.contains(&cell) => "#".cell().justify(Justify::Center).italic(true),
        None if board.exit().contains(cell) => ".".cell().justify(Justify::Center),
        None => "".cell(),
    }
}

/// Renders the board as a grid of piece ids. Free cells of the exit are
/// shown as `.`, cells vacated by the last move as `#`.
pub fn render_board(board: &Board, highlight: Option<Highlight>) -> std::io::Result<String> {
    Ok(board_table(board, highlight).display()?.to_string())
}

#[must_use]
pub fn moves_table(moves: &[Move]) -> TableStruct {
    moves
        .iter()
        .enumerate()
        .map(|(index, mv)| vec![(index + 1).cell(), mv.piece.cell(), direction_arrow(mv.direction).cell()])
        .collect::<Vec<_>>()
        .table()
        .title(vec!["#".cell().bold(true), "piece".cell().bold(true), "direction".cell().bold(true)])
}

pub fn render_moves(moves: &[Move]) -> std::io::Result<String> {
    Ok(moves_table(moves).display()?.to_string())
}

const fn direction_arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "up ↑",
        Direction::Down => "down ↓",
        Direction::Left => "left ←",
        Direction::Right => "right →",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::definition::PuzzleDefinition;
    use crate::piece::PieceId;

    #[test]
    fn renders_every_piece_id() {
        let board = PuzzleDefinition::classic().build().unwrap();
        let rendered = render_board(&board, None).unwrap();
        for id in 0..10 {
            assert!(rendered.contains(&id.to_string()), "missing piece {id} in\n{rendered}");
        }
        assert!(!rendered.contains('#'));
    }

    #[test]
    fn marks_cells_left_by_the_last_move() {
        let mut board = PuzzleDefinition::classic().build().unwrap();
        board.apply_move(PieceId(5), Direction::Down).unwrap();
        let highlight = Highlight {
            last_move: Move::new(PieceId(5), Direction::Down),
        };
        assert_eq!(vacated_cells(&board, Some(highlight)), vec![Coord::new(1, 3)]);
        let rendered = render_board(&board, Some(highlight)).unwrap();
        assert!(rendered.contains('#'));
    }

    #[test]
    fn vacated_strip_of_a_wide_piece() {
        let mut board = PuzzleDefinition::classic().build().unwrap();
        // free the row below the horizontal bar first
        board.apply_move(PieceId(5), Direction::Down).unwrap();
        board.apply_move(PieceId(6), Direction::Down).unwrap();
        board.apply_move(PieceId(4), Direction::Down).unwrap();
        let highlight = Highlight {
            last_move: Move::new(PieceId(4), Direction::Down),
        };
        assert_eq!(
            vacated_cells(&board, Some(highlight)),
            vec![Coord::new(1, 2), Coord::new(2, 2)]
        );
    }

    #[test]
    fn moves_are_numbered_from_one() {
        let moves = [Move::new(PieceId(4), Direction::Left), Move::new(PieceId(3), Direction::Down)];
        let rendered = render_moves(&moves).unwrap();
        assert!(rendered.contains("piece"));
        assert!(rendered.contains("left ←"));
        assert!(rendered.contains("down ↓"));
        assert!(rendered.contains('2'));
    }
}
