use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use strum::EnumCount;
use tracing::{debug, info, trace};

use crate::board::{Board, Move};
use crate::config::{Memoization, SearchConfig};
use crate::geometry::Direction;
use crate::state::CanonicalState;

const DIRECTION_COUNT: usize = Direction::COUNT;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    Solved,
    /// Every move reachable from the initial configuration was tried.
    Exhausted,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Legal moves applied to the board, including ones undone right away.
    pub moves_applied: u64,
    /// Moves that led back to a configuration already on the path (or exhausted).
    pub dead_ends: u64,
    /// Levels that ran out of moves and were unwound.
    pub backtracks: u64,
    /// Length of the longest path explored.
    pub max_depth: usize,
    /// Number of legal moves at the initial configuration.
    pub root_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub status: SolveStatus,
    pub moves: Vec<Move>,
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl SearchOutcome {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.status == SolveStatus::Solved
    }
}

// the move a level made to reach the level above it
#[derive(Debug)]
struct Descent {
    slot: usize,
    direction: Direction,
    state: CanonicalState,
}

/// One level of the depth first search.
#[derive(Debug)]
struct Frame {
    order: SmallVec<[usize; 16]>,
    // position in `order` x directions
    cursor: usize,
    capacity: usize,
    exhausted: usize,
    descent: Option<Descent>,
}

impl Frame {
    fn next_candidate(&mut self) -> Option<(usize, Direction)> {
        if self.exhausted >= self.capacity {
            return None;
        }
        let slot = *self.order.get(self.cursor / DIRECTION_COUNT)?;
        let direction = Direction::ALL[self.cursor % DIRECTION_COUNT];
        self.cursor += 1;
        Some((slot, direction))
    }
}

enum Attempt {
    Illegal,
    Solved,
    DeadEnd,
    Descend(CanonicalState),
}

/// Randomized depth first search over unit moves.
///
/// Levels live on an explicit stack of [`Frame`]s instead of the call stack,
/// solution paths can be tens of thousands of moves long. Entering a frame
/// corresponds to recursing, popping an exhausted frame makes its parent undo
/// the move that led to it. The board is only ever mutated through
/// [`Board::apply_and_check`] and the matching undo, so whenever a frame picks
/// its next candidate the board is exactly the configuration it started from.
pub struct Solver<R = ChaCha8Rng> {
    pub board: Board,

    rng: R,
    memoization: Memoization,

    on_path: FxHashSet<CanonicalState>,
    exhausted: FxHashSet<CanonicalState>,

    moves: Vec<Move>,
    frames: Vec<Frame>,

    stats: SearchStats,
}

impl Solver<ChaCha8Rng> {
    /// A solver whose shuffles are seeded from the operating system.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self::with_rng(board, ChaCha8Rng::from_os_rng())
    }

    #[must_use]
    pub fn with_seed(board: Board, seed: u64) -> Self {
        Self::with_rng(board, ChaCha8Rng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_config(board: Board, config: &SearchConfig) -> Self {
        let solver = match config.random_seed {
            Some(seed) => Self::with_seed(board, seed),
            None => Self::new(board),
        };
        solver.memoization(config.memoization)
    }
}

impl<R: Rng> Solver<R> {
    pub fn with_rng(board: Board, rng: R) -> Self {
        Self {
            board,
            rng,
            memoization: Memoization::default(),
            on_path: FxHashSet::default(),
            exhausted: FxHashSet::default(),
            moves: Vec::new(),
            frames: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn memoization(mut self, memoization: Memoization) -> Self {
        self.memoization = memoization;
        self
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn solve(&mut self) -> SearchOutcome {
        let started = Instant::now();
        self.reset();

        info!(
            event = "solve_start",
            pieces = self.board.pieces().len(),
            memoization = ?self.memoization
        );

        let status = if self.board.is_solved() {
            SolveStatus::Solved
        } else {
            let initial = self.board.canonical_state();
            self.on_path.insert(initial.clone());
            let status = self.solve_dfs();
            debug_assert!(
                status == SolveStatus::Solved || self.board.canonical_state() == initial,
                "an exhausted search must leave the board as it found it"
            );
            status
        };

        let outcome = SearchOutcome {
            status,
            moves: std::mem::take(&mut self.moves),
            elapsed: started.elapsed(),
            stats: self.stats,
        };
        self.reset();

        info!(
            event = "solve_end",
            solved = outcome.is_solved(),
            moves = outcome.moves.len(),
            moves_applied = outcome.stats.moves_applied,
            max_depth = outcome.stats.max_depth,
            elapsed = ?outcome.elapsed
        );
        outcome
    }

    fn reset(&mut self) {
        self.on_path.clear();
        self.exhausted.clear();
        self.moves.clear();
        self.frames.clear();
        self.stats = SearchStats::default();
    }

    fn solve_dfs(&mut self) -> SolveStatus {
        self.enter_level();

        while let Some(frame) = self.frames.last_mut() {
            let Some((slot, direction)) = frame.next_candidate() else {
                debug_assert!(frame.exhausted == frame.capacity, "every legal move of a level is tried once");
                self.frames.pop();
                if !self.backtrack() {
                    debug!(event = "root_exhausted", root_capacity = self.stats.root_capacity);
                    return SolveStatus::Exhausted;
                }
                continue;
            };

            match self.try_move(slot, direction) {
                Attempt::Illegal => {}
                Attempt::Solved => return SolveStatus::Solved,
                Attempt::DeadEnd => self.count_exhausted(),
                Attempt::Descend(state) => {
                    if let Some(frame) = self.frames.last_mut() {
                        frame.descent = Some(Descent { slot, direction, state });
                    }
                    self.enter_level();
                }
            }
        }

        SolveStatus::Exhausted
    }

    fn enter_level(&mut self) {
        let capacity = self.board.legal_move_count();
        let mut order: SmallVec<[usize; 16]> = (0..self.board.pieces().len()).collect();
        order.shuffle(&mut self.rng);

        if self.frames.is_empty() {
            self.stats.root_capacity = capacity;
        }
        self.stats.max_depth = self.stats.max_depth.max(self.moves.len());

        self.frames.push(Frame {
            order,
            cursor: 0,
            capacity,
            exhausted: 0,
            descent: None,
        });
    }

    fn try_move(&mut self, slot: usize, direction: Direction) -> Attempt {
        let Ok(transition) = self.board.apply_and_check(slot, direction) else {
            return Attempt::Illegal;
        };
        self.stats.moves_applied += 1;
        let mv = Move::new(self.board.pieces()[slot].id, direction);

        if transition.solved {
            self.moves.push(mv);
            trace!(depth = self.moves.len(), %mv, "solved");
            return Attempt::Solved;
        }

        let seen = self.on_path.contains(&transition.state)
            || (self.memoization == Memoization::PathAndExhausted && self.exhausted.contains(&transition.state));
        if seen {
            self.board.shift(slot, direction.inverse());
            self.stats.dead_ends += 1;
            return Attempt::DeadEnd;
        }

        self.on_path.insert(transition.state.clone());
        self.moves.push(mv);
        trace!(depth = self.moves.len(), %mv, "descend");
        Attempt::Descend(transition.state)
    }

    /// Undoes the move that led to the level just popped. Returns `false` when
    /// the popped level was the root.
    fn backtrack(&mut self) -> bool {
        let Some(parent) = self.frames.last_mut() else {
            return false;
        };
        let Some(Descent { slot, direction, state }) = parent.descent.take() else {
            unreachable!("a level below the root is only entered through a descent");
        };

        self.board.shift(slot, direction.inverse());
        self.on_path.remove(&state);
        if self.memoization == Memoization::PathAndExhausted {
            self.exhausted.insert(state);
        }
        let undone = self.moves.pop();
        trace!(depth = self.moves.len(), mv = ?undone, "backtrack");

        self.stats.backtracks += 1;
        self.count_exhausted();
        true
    }

    fn count_exhausted(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.exhausted += 1;
        }
    }
}
