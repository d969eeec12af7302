//! # Solver
//!
//! Classic recursive decomposition: to move `n` disks from `src` to `dest`,
//! park the top `n - 1` on the spare pole, move the largest disk, then bring
//! the `n - 1` back on top of it.
//!
//! The solver knows nothing about terminals. It reports progress to a
//! `MoveObserver`, once before the first move and once after every move.

use log::{error, info};
use thiserror::Error;

use crate::core::state::{DESTINATION_POLE, Move, MoveError, NUM_POLES, Puzzle, SOURCE_POLE};

/// Receives the puzzle state as the solver makes progress.
pub trait MoveObserver {
    /// Called once with the initial state, before any move.
    fn start(&mut self, puzzle: &Puzzle) -> std::io::Result<()>;

    /// Called after every successful single-disk move.
    fn moved(&mut self, puzzle: &Puzzle, mv: Move) -> std::io::Result<()>;
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("no spare pole for poles {a} and {b}")]
    NoSpare { a: usize, b: usize },
    #[error("failed to render frame: {0}")]
    Observer(#[from] std::io::Error),
}

impl SolveError {
    /// True for errors that mean the solver itself is wrong.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SolveError::Move(_) | SolveError::NoSpare { .. })
    }
}

/// The pole that is neither `a` nor `b`.
///
/// Indices sum to `0 + 1 + 2 = 3`, so the third is `3 - a - b`. Returns
/// `None` when `a == b` or either index is out of range.
pub fn get_spare(a: usize, b: usize) -> Option<usize> {
    const INDEX_SUM: usize = NUM_POLES * (NUM_POLES - 1) / 2;
    if a == b || a >= NUM_POLES || b >= NUM_POLES {
        return None;
    }
    Some(INDEX_SUM - a - b)
}

/// Number of moves an `n`-layer solve takes, `2^n - 1`, if it fits in `u128`.
pub fn total_moves(num_layers: usize) -> Option<u128> {
    let shift = u32::try_from(num_layers).ok()?;
    1u128.checked_shl(shift).map(|p| p - 1).or_else(|| {
        // 2^128 - 1 is still representable
        (shift == 128).then_some(u128::MAX)
    })
}

/// Moves every disk from the source pole to the destination pole.
pub fn solve<O: MoveObserver + ?Sized>(
    puzzle: &mut Puzzle,
    observer: &mut O,
) -> Result<(), SolveError> {
    let num_layers = puzzle.num_layers();
    info!("Solving {} layers", num_layers);

    observer.start(puzzle)?;
    if num_layers > 0 {
        move_stack(puzzle, observer, num_layers, SOURCE_POLE, DESTINATION_POLE).inspect_err(
            |e| {
                if e.is_invariant_violation() {
                    error!("Solver invariant violated after {} moves: {}", puzzle.moves(), e);
                }
            },
        )?;
    }

    info!("Solved in {} moves", puzzle.moves());
    Ok(())
}

fn move_stack<O: MoveObserver + ?Sized>(
    puzzle: &mut Puzzle,
    observer: &mut O,
    size: usize,
    src: usize,
    dest: usize,
) -> Result<(), SolveError> {
    if size == 1 {
        let mv = puzzle.move_top_disk(src, dest)?;
        observer.moved(puzzle, mv)?;
        return Ok(());
    }

    let spare = get_spare(src, dest).ok_or(SolveError::NoSpare { a: src, b: dest })?;
    move_stack(puzzle, observer, size - 1, src, spare)?;
    move_stack(puzzle, observer, 1, src, dest)?;
    move_stack(puzzle, observer, size - 1, spare, dest)
}
