//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io;

use crate::core::solver::MoveObserver;
use crate::core::state::{Move, Puzzle};

/// Records every callback the solver makes, plus a snapshot of the pole
/// sizes at each one.
#[derive(Default)]
pub struct RecordingObserver {
    pub starts: usize,
    pub moves: Vec<Move>,
    /// Pole sizes (bottom → top) at start and after each move.
    pub snapshots: Vec<Vec<Vec<usize>>>,
    /// Fail the callback once this many moves have been recorded.
    pub fail_after: Option<usize>,
}

impl RecordingObserver {
    fn snapshot(&mut self, puzzle: &Puzzle) {
        self.snapshots
            .push(puzzle.poles().iter().map(|p| p.sizes()).collect());
    }
}

impl MoveObserver for RecordingObserver {
    fn start(&mut self, puzzle: &Puzzle) -> io::Result<()> {
        self.starts += 1;
        self.snapshot(puzzle);
        Ok(())
    }

    fn moved(&mut self, puzzle: &Puzzle, mv: Move) -> io::Result<()> {
        self.moves.push(mv);
        self.snapshot(puzzle);
        if self.fail_after == Some(self.moves.len()) {
            return Err(io::Error::other("observer failed"));
        }
        Ok(())
    }
}
