//! # Terminal Adapter
//!
//! Writes puzzle frames to the terminal as the solver makes progress.
//! This is the only module that knows about crossterm.
//!
//! ## Render Modes
//!
//! - **Append**: every frame is printed below the last one, followed by two
//!   blank lines. Works when stdout is a pipe or a file.
//! - **In-place**: the previous frame is erased with cursor-up/clear-line
//!   escapes and redrawn, headed by a `Moves: k / total` counter. The cursor
//!   is hidden for the duration.
//!
//! Either mode sleeps for the configured delay before each post-move frame.

pub mod render;

use log::{debug, error, info};
use std::io::{self, BufWriter, Write, stdout};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveToPreviousLine, Show};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};

use crate::AppError;
use crate::core::colormap::Rgb;
use crate::core::config::{RenderMode, ResolvedConfig};
use crate::core::solver::{MoveObserver, solve, total_moves};
use crate::core::state::{Move, Puzzle};
use crate::tui::render::{RenderStyle, render};

/// Draws frames to `out` and paces the animation.
pub struct Animator<W: Write> {
    out: W,
    mode: RenderMode,
    delay: Duration,
    style: RenderStyle,
    total: Option<u128>,
    /// Lines the last in-place frame occupies (0 = nothing drawn yet).
    drawn_lines: usize,
}

impl<W: Write> Animator<W> {
    pub fn new(out: W, mode: RenderMode, delay: Duration, style: RenderStyle, num_layers: usize) -> Self {
        Self {
            out,
            mode,
            delay,
            style,
            total: total_moves(num_layers),
            drawn_lines: 0,
        }
    }

    pub fn from_config(out: W, config: &ResolvedConfig, num_layers: usize) -> Self {
        Self::new(
            out,
            config.mode,
            config.delay,
            RenderStyle::from_config(config),
            num_layers,
        )
    }

    /// Draws the current state as one frame and flushes it.
    pub fn draw(&mut self, puzzle: &Puzzle) -> io::Result<()> {
        let rows = render(puzzle, &self.style);
        match self.mode {
            RenderMode::Append => self.draw_append(&rows)?,
            RenderMode::InPlace => self.draw_in_place(&rows, puzzle.moves())?,
        }
        self.out.flush()
    }

    fn draw_append(&mut self, rows: &[String]) -> io::Result<()> {
        for row in rows {
            writeln!(self.out, "{row}")?;
        }
        write!(self.out, "\n\n")
    }

    fn draw_in_place(&mut self, rows: &[String], moves: u64) -> io::Result<()> {
        for _ in 0..self.drawn_lines {
            queue!(self.out, MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;
        }

        match self.total {
            Some(total) => writeln!(self.out, "Moves: {moves} / {total}")?,
            None => writeln!(self.out, "Moves: {moves}")?,
        }
        for row in rows {
            writeln!(self.out, "{row}")?;
        }
        self.drawn_lines = rows.len() + 1;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MoveObserver for Animator<W> {
    fn start(&mut self, puzzle: &Puzzle) -> io::Result<()> {
        self.draw(puzzle)
    }

    fn moved(&mut self, puzzle: &Puzzle, _mv: Move) -> io::Result<()> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.draw(puzzle)
    }
}

/// Hides the cursor while an in-place animation runs.
struct CursorGuard;

impl CursorGuard {
    fn new() -> io::Result<Self> {
        execute!(stdout(), Hide)?;
        debug!("Cursor hidden for in-place rendering");
        Ok(Self)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// Builds the puzzle and animates its solution on stdout.
pub fn run(config: &ResolvedConfig, num_layers: usize, palette: Option<&[Rgb]>) -> Result<(), AppError> {
    let mut puzzle = Puzzle::new(num_layers, palette)?;

    let _cursor_guard = match config.mode {
        RenderMode::InPlace => Some(CursorGuard::new()?),
        RenderMode::Append => None,
    };
    let mut animator = Animator::from_config(BufWriter::new(stdout().lock()), config, num_layers);

    info!(
        "Animating {} layers ({:?} mode, {}ms delay)",
        num_layers,
        config.mode,
        config.delay.as_millis()
    );
    animate(&mut puzzle, &mut animator)
}

/// Solves `puzzle`, drawing every step through `animator`.
///
/// On an invariant violation the offending state is drawn before the error
/// is returned.
pub fn animate<W: Write>(puzzle: &mut Puzzle, animator: &mut Animator<W>) -> Result<(), AppError> {
    match solve(puzzle, animator) {
        Ok(()) => Ok(()),
        Err(e) if e.is_invariant_violation() => {
            if let Err(draw_err) = animator.draw(puzzle) {
                error!("Could not draw failing state: {}", draw_err);
            }
            Err(AppError::InvariantViolation(e))
        }
        Err(e) => Err(e.into()),
    }
}
