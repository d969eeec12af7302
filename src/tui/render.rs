//! Text frames for the puzzle.
//!
//! Each pole occupies a field `2 * num_layers - 1` columns wide. An empty
//! height shows the rod centered in the field; a disk of size `s` is
//! `2 * s - 1` glyphs, also centered. Rows run top layer first.
//!
//! ```text
//!   #       |       |
//!  ###      |       |
//! #####     |       |
//! ```

use std::fmt::Write as _;

use crossterm::style::{Color, Stylize};

use crate::core::colormap::Rgb;
use crate::core::config::{DEFAULT_DISK_GLYPH, DEFAULT_POLE_SPACING, DEFAULT_ROD_GLYPH, ResolvedConfig};
use crate::core::state::{NUM_POLES, Pole, Puzzle};

const EMPTY: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    pub disk_glyph: char,
    pub rod_glyph: char,
    pub pole_spacing: usize,
    /// Colorize disks that carry a color. Off = plain text.
    pub color: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            disk_glyph: DEFAULT_DISK_GLYPH,
            rod_glyph: DEFAULT_ROD_GLYPH,
            pole_spacing: DEFAULT_POLE_SPACING,
            color: false,
        }
    }
}

impl RenderStyle {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self {
            disk_glyph: config.disk_glyph,
            rod_glyph: config.rod_glyph,
            pole_spacing: config.pole_spacing,
            color: config.color,
        }
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Renders every layer of the puzzle, top layer first.
pub fn render(puzzle: &Puzzle, style: &RenderStyle) -> Vec<String> {
    (0..puzzle.num_layers())
        .rev()
        .map(|layer| render_layer(puzzle, layer, style))
        .collect()
}

/// One row across all poles. `layer` is zero-indexed from the bottom.
pub fn render_layer(puzzle: &Puzzle, layer: usize, style: &RenderStyle) -> String {
    let num_layers = puzzle.num_layers();
    let mut row = String::with_capacity(NUM_POLES * (2 * num_layers + style.pole_spacing));

    for (i, pole) in puzzle.poles().iter().enumerate() {
        render_layer_pole(&mut row, pole, num_layers, layer, style);
        if i != NUM_POLES - 1 {
            push_repeat(&mut row, EMPTY, style.pole_spacing);
        }
    }
    row
}

fn render_layer_pole(
    row: &mut String,
    pole: &Pole,
    num_layers: usize,
    layer: usize,
    style: &RenderStyle,
) {
    let Some(disk) = pole.disk_at(layer) else {
        push_repeat(row, EMPTY, num_layers - 1);
        row.push(style.rod_glyph);
        push_repeat(row, EMPTY, num_layers - 1);
        return;
    };

    let margin = num_layers - disk.size;
    let glyphs: String = std::iter::repeat_n(style.disk_glyph, disk.size * 2 - 1).collect();

    push_repeat(row, EMPTY, margin);
    match disk.color {
        Some(color) if style.color => {
            // Writing into a String cannot fail
            let _ = write!(row, "{}", glyphs.with(to_color(color)));
        }
        _ => row.push_str(&glyphs),
    }
    push_repeat(row, EMPTY, margin);
}

fn push_repeat(row: &mut String, c: char, count: usize) {
    row.extend(std::iter::repeat_n(c, count));
}
