//! # Layer Count Input
//!
//! Turns user text into a validated `num_layers`, either from a CLI
//! argument or from an interactive prompt that keeps asking until it gets
//! something usable.

use std::io::{self, BufRead, Write};
use std::num::IntErrorKind;

use log::{debug, warn};
use thiserror::Error;

/// Largest accepted layer count (the platform's signed 32-bit range).
pub const MAX_LAYERS: i64 = i32::MAX as i64;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("num_layers must be an integer, got {0:?}")]
    NotAnInteger(String),
    #[error("num_layers must be greater than zero")]
    NotPositive,
    #[error("num_layers must be at most {}", MAX_LAYERS)]
    TooLarge,
    #[error("no layer count entered before end of input")]
    Exhausted,
    #[error("failed to read layer count: {0}")]
    Io(#[from] io::Error),
}

/// Parses a layer count. Leading whitespace and an optional `+` are
/// accepted; anything after the digits is not.
pub fn parse_num_layers(text: &str) -> Result<usize, InputError> {
    let n: i64 = text.trim_start().parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => InputError::TooLarge,
        IntErrorKind::NegOverflow => InputError::NotPositive,
        _ => InputError::NotAnInteger(text.to_string()),
    })?;

    if n <= 0 {
        return Err(InputError::NotPositive);
    }
    if n > MAX_LAYERS {
        return Err(InputError::TooLarge);
    }
    usize::try_from(n).map_err(|_| InputError::TooLarge)
}

/// Prompts on `output` until `input` yields a valid layer count.
///
/// Blank lines are skipped silently; invalid ones (including bytes that are
/// not UTF-8) print the reason and ask again. End of input is
/// `InputError::Exhausted`.
pub fn prompt_num_layers<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<usize, InputError> {
    let mut buf = Vec::new();
    loop {
        write!(output, "Enter the number of layers: ")?;
        output.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Err(InputError::Exhausted);
        }

        // Invalid bytes become U+FFFD, which never parses as a digit
        let line = String::from_utf8_lossy(&buf);
        let entry = line.trim_end_matches(['\n', '\r']);
        if entry.is_empty() {
            continue;
        }

        match parse_num_layers(entry) {
            Ok(n) => {
                debug!("Prompt accepted {} layers", n);
                return Ok(n);
            }
            Err(e) => {
                warn!("Rejected layer count {:?}: {}", entry, e);
                writeln!(output, "Error: {e}")?;
            }
        }
    }
}
