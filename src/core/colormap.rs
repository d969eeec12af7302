//! # Colormaps
//!
//! A colormap is an ordered, evenly spaced color gradient. On disk it is a
//! text file with one `r,g,b` triple per line, each component in `0..=255`:
//!
//! ```text
//! 68,1,84
//! 59,82,139
//! 33,145,140
//! ```
//!
//! Disks sample the gradient by size (see `palette_index`).

use std::fs;
use std::num::{IntErrorKind, ParseIntError};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Gradient used by `--color` when no colormap file is given.
pub const DEFAULT_PALETTE: &[Rgb] = &[
    Rgb::new(68, 1, 84),
    Rgb::new(72, 40, 120),
    Rgb::new(62, 74, 137),
    Rgb::new(49, 104, 142),
    Rgb::new(38, 130, 142),
    Rgb::new(31, 158, 137),
    Rgb::new(53, 183, 121),
    Rgb::new(109, 205, 89),
    Rgb::new(180, 222, 44),
    Rgb::new(253, 231, 37),
];

#[derive(Debug, Error)]
pub enum ColormapError {
    #[error("could not read colormap {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("colormap line {line}: expected `r,g,b`, got {content:?}")]
    Malformed { line: usize, content: String },
    #[error("colormap line {line}: component {value:?} is not in 0..=255")]
    OutOfRange { line: usize, value: String },
    #[error("colormap contains no colors")]
    Empty,
}

/// Palette slot for the disk at index `i` (0 = smallest) out of `num_layers`.
///
/// Spreads disks evenly across the palette: `i * len / (num_layers - 1)`,
/// clamped to the last entry. A single-layer puzzle takes the first entry.
pub fn palette_index(i: usize, num_layers: usize, palette_len: usize) -> usize {
    if palette_len == 0 || num_layers <= 1 {
        return 0;
    }
    let scaled = (i as u128 * palette_len as u128) / (num_layers as u128 - 1);
    scaled.min(palette_len as u128 - 1) as usize
}

/// Parses colormap text. Blank lines are skipped.
pub fn parse_colormap(text: &str) -> Result<Vec<Rgb>, ColormapError> {
    let mut colors = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(ColormapError::Malformed {
                line,
                content: raw.to_string(),
            });
        };
        colors.push(Rgb::new(
            parse_component(r, line, raw)?,
            parse_component(g, line, raw)?,
            parse_component(b, line, raw)?,
        ));
    }

    if colors.is_empty() {
        return Err(ColormapError::Empty);
    }
    Ok(colors)
}

fn parse_component(part: &str, line: usize, raw: &str) -> Result<u8, ColormapError> {
    let out_of_range = || ColormapError::OutOfRange {
        line,
        value: part.to_string(),
    };
    let value: i64 = part.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
        _ => ColormapError::Malformed {
            line,
            content: raw.to_string(),
        },
    })?;
    u8::try_from(value).map_err(|_| out_of_range())
}

/// The palette disks are colored from: the colormap file if one is
/// configured, the built-in gradient if color is on, else nothing.
pub fn load_palette(color: bool, colormap: Option<&Path>) -> Result<Option<Vec<Rgb>>, ColormapError> {
    match colormap {
        Some(path) => load_colormap(path).map(Some),
        None if color => Ok(Some(DEFAULT_PALETTE.to_vec())),
        None => Ok(None),
    }
}

/// Loads and parses a colormap file.
pub fn load_colormap(path: &Path) -> Result<Vec<Rgb>, ColormapError> {
    let text = fs::read_to_string(path).map_err(|source| ColormapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let colors = parse_colormap(&text)?;
    info!("Loaded {} colors from {}", colors.len(), path.display());
    debug!("Colormap: {:?}", colors);
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_colormap() {
        let colors = parse_colormap("255,0,0\n0, 128 ,255\n\n10,20,30\n").unwrap();
        assert_eq!(
            colors,
            vec![Rgb::new(255, 0, 0), Rgb::new(0, 128, 255), Rgb::new(10, 20, 30)]
        );
    }

    #[test]
    fn test_component_out_of_range() {
        let err = parse_colormap("0,0,0\n300,0,0\n").unwrap_err();
        assert!(matches!(err, ColormapError::OutOfRange { line: 2, ref value } if value == "300"));
    }

    #[test]
    fn test_negative_component_out_of_range() {
        let err = parse_colormap("0,-1,0").unwrap_err();
        assert!(matches!(err, ColormapError::OutOfRange { line: 1, .. }));
    }

    #[test]
    fn test_overflowing_component_out_of_range() {
        let err = parse_colormap("99999999999999999999,0,0").unwrap_err();
        assert!(
            matches!(err, ColormapError::OutOfRange { line: 1, ref value } if value == "99999999999999999999")
        );
        let err = parse_colormap("0,0,-99999999999999999999").unwrap_err();
        assert!(matches!(err, ColormapError::OutOfRange { line: 1, .. }));
    }

    #[test]
    fn test_malformed_rows() {
        for text in ["1,2", "1,2,3,4", "a,b,c", "1;2;3", "1,,3"] {
            let err = parse_colormap(text).unwrap_err();
            assert!(
                matches!(err, ColormapError::Malformed { line: 1, .. }),
                "{text:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_empty_colormap_rejected() {
        assert!(matches!(parse_colormap("\n  \n"), Err(ColormapError::Empty)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_colormap(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ColormapError::Io { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,2,3").unwrap();
        writeln!(file, "4,5,6").unwrap();
        let colors = load_colormap(file.path()).unwrap();
        assert_eq!(colors, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
    }

    #[test]
    fn test_palette_index_spreads_and_clamps() {
        // 5 disks over 10 colors: 0, 2, 5, 7, then 10 clamped to 9
        let picks: Vec<_> = (0..5).map(|i| palette_index(i, 5, 10)).collect();
        assert_eq!(picks, vec![0, 2, 5, 7, 9]);
        assert_eq!(palette_index(0, 1, 10), 0);
        assert_eq!(palette_index(3, 4, 0), 0);
    }

    #[test]
    fn test_load_palette_sources() {
        assert_eq!(load_palette(false, None).unwrap(), None);
        assert_eq!(
            load_palette(true, None).unwrap().as_deref(),
            Some(DEFAULT_PALETTE)
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "9,9,9").unwrap();
        assert_eq!(
            load_palette(false, Some(file.path())).unwrap(),
            Some(vec![Rgb::new(9, 9, 9)])
        );
    }
}
