//! # Puzzle State
//!
//! The three poles and the disks on them. This is the only place disks move.
//!
//! ```text
//! Puzzle
//! ├── num_layers: usize          // puzzle size, also every pole's capacity
//! ├── poles: [Pole; NUM_POLES]   // source = 0, destination = NUM_POLES - 1
//! │   ├── capacity: usize
//! │   └── disks: Vec<Disk>       // bottom → top, strictly decreasing sizes
//! └── moves: u64                 // moves performed so far (display only)
//! ```
//!
//! Every mutation goes through `move_top_disk()`, which checks capacity and
//! ordering and reports violations as `MoveError` values.

use log::{debug, info};
use thiserror::Error;

use crate::core::colormap::{Rgb, palette_index};

/// Number of poles. The spare lookup in the solver assumes exactly three.
pub const NUM_POLES: usize = 3;

/// Index of the pole every disk starts on.
pub const SOURCE_POLE: usize = 0;

/// Index of the pole every disk ends on.
pub const DESTINATION_POLE: usize = NUM_POLES - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disk {
    pub size: usize,
    pub color: Option<Rgb>,
}

/// A fixed-capacity stack of disks, bottom first.
#[derive(Debug, Clone)]
pub struct Pole {
    capacity: usize,
    disks: Vec<Disk>,
}

impl Pole {
    fn with_capacity(capacity: usize) -> Result<Self, PuzzleError> {
        let mut disks = Vec::new();
        disks
            .try_reserve_exact(capacity)
            .map_err(|_| PuzzleError::Allocation { layers: capacity })?;
        Ok(Self { capacity, disks })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.disks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.disks.len() >= self.capacity
    }

    /// Disk at `layer` counted from the bottom (0 = lowest), if any.
    pub fn disk_at(&self, layer: usize) -> Option<&Disk> {
        self.disks.get(layer)
    }

    pub fn top(&self) -> Option<&Disk> {
        self.disks.last()
    }

    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    /// Disk sizes bottom to top.
    pub fn sizes(&self) -> Vec<usize> {
        self.disks.iter().map(|d| d.size).collect()
    }
}

/// A single relocation performed by `Puzzle::move_top_disk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    /// 1-based sequence number of this move.
    pub number: u64,
    pub disk: usize,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("could not allocate poles for {layers} layers")]
    Allocation { layers: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("pole {pole} does not exist (there are {} poles)", NUM_POLES)]
    NoSuchPole { pole: usize },
    #[error("source pole {pole} is empty")]
    EmptySource { pole: usize },
    #[error("destination pole {pole} is full")]
    DestinationFull { pole: usize },
    #[error("illegal move: disk {disk} placed on smaller disk {below} on pole {pole}")]
    IllegalMove {
        pole: usize,
        disk: usize,
        below: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Puzzle {
    num_layers: usize,
    poles: [Pole; NUM_POLES],
    moves: u64,
}

impl Puzzle {
    /// Builds a puzzle with every disk stacked on the source pole.
    ///
    /// When a palette is given, disk `size` takes the color at
    /// `palette_index(size - 1, num_layers, palette.len())`.
    pub fn new(num_layers: usize, palette: Option<&[Rgb]>) -> Result<Self, PuzzleError> {
        let mut poles = [
            Pole::with_capacity(num_layers)?,
            Pole::with_capacity(num_layers)?,
            Pole::with_capacity(num_layers)?,
        ];

        let palette = palette.filter(|p| !p.is_empty());
        for size in (1..=num_layers).rev() {
            let color = palette.map(|p| p[palette_index(size - 1, num_layers, p.len())]);
            poles[SOURCE_POLE].disks.push(Disk { size, color });
        }

        info!(
            "Puzzle created: {} layers, colored = {}",
            num_layers,
            palette.is_some()
        );
        Ok(Self {
            num_layers,
            poles,
            moves: 0,
        })
    }

    pub fn num_layers(&self) -> usize {
        self.num_layers
    }

    pub fn poles(&self) -> &[Pole; NUM_POLES] {
        &self.poles
    }

    pub fn pole(&self, index: usize) -> Option<&Pole> {
        self.poles.get(index)
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// True once every disk sits on the destination pole.
    pub fn is_solved(&self) -> bool {
        self.poles[DESTINATION_POLE].len() == self.num_layers
    }

    /// Moves the top disk of `src` onto `dest`.
    ///
    /// The ordering check runs after the disk has landed, so on
    /// `IllegalMove` the puzzle shows the offending state.
    pub fn move_top_disk(&mut self, src: usize, dest: usize) -> Result<Move, MoveError> {
        for pole in [src, dest] {
            if pole >= NUM_POLES {
                return Err(MoveError::NoSuchPole { pole });
            }
        }
        if self.poles[src].is_empty() {
            return Err(MoveError::EmptySource { pole: src });
        }
        if self.poles[dest].is_full() {
            return Err(MoveError::DestinationFull { pole: dest });
        }

        let Some(disk) = self.poles[src].disks.pop() else {
            return Err(MoveError::EmptySource { pole: src });
        };
        self.poles[dest].disks.push(disk);
        self.moves += 1;

        let landed = &self.poles[dest].disks;
        if let [.., below, top] = landed.as_slice()
            && top.size > below.size
        {
            return Err(MoveError::IllegalMove {
                pole: dest,
                disk: top.size,
                below: below.size,
            });
        }

        debug!(
            "Move {}: disk {} from pole {} to pole {}",
            self.moves, disk.size, src, dest
        );
        Ok(Move {
            number: self.moves,
            disk: disk.size,
            from: src,
            to: dest,
        })
    }
}
