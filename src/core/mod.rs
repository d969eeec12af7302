//! # Core Puzzle Logic
//!
//! Everything about the puzzle itself. It knows nothing about terminals.
//!
//! ```text
//!      ┌──────────────┐   input / config / colormap
//!      │    main.rs   │──────────────────────────────┐
//!      └──────┬───────┘                              │
//!             │ num_layers, palette                  ▼
//!      ┌──────▼───────┐  move_top_disk()   ┌────────────────┐
//!      │    solver    │───────────────────▶│     state      │
//!      └──────┬───────┘                    └────────────────┘
//!             │ MoveObserver::moved()
//!      ┌──────▼───────┐
//!      │  tui (frames)│
//!      └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `Puzzle`, `Pole`, `Disk` and the single-disk move
//! - [`solver`]: recursive solver and the `MoveObserver` trait
//! - [`input`]: layer count parsing and the interactive prompt
//! - [`colormap`]: colormap files and palette sampling
//! - [`config`]: config file, env vars and CLI overrides

pub mod colormap;
pub mod config;
pub mod input;
pub mod solver;
pub mod state;
