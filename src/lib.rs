//! Hanoi library exports for testing

pub mod core;
mod error;
pub mod tui;

#[cfg(test)]
pub mod test_support;

pub use error::{AppError, ResourceError};
