//! Top-level error taxonomy. Every variant exits with status 1.

use std::io;

use thiserror::Error;

use crate::core::colormap::ColormapError;
use crate::core::config::ConfigError;
use crate::core::input::InputError;
use crate::core::solver::SolveError;
use crate::core::state::PuzzleError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad command line. The message already includes the usage line.
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    InputValidation(#[from] InputError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// The solver broke a puzzle rule. Always a bug.
    #[error("internal error: {0}")]
    InvariantViolation(SolveError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Colormap(#[from] ColormapError),
    #[error(transparent)]
    Allocation(#[from] PuzzleError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Usage(_)
            | AppError::InputValidation(_)
            | AppError::Resource(_)
            | AppError::InvariantViolation(_)
            | AppError::Output(_) => 1,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Resource(e.into())
    }
}

impl From<ColormapError> for AppError {
    fn from(e: ColormapError) -> Self {
        AppError::Resource(e.into())
    }
}

impl From<PuzzleError> for AppError {
    fn from(e: PuzzleError) -> Self {
        AppError::Resource(e.into())
    }
}

impl From<SolveError> for AppError {
    fn from(e: SolveError) -> Self {
        match e {
            SolveError::Observer(io) => AppError::Output(io),
            other => AppError::InvariantViolation(other),
        }
    }
}
