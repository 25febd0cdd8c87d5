//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::model::{FilterError, SessionStateError};

/// Errors emitted when opening a selection prompt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GateError {
    #[error("selection prompt needs at least one option")]
    NoOptions,

    #[error("selection bounds are invalid: min {min}, max {max} over {options} options")]
    InvalidBounds {
        min: usize,
        max: usize,
        options: usize,
    },
}

/// Errors emitted by `SessionRunner`.
///
/// Store and expiry outcomes are not errors here — the runner maps them into
/// an aborted session with a terminal notice. This enum covers caller
/// mistakes (rejected before any I/O) and broken internal invariants.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    State(#[from] SessionStateError),
}
