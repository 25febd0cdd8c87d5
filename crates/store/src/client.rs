//! The question-store boundary: a filtered random-sampling query surface.

use async_trait::async_trait;
use thiserror::Error;

use practice_core::model::{Board, FilterError, Question, SampleFilter, Subject};

/// Errors surfaced by question-store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Caller-supplied parameters out of contract; rejected before any I/O.
    #[error(transparent)]
    InvalidFilter(#[from] FilterError),

    /// The backing query could not be executed or returned malformed data.
    #[error("question store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only client over the question corpus.
///
/// Implementations never mutate the corpus; the session flow only lists
/// subjects and draws samples.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Fetch the subjects available for a board.
    ///
    /// An empty list is a legal answer, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the listing query fails.
    async fn list_subjects(&self, board: Board) -> Result<Vec<Subject>, StoreError>;

    /// Draw a uniform random sample, without replacement, of at most `limit`
    /// questions matching `filter`.
    ///
    /// Returns `min(limit, matching population)` questions; a smaller batch
    /// than requested is the defined under-fill behavior, never a fault.
    /// The batch order is whatever the sampler produced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidFilter` when `limit` is out of bounds —
    /// checked before any I/O, even though the command surface validates
    /// first. Returns `StoreError::Unavailable` when the query fails.
    async fn sample(&self, filter: &SampleFilter, limit: u32)
        -> Result<Vec<Question>, StoreError>;
}
