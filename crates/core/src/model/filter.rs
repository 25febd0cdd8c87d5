use thiserror::Error;

use crate::model::ids::SubjectCode;
use crate::model::question::{Question, QuestionKind};
use crate::model::subject::Board;

//
// ─── BOUNDS ────────────────────────────────────────────────────────────────────
//

/// Smallest number of questions a session may request.
pub const MIN_AMOUNT: u32 = 1;
/// Largest number of questions a session may request.
pub const MAX_AMOUNT: u32 = 250;
/// Earliest minimum-year a filter may name (inclusive).
pub const MIN_YEAR: u16 = 2010;
/// Latest minimum-year a filter may name (inclusive).
pub const MAX_YEAR: u16 = 2022;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    #[error("amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}, got {0}")]
    AmountOutOfRange(u32),

    #[error("minimum year must be between {MIN_YEAR} and {MAX_YEAR}, got {0}")]
    YearOutOfRange(u16),

    #[error("at least one subject code is required")]
    NoSubjects,
}

/// Checks a requested question amount against the declared bounds.
///
/// # Errors
///
/// Returns `FilterError::AmountOutOfRange` outside [`MIN_AMOUNT`, `MAX_AMOUNT`].
pub fn validate_amount(amount: u32) -> Result<(), FilterError> {
    if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
        return Err(FilterError::AmountOutOfRange(amount));
    }
    Ok(())
}

/// Checks a minimum year against the declared bounds.
///
/// # Errors
///
/// Returns `FilterError::YearOutOfRange` outside [`MIN_YEAR`, `MAX_YEAR`].
pub fn validate_year(year: u16) -> Result<(), FilterError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(FilterError::YearOutOfRange(year));
    }
    Ok(())
}

//
// ─── SAMPLE FILTER ─────────────────────────────────────────────────────────────
//

/// Eligibility filter for a random-sample draw over the question corpus.
///
/// Questions match when their subject code is one of `subjects`, their board
/// matches, their year is at least `minimum_year`, their topic set intersects
/// `topics` when topics are given, and their answer shape satisfies `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFilter {
    subjects: Vec<SubjectCode>,
    board: Board,
    minimum_year: u16,
    topics: Option<Vec<String>>,
    kind: QuestionKind,
}

impl SampleFilter {
    /// Creates a filter over the given subjects.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::NoSubjects` for an empty subject list and
    /// `FilterError::YearOutOfRange` for a year outside the declared bounds.
    pub fn new(
        subjects: Vec<SubjectCode>,
        board: Board,
        minimum_year: u16,
    ) -> Result<Self, FilterError> {
        if subjects.is_empty() {
            return Err(FilterError::NoSubjects);
        }
        validate_year(minimum_year)?;
        Ok(Self {
            subjects,
            board,
            minimum_year,
            topics: None,
            kind: QuestionKind::default(),
        })
    }

    /// Restrict matches to questions whose topic set intersects `topics`.
    #[must_use]
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = Some(topics);
        self
    }

    /// Restrict matches by question kind.
    #[must_use]
    pub fn with_kind(mut self, kind: QuestionKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn subjects(&self) -> &[SubjectCode] {
        &self.subjects
    }

    #[must_use]
    pub fn board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn minimum_year(&self) -> u16 {
        self.minimum_year
    }

    #[must_use]
    pub fn topics(&self) -> Option<&[String]> {
        self.topics.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    /// Whether a question is eligible under this filter.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        if question.board() != self.board {
            return false;
        }
        if !self.subjects.contains(question.subject_code()) {
            return false;
        }
        if question.year() < self.minimum_year {
            return false;
        }
        if let Some(topics) = &self.topics {
            if !question.topics().iter().any(|t| topics.contains(t)) {
                return false;
            }
        }
        self.kind.admits(question.answer())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
