use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::filter::{self, FilterError, SampleFilter};
use crate::model::ids::SubjectCode;
use crate::model::question::{Question, QuestionKind};
use crate::model::subject::Board;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("cannot move a {from} session to {to}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },
}

//
// ─── REQUEST ───────────────────────────────────────────────────────────────────
//

/// The three mandatory parameters accepted by the command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeRequest {
    pub board: Board,
    pub amount: u32,
    pub minimum_year: u16,
}

impl PracticeRequest {
    /// Checks the request against the declared bounds.
    ///
    /// Out-of-range values must be rejected here, before any network call.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` when amount or minimum year is out of range.
    pub fn validate(&self) -> Result<(), FilterError> {
        filter::validate_amount(self.amount)?;
        filter::validate_year(self.minimum_year)?;
        Ok(())
    }
}

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where a practice session currently is in its linear flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingFilterInput,
    AwaitingSelection,
    Sampling,
    Delivering,
    Complete,
    Aborted,
}

impl SessionPhase {
    /// Terminal phases accept no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Complete | SessionPhase::Aborted)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::AwaitingFilterInput => "awaiting-filter-input",
            SessionPhase::AwaitingSelection => "awaiting-selection",
            SessionPhase::Sampling => "sampling",
            SessionPhase::Delivering => "delivering",
            SessionPhase::Complete => "complete",
            SessionPhase::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

/// Why a session ended in `Aborted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The subject listing failed or returned no subjects.
    NoSubjects,
    /// The selection prompt expired before a choice arrived.
    SelectionExpired,
    /// The sampling query could not be executed.
    StoreUnavailable(String),
    /// The prompt itself could not be rendered.
    DisplayUnavailable(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoSubjects => write!(f, "no subjects available"),
            AbortReason::SelectionExpired => write!(f, "subject selection expired"),
            AbortReason::StoreUnavailable(reason) => {
                write!(f, "question store unavailable: {reason}")
            }
            AbortReason::DisplayUnavailable(reason) => {
                write!(f, "prompt could not be rendered: {reason}")
            }
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One requester's in-memory practice session.
///
/// Lives only for the duration of a single interaction; never persisted and
/// never shared between requesters. The flow is strictly linear — each
/// transition method guards against being called out of order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeSession {
    board: Board,
    amount: u32,
    minimum_year: u16,
    phase: SessionPhase,
    selected: Vec<SubjectCode>,
    questions: Vec<Question>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    abort_reason: Option<AbortReason>,
}

impl PracticeSession {
    /// Opens a session for a validated request.
    ///
    /// # Errors
    ///
    /// Returns `FilterError` when the request is out of bounds.
    pub fn new(request: &PracticeRequest, started_at: DateTime<Utc>) -> Result<Self, FilterError> {
        request.validate()?;
        Ok(Self {
            board: request.board,
            amount: request.amount,
            minimum_year: request.minimum_year,
            phase: SessionPhase::AwaitingFilterInput,
            selected: Vec::new(),
            questions: Vec::new(),
            started_at,
            completed_at: None,
            abort_reason: None,
        })
    }

    fn transition(&mut self, from: SessionPhase, to: SessionPhase) -> Result<(), SessionStateError> {
        if self.phase != from {
            return Err(SessionStateError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    /// The subject list is in hand and the selection prompt is up.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` unless the session is awaiting filter input.
    pub fn begin_selection(&mut self) -> Result<(), SessionStateError> {
        self.transition(
            SessionPhase::AwaitingFilterInput,
            SessionPhase::AwaitingSelection,
        )
    }

    /// A selection arrived; record it and move to sampling.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` unless the session is awaiting selection.
    pub fn begin_sampling(&mut self, selected: Vec<SubjectCode>) -> Result<(), SessionStateError> {
        self.transition(SessionPhase::AwaitingSelection, SessionPhase::Sampling)?;
        self.selected = selected;
        Ok(())
    }

    /// A sample came back; record it and move to delivery.
    ///
    /// An empty sample is a legal delivery of zero items, not a fault.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` unless the session is sampling.
    pub fn begin_delivery(&mut self, questions: Vec<Question>) -> Result<(), SessionStateError> {
        self.transition(SessionPhase::Sampling, SessionPhase::Delivering)?;
        self.questions = questions;
        Ok(())
    }

    /// The last item has been delivered.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` unless the session is delivering.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), SessionStateError> {
        self.transition(SessionPhase::Delivering, SessionPhase::Complete)?;
        self.completed_at = Some(at);
        Ok(())
    }

    /// Ends the session early with a recorded reason.
    ///
    /// Legal from the pre-delivery phases only; once delivery starts the
    /// flow runs to completion.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` from `Delivering` or a terminal phase.
    pub fn abort(&mut self, reason: AbortReason, at: DateTime<Utc>) -> Result<(), SessionStateError> {
        match self.phase {
            SessionPhase::AwaitingFilterInput
            | SessionPhase::AwaitingSelection
            | SessionPhase::Sampling => {
                self.phase = SessionPhase::Aborted;
                self.abort_reason = Some(reason);
                self.completed_at = Some(at);
                Ok(())
            }
            from => Err(SessionStateError::InvalidTransition {
                from,
                to: SessionPhase::Aborted,
            }),
        }
    }

    /// Builds the MCQ sampling filter from the recorded choices.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::NoSubjects` when no selection has been recorded.
    pub fn sample_filter(&self) -> Result<SampleFilter, FilterError> {
        Ok(
            SampleFilter::new(self.selected.clone(), self.board, self.minimum_year)?
                .with_kind(QuestionKind::Mcq),
        )
    }

    #[must_use]
    pub fn board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    #[must_use]
    pub fn minimum_year(&self) -> u16 {
        self.minimum_year
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn selected_subjects(&self) -> &[SubjectCode] {
        &self.selected
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn abort_reason(&self) -> Option<&AbortReason> {
        self.abort_reason.as_ref()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
