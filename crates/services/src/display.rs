use async_trait::async_trait;
use thiserror::Error;

use practice_core::model::{Question, Subject};

use crate::gate::SelectionSink;

/// Errors surfaced by display adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DisplayError {
    #[error("rendering failed: {0}")]
    Render(String),
}

/// Terminal user-visible notices the session driver can emit.
///
/// Every aborted session ends with one of these; silence is a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
    NoSubjectsAvailable,
    PromptUnavailable,
    SelectionExpired,
    StoreUnavailable,
    NoQuestionsMatched,
}

impl SessionNotice {
    /// Requester-facing copy for this notice.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            SessionNotice::NoSubjectsAvailable => {
                "No subjects are available for that board right now."
            }
            SessionNotice::PromptUnavailable => {
                "The subject prompt could not be shown. Session cancelled."
            }
            SessionNotice::SelectionExpired => {
                "The subject selection expired. Run the command again to start over."
            }
            SessionNotice::StoreUnavailable => {
                "The question service is unavailable right now. Please try again later."
            }
            SessionNotice::NoQuestionsMatched => {
                "No questions matched your filters."
            }
        }
    }
}

/// One delivered question with its position in the run.
#[derive(Debug, Clone, Copy)]
pub struct QuestionCard<'a> {
    /// Zero-based position in the delivery order.
    pub index: usize,
    pub total: usize,
    pub question: &'a Question,
}

/// Boundary to the interactive client.
///
/// Implementations own the concrete widgets (embeds, menus, a terminal);
/// the driver only sees this contract. Selections made on the prompt flow
/// back through the provided sink.
#[async_trait]
pub trait SessionDisplay: Send + Sync {
    /// Renders the subject-selection prompt, one option per subject.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError` when the prompt cannot be rendered.
    async fn prompt_subjects(
        &self,
        subjects: &[Subject],
        sink: &SelectionSink,
    ) -> Result<(), DisplayError>;

    /// Renders a single question.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError` when this item cannot be rendered; the driver
    /// logs and skips it without aborting the rest of the run.
    async fn show_question(&self, card: QuestionCard<'_>) -> Result<(), DisplayError>;

    /// Emits a terminal notice for the requester.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError` when the notice cannot be emitted.
    async fn notify(&self, notice: SessionNotice) -> Result<(), DisplayError>;
}
