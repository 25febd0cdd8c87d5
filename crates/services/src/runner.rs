use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use practice_core::Clock;
use practice_core::model::{
    AbortReason, PracticeRequest, PracticeSession, SubjectCode,
};
use store::QuestionStore;

use crate::display::{QuestionCard, SessionDisplay, SessionNotice};
use crate::error::SessionError;
use crate::gate::{SelectionGate, SelectionOutcome};

/// How long the subject prompt stays open.
pub const SELECTION_TIMEOUT: Duration = Duration::from_secs(300);
/// Fixed delay between delivered questions, so the requester can read each
/// one and the client is never flooded.
pub const DELIVERY_PACING: Duration = Duration::from_secs(5);

/// Per-item failures recorded on the report are capped; the run itself
/// always visits every item.
const MAX_RECORDED_FAILURES: usize = 25;

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// A single question that failed to render during delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Zero-based position in the delivery order.
    pub index: usize,
    pub reason: String,
}

/// Outcome of one end-to-end practice run.
#[derive(Debug)]
pub struct SessionReport {
    /// The finished session, in its terminal phase.
    pub session: PracticeSession,
    /// Questions actually rendered.
    pub delivered: usize,
    /// Items skipped after a render failure, capped at a bounded count.
    pub failures: Vec<DeliveryFailure>,
}

impl SessionReport {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.session.abort_reason().is_some()
    }
}

//
// ─── RUNNER ────────────────────────────────────────────────────────────────────
//

/// Drives a practice session end to end: prompt, selection, sample, paced
/// delivery.
///
/// One runner may serve many sessions, but each `run` call is a single
/// linear flow with no shared mutable state beyond the store handle.
pub struct SessionRunner {
    store: Arc<dyn QuestionStore>,
    display: Arc<dyn SessionDisplay>,
    clock: Clock,
    pacing: Duration,
    selection_timeout: Duration,
}

impl SessionRunner {
    #[must_use]
    pub fn new(store: Arc<dyn QuestionStore>, display: Arc<dyn SessionDisplay>) -> Self {
        Self {
            store,
            display,
            clock: Clock::default_clock(),
            pacing: DELIVERY_PACING,
            selection_timeout: SELECTION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    #[must_use]
    pub fn with_selection_timeout(mut self, timeout: Duration) -> Self {
        self.selection_timeout = timeout;
        self
    }

    /// Runs one practice session for the given request.
    ///
    /// Out-of-range parameters are rejected here, before any network call.
    /// Store failures, an empty subject list, and prompt expiry all end in
    /// an aborted session carrying a terminal notice — they are outcomes on
    /// the report, not `Err` values.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidFilter` for an out-of-contract request.
    pub async fn run(&self, request: PracticeRequest) -> Result<SessionReport, SessionError> {
        request.validate()?;
        let mut session = PracticeSession::new(&request, self.clock.now())?;

        let subjects = match self.store.list_subjects(request.board).await {
            Ok(subjects) => subjects,
            Err(err) => {
                warn!(board = %request.board, error = %err, "subject listing failed");
                return self
                    .abort(
                        session,
                        AbortReason::StoreUnavailable(err.to_string()),
                        SessionNotice::StoreUnavailable,
                    )
                    .await;
            }
        };
        if subjects.is_empty() {
            return self
                .abort(
                    session,
                    AbortReason::NoSubjects,
                    SessionNotice::NoSubjectsAvailable,
                )
                .await;
        }

        let options: Vec<String> = subjects
            .iter()
            .map(|s| s.code.as_str().to_string())
            .collect();
        let (sink, pending) = SelectionGate::open(options, self.selection_timeout)?;
        session.begin_selection()?;

        if let Err(err) = self.display.prompt_subjects(&subjects, &sink).await {
            warn!(error = %err, "subject prompt could not be rendered");
            return self
                .abort(
                    session,
                    AbortReason::DisplayUnavailable(err.to_string()),
                    SessionNotice::PromptUnavailable,
                )
                .await;
        }
        debug!(token = %sink.token(), subjects = subjects.len(), "subject prompt open");

        let selected: Vec<SubjectCode> = match pending.resolve().await {
            SelectionOutcome::Resolved(choices) => {
                choices.into_iter().map(SubjectCode::new).collect()
            }
            SelectionOutcome::Expired => {
                return self
                    .abort(
                        session,
                        AbortReason::SelectionExpired,
                        SessionNotice::SelectionExpired,
                    )
                    .await;
            }
        };

        session.begin_sampling(selected)?;
        let filter = session.sample_filter()?;
        let questions = match self.store.sample(&filter, session.amount()).await {
            Ok(questions) => questions,
            Err(err) => {
                warn!(error = %err, "sampling query failed");
                return self
                    .abort(
                        session,
                        AbortReason::StoreUnavailable(err.to_string()),
                        SessionNotice::StoreUnavailable,
                    )
                    .await;
            }
        };

        if questions.is_empty() {
            // A valid query with zero matches is informational, not a fault.
            self.try_notify(SessionNotice::NoQuestionsMatched).await;
        }
        session.begin_delivery(questions)?;

        let total = session.questions().len();
        let mut delivered = 0_usize;
        let mut failures = Vec::new();
        for (index, question) in session.questions().iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing).await;
            }
            let card = QuestionCard {
                index,
                total,
                question,
            };
            match self.display.show_question(card).await {
                Ok(()) => delivered += 1,
                Err(err) => {
                    warn!(index, error = %err, "question delivery failed, continuing");
                    if failures.len() < MAX_RECORDED_FAILURES {
                        failures.push(DeliveryFailure {
                            index,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        session.complete(self.clock.now())?;
        debug!(delivered, total, "practice session complete");
        Ok(SessionReport {
            session,
            delivered,
            failures,
        })
    }

    async fn abort(
        &self,
        mut session: PracticeSession,
        reason: AbortReason,
        notice: SessionNotice,
    ) -> Result<SessionReport, SessionError> {
        self.try_notify(notice).await;
        session.abort(reason, self.clock.now())?;
        Ok(SessionReport {
            session,
            delivered: 0,
            failures: Vec::new(),
        })
    }

    async fn try_notify(&self, notice: SessionNotice) {
        if let Err(err) = self.display.notify(notice).await {
            warn!(error = %err, "failed to emit session notice");
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
