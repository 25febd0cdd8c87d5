use std::time::Duration;

use tokio::sync::mpsc;

use practice_core::model::GateToken;

use crate::error::GateError;

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// A selection submitted by an interactive widget.
///
/// Carries the token of the prompt it believes it is answering; a prompt
/// ignores events addressed to any other token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    token: GateToken,
    choices: Vec<String>,
}

impl SelectionEvent {
    #[must_use]
    pub fn new(token: GateToken, choices: Vec<String>) -> Self {
        Self { token, choices }
    }

    #[must_use]
    pub fn token(&self) -> GateToken {
        self.token
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

/// Clonable submission handle bound to a single prompt instance.
#[derive(Debug, Clone)]
pub struct SelectionSink {
    token: GateToken,
    tx: mpsc::UnboundedSender<SelectionEvent>,
}

impl SelectionSink {
    /// The token widgets must stamp on their events.
    #[must_use]
    pub fn token(&self) -> GateToken {
        self.token
    }

    /// Submits an event toward the prompt.
    ///
    /// Returns false once the prompt has already resolved or expired;
    /// late events are dropped, never redirected.
    pub fn submit(&self, event: SelectionEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

//
// ─── GATE ──────────────────────────────────────────────────────────────────────
//

/// How a pending selection ended. Exactly one of these per prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// A qualifying selection arrived in time, in submitted order.
    Resolved(Vec<String>),
    /// The timeout elapsed first. The prompt cannot be re-armed.
    Expired,
}

/// One-shot, time-bounded collection of a user choice from an option set.
pub struct SelectionGate;

impl SelectionGate {
    /// Opens a select-any prompt: minimum one choice, maximum all of them.
    ///
    /// # Errors
    ///
    /// Returns `GateError::NoOptions` when `options` is empty after
    /// deduplication.
    pub fn open(
        options: Vec<String>,
        timeout: Duration,
    ) -> Result<(SelectionSink, PendingSelection), GateError> {
        let count = dedupe(options.clone()).len();
        Self::open_bounded(options, 1, count.max(1), timeout)
    }

    /// Opens a prompt with explicit selection bounds.
    ///
    /// # Errors
    ///
    /// Returns `GateError::NoOptions` for an empty option set and
    /// `GateError::InvalidBounds` unless `1 <= min <= max <= options`.
    pub fn open_bounded(
        options: Vec<String>,
        min_select: usize,
        max_select: usize,
        timeout: Duration,
    ) -> Result<(SelectionSink, PendingSelection), GateError> {
        let options = dedupe(options);
        if options.is_empty() {
            return Err(GateError::NoOptions);
        }
        if min_select < 1 || min_select > max_select || max_select > options.len() {
            return Err(GateError::InvalidBounds {
                min: min_select,
                max: max_select,
                options: options.len(),
            });
        }

        let token = GateToken::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = SelectionSink { token, tx };
        let pending = PendingSelection {
            token,
            options,
            min_select,
            max_select,
            timeout,
            rx,
        };
        Ok((sink, pending))
    }
}

/// The awaitable half of an open prompt.
#[derive(Debug)]
pub struct PendingSelection {
    token: GateToken,
    options: Vec<String>,
    min_select: usize,
    max_select: usize,
    timeout: Duration,
    rx: mpsc::UnboundedReceiver<SelectionEvent>,
}

impl PendingSelection {
    #[must_use]
    pub fn token(&self) -> GateToken {
        self.token
    }

    /// Awaits the prompt's single outcome.
    ///
    /// The first event matching this prompt's token, naming only known
    /// options, and within the selection bounds resolves it; anything else
    /// is ignored without consuming the prompt. If no qualifying event
    /// arrives before the timeout, the outcome is `Expired`. Consuming
    /// `self` makes a second resolution unrepresentable.
    pub async fn resolve(mut self) -> SelectionOutcome {
        let qualified = tokio::time::timeout(self.timeout, async {
            loop {
                match self.rx.recv().await {
                    Some(event) => {
                        if event.token != self.token {
                            continue;
                        }
                        let choices = dedupe(event.choices);
                        let known = choices.iter().all(|c| self.options.contains(c));
                        if !known
                            || choices.len() < self.min_select
                            || choices.len() > self.max_select
                        {
                            continue;
                        }
                        return choices;
                    }
                    // Every sink is gone; nothing can arrive, so wait out the clock.
                    None => std::future::pending::<()>().await,
                }
            }
        })
        .await;

        match qualified {
            Ok(choices) => SelectionOutcome::Resolved(choices),
            Err(_) => SelectionOutcome::Expired,
        }
    }
}

fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
