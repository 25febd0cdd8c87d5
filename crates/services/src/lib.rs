#![forbid(unsafe_code)]

pub mod display;
pub mod error;
pub mod gate;
pub mod runner;

pub use practice_core::Clock;

pub use display::{DisplayError, QuestionCard, SessionDisplay, SessionNotice};
pub use error::{GateError, SessionError};
pub use gate::{PendingSelection, SelectionEvent, SelectionGate, SelectionOutcome, SelectionSink};
pub use runner::{
    DELIVERY_PACING, DeliveryFailure, SELECTION_TIMEOUT, SessionReport, SessionRunner,
};
