mod filter;
mod ids;
mod question;
mod session;
mod subject;

pub use filter::{
    FilterError, SampleFilter, MAX_AMOUNT, MAX_YEAR, MIN_AMOUNT, MIN_YEAR, validate_amount,
    validate_year,
};
pub use ids::{GateToken, SubjectCode};
pub use question::{
    Answer, ImageUrl, Question, QuestionError, QuestionKind, QuestionRef, Season,
};
pub use session::{
    AbortReason, PracticeRequest, PracticeSession, SessionPhase, SessionStateError,
};
pub use subject::{Board, BoardParseError, Subject};
