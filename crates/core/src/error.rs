use thiserror::Error;

use crate::model::{FilterError, QuestionError, SessionStateError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    SessionState(#[from] SessionStateError),
}
