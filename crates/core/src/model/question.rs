use std::fmt;
use thiserror::Error;
use url::Url;

use crate::model::ids::SubjectCode;
use crate::model::subject::Board;

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question must carry at least one prompt image")]
    NoPromptImages,

    #[error("prompt image is not a valid URL: {0}")]
    UnparsableImageUrl(String),

    #[error("prompt image must use http or https, got {0:?}")]
    UnsupportedImageScheme(String),

    #[error("prompt image must point at a .png file: {0}")]
    NotAPngImage(String),

    #[error("answer key must be a single ascii letter, got {0:?}")]
    InvalidAnswerKey(String),

    #[error("structured answers cannot be empty")]
    EmptyAnswerSteps,

    #[error("unknown season code: {0:?} (expected m, s or w)")]
    UnknownSeason(String),
}

//
// ─── SEASON ────────────────────────────────────────────────────────────────────
//

/// Exam session within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// February/March session ("m").
    FebMarch,
    /// May/June session ("s").
    MayJune,
    /// October/November session ("w").
    OctNov,
}

impl Season {
    /// Parses the single-letter code used on the wire.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownSeason` for anything but `m`, `s` or `w`.
    pub fn from_code(code: &str) -> Result<Self, QuestionError> {
        match code {
            "m" => Ok(Season::FebMarch),
            "s" => Ok(Season::MayJune),
            "w" => Ok(Season::OctNov),
            other => Err(QuestionError::UnknownSeason(other.to_string())),
        }
    }

    /// The single-letter wire code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Season::FebMarch => "m",
            Season::MayJune => "s",
            Season::OctNov => "w",
        }
    }
}

//
// ─── PROMPT IMAGE ──────────────────────────────────────────────────────────────
//

/// Validated prompt-image location: http(s) URL ending in `.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl(Url);

impl ImageUrl {
    /// Parses and validates a prompt-image URL.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the string is not a URL, the scheme is
    /// not http/https, or the path does not end in `.png`.
    pub fn parse(raw: &str) -> Result<Self, QuestionError> {
        let url =
            Url::parse(raw.trim()).map_err(|_| QuestionError::UnparsableImageUrl(raw.into()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(QuestionError::UnsupportedImageScheme(other.to_string())),
        }
        if !url.path().ends_with(".png") {
            return Err(QuestionError::NotAPngImage(raw.into()));
        }
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// The stored answer for a question.
///
/// A multiple-choice question carries exactly one key letter; a structured
/// question carries an ordered, non-empty list of answer lines. The variant
/// is the question kind — the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// MCQ key, always a single uppercase letter.
    Key(char),
    /// Structured/free-response answer lines.
    Steps(Vec<String>),
}

impl Answer {
    /// Builds an MCQ answer key, uppercasing the letter.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidAnswerKey` when the character is not
    /// an ascii letter.
    pub fn key(letter: char) -> Result<Self, QuestionError> {
        if !letter.is_ascii_alphabetic() {
            return Err(QuestionError::InvalidAnswerKey(letter.to_string()));
        }
        Ok(Answer::Key(letter.to_ascii_uppercase()))
    }

    /// Builds an MCQ answer key from its wire form (a one-letter string).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidAnswerKey` unless the trimmed string
    /// is exactly one ascii letter.
    pub fn key_from_str(raw: &str) -> Result<Self, QuestionError> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::key(c),
            _ => Err(QuestionError::InvalidAnswerKey(raw.to_string())),
        }
    }

    /// Builds a structured answer.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyAnswerSteps` when the list is empty.
    pub fn steps(lines: Vec<String>) -> Result<Self, QuestionError> {
        if lines.is_empty() {
            return Err(QuestionError::EmptyAnswerSteps);
        }
        Ok(Answer::Steps(lines))
    }

    /// True for a single-key (multiple-choice) answer.
    #[must_use]
    pub fn is_key(&self) -> bool {
        matches!(self, Answer::Key(_))
    }
}

//
// ─── KIND FILTER ───────────────────────────────────────────────────────────────
//

/// Question-kind restriction used by sampling filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionKind {
    /// Only multiple-choice questions (single-key answers).
    Mcq,
    /// Any question kind.
    #[default]
    Any,
}

impl QuestionKind {
    /// Whether a question with the given answer satisfies this restriction.
    #[must_use]
    pub fn admits(&self, answer: &Answer) -> bool {
        match self {
            QuestionKind::Mcq => answer.is_key(),
            QuestionKind::Any => true,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Identity of a question within the corpus: which paper it appeared on and
/// where. Distinct questions always differ in at least one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionRef {
    pub subject_code: SubjectCode,
    pub board: Board,
    pub season: Season,
    pub year: u16,
    pub paper: u8,
    pub variant: u8,
    pub number: u8,
}

impl fmt::Display for QuestionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}{}_{}{}_q{}",
            self.subject_code,
            self.season.code(),
            self.year % 100,
            self.paper,
            self.variant,
            self.number
        )
    }
}

/// A single exam question.
///
/// Read-only from this core's perspective: questions are created by an
/// out-of-scope ingestion process and never mutated by the session flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    subject_code: SubjectCode,
    board: Board,
    season: Season,
    year: u16,
    paper: u8,
    variant: u8,
    number: u8,
    images: Vec<ImageUrl>,
    answer: Answer,
    topics: Vec<String>,
}

impl Question {
    /// Creates a question from already-validated parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoPromptImages` when no prompt image is given.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subject_code: SubjectCode,
        board: Board,
        season: Season,
        year: u16,
        paper: u8,
        variant: u8,
        number: u8,
        images: Vec<ImageUrl>,
        answer: Answer,
        topics: Vec<String>,
    ) -> Result<Self, QuestionError> {
        if images.is_empty() {
            return Err(QuestionError::NoPromptImages);
        }
        Ok(Self {
            subject_code,
            board,
            season,
            year,
            paper,
            variant,
            number,
            images,
            answer,
            topics,
        })
    }

    #[must_use]
    pub fn subject_code(&self) -> &SubjectCode {
        &self.subject_code
    }

    #[must_use]
    pub fn board(&self) -> Board {
        self.board
    }

    #[must_use]
    pub fn season(&self) -> Season {
        self.season
    }

    #[must_use]
    pub fn year(&self) -> u16 {
        self.year
    }

    #[must_use]
    pub fn paper(&self) -> u8 {
        self.paper
    }

    #[must_use]
    pub fn variant(&self) -> u8 {
        self.variant
    }

    #[must_use]
    pub fn number(&self) -> u8 {
        self.number
    }

    #[must_use]
    pub fn images(&self) -> &[ImageUrl] {
        &self.images
    }

    #[must_use]
    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// True when this is a multiple-choice question.
    #[must_use]
    pub fn is_mcq(&self) -> bool {
        self.answer.is_key()
    }

    /// The question's corpus identity.
    #[must_use]
    pub fn reference(&self) -> QuestionRef {
        QuestionRef {
            subject_code: self.subject_code.clone(),
            board: self.board,
            season: self.season,
            year: self.year,
            paper: self.paper,
            variant: self.variant,
            number: self.number,
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
