use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::SubjectCode;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoardParseError {
    #[error("unknown board: {0:?} (expected a, as, o or igcse)")]
    Unknown(String),
}

//
// ─── BOARD ─────────────────────────────────────────────────────────────────────
//

/// Examination board tag a subject belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Board {
    #[serde(rename = "AS")]
    AsLevel,
    #[serde(rename = "A")]
    ALevel,
    #[serde(rename = "O")]
    OLevel,
    #[serde(rename = "IGCSE")]
    Igcse,
}

impl Board {
    /// Short code used in listing/sampling query strings.
    #[must_use]
    pub fn query_value(&self) -> &'static str {
        match self {
            Board::AsLevel => "as",
            Board::ALevel => "a",
            Board::OLevel => "o",
            Board::Igcse => "igcse",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Board::AsLevel => "AS Level",
            Board::ALevel => "A Level",
            Board::OLevel => "O Level",
            Board::Igcse => "IGCSE",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Accepts both the short query form ("as") and the tag form ("AS").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "as" => Ok(Board::AsLevel),
            "a" => Ok(Board::ALevel),
            "o" => Ok(Board::OLevel),
            "igcse" => Ok(Board::Igcse),
            _ => Err(BoardParseError::Unknown(s.to_string())),
        }
    }
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A subject as returned by the listing endpoint.
///
/// Supplied by an external service per request; this core never caches or
/// mutates subjects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub code: SubjectCode,
    pub name: String,
    pub board: Board,
    pub topics: Vec<String>,
}

impl Subject {
    #[must_use]
    pub fn new(
        code: SubjectCode,
        name: impl Into<String>,
        board: Board,
        topics: Vec<String>,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            board,
            topics,
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_parses_query_forms() {
        assert_eq!("a".parse::<Board>().unwrap(), Board::ALevel);
        assert_eq!("as".parse::<Board>().unwrap(), Board::AsLevel);
        assert_eq!("igcse".parse::<Board>().unwrap(), Board::Igcse);
    }

    #[test]
    fn board_parses_tag_forms_case_insensitively() {
        assert_eq!("AS".parse::<Board>().unwrap(), Board::AsLevel);
        assert_eq!("O".parse::<Board>().unwrap(), Board::OLevel);
        assert_eq!("IGCSE".parse::<Board>().unwrap(), Board::Igcse);
    }

    #[test]
    fn board_rejects_unknown() {
        let err = "gcse".parse::<Board>().unwrap_err();
        assert!(matches!(err, BoardParseError::Unknown(_)));
    }

    #[test]
    fn board_query_value_round_trips() {
        for board in [Board::AsLevel, Board::ALevel, Board::OLevel, Board::Igcse] {
            assert_eq!(board.query_value().parse::<Board>().unwrap(), board);
        }
    }

    #[test]
    fn subject_carries_topics() {
        let subject = Subject::new(
            SubjectCode::new("5070"),
            "Chemistry",
            Board::OLevel,
            vec!["Stoichiometry".into()],
        );
        assert_eq!(subject.topics.len(), 1);
        assert_eq!(subject.board, Board::OLevel);
    }
}
