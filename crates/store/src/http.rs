use std::env;

use reqwest::Client;
use serde::Deserialize;

use practice_core::model::{
    Answer, Board, ImageUrl, Question, SampleFilter, Season, Subject, SubjectCode,
    validate_amount,
};

use crate::client::{QuestionStore, StoreError};
use async_trait::async_trait;

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub base_url: String,
}

impl StoreConfig {
    /// Base URL used when `PRACTICE_API_URL` is not set.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:3000/questionify";

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("PRACTICE_API_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.into());
        Self { base_url }
    }
}

//
// ─── HTTP STORE ────────────────────────────────────────────────────────────────
//

/// Question store backed by the remote question service.
///
/// The service performs the random draw itself; this client splits a
/// multi-subject request across per-subject calls and re-checks every
/// returned question against the filter, since the remote endpoint only
/// understands subject, board and amount.
#[derive(Clone)]
pub struct HttpQuestionStore {
    client: Client,
    config: StoreConfig,
}

impl HttpQuestionStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(StoreConfig::from_env())
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn fetch_random(
        &self,
        code: &SubjectCode,
        board: Board,
        amount: u32,
    ) -> Result<Vec<QuestionRecord>, StoreError> {
        let url = format!(
            "{}/random?amount={}&code={}&board={}",
            self.base(),
            amount,
            code,
            board.query_value()
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StoreError::Unavailable(format!(
                "sampling returned status {}",
                response.status()
            )));
        }
        let body: RandomResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("undecodable sampling response: {e}")))?;
        Ok(body.data)
    }
}

#[async_trait]
impl QuestionStore for HttpQuestionStore {
    async fn list_subjects(&self, board: Board) -> Result<Vec<Subject>, StoreError> {
        let url = format!(
            "{}/list?type=boards&query={}",
            self.base(),
            board.query_value()
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StoreError::Unavailable(format!(
                "listing returned status {}",
                response.status()
            )));
        }
        let body: ListResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("undecodable listing response: {e}")))?;

        body.data.into_iter().map(SubjectRecord::into_subject).collect()
    }

    async fn sample(
        &self,
        filter: &SampleFilter,
        limit: u32,
    ) -> Result<Vec<Question>, StoreError> {
        validate_amount(limit)?;

        let shares = split_limit(limit, filter.subjects().len());
        let mut questions = Vec::new();
        for (code, share) in filter.subjects().iter().zip(shares) {
            if share == 0 {
                continue;
            }
            let records = self.fetch_random(code, filter.board(), share).await?;
            for record in records {
                questions.push(record.into_question()?);
            }
        }

        // The endpoint cannot apply year/topic/kind constraints itself.
        questions.retain(|q| filter.matches(q));
        questions.truncate(limit as usize);
        Ok(questions)
    }
}

/// Splits a request limit evenly across subjects, remainder to the earlier
/// ones, so a multi-subject session never over-asks the service.
fn split_limit(limit: u32, parts: usize) -> Vec<u32> {
    let parts_u32 = parts as u32;
    if parts_u32 == 0 {
        return Vec::new();
    }
    let base = limit / parts_u32;
    let remainder = (limit % parts_u32) as usize;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

//
// ─── WIRE RECORDS ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Vec<SubjectRecord>,
}

#[derive(Debug, Deserialize)]
struct SubjectRecord {
    code: String,
    name: String,
    board: String,
    #[serde(default)]
    topics: Vec<String>,
}

impl SubjectRecord {
    fn into_subject(self) -> Result<Subject, StoreError> {
        let board: Board = self
            .board
            .parse()
            .map_err(|_| StoreError::Unavailable(format!("malformed subject board: {}", self.board)))?;
        Ok(Subject::new(
            SubjectCode::new(self.code),
            self.name,
            board,
            self.topics,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct RandomResponse {
    data: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    subject: String,
    board: String,
    season: String,
    year: u16,
    paper: u8,
    variant: u8,
    question_number: u8,
    questions: Vec<String>,
    answers: AnswerRecord,
    #[serde(default)]
    topics: Vec<String>,
}

/// On the wire an answer is either a bare string (MCQ key) or an array of
/// strings (structured answer). The shape is the only kind marker the
/// service provides; a one-element array still means a structured question.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnswerRecord {
    Key(String),
    Steps(Vec<String>),
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, StoreError> {
        let malformed = |e: &dyn std::fmt::Display| {
            StoreError::Unavailable(format!("malformed question record: {e}"))
        };

        let board: Board = self.board.parse().map_err(|e| malformed(&e))?;
        let season = Season::from_code(&self.season).map_err(|e| malformed(&e))?;
        let images = self
            .questions
            .iter()
            .map(|raw| ImageUrl::parse(raw))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(&e))?;
        let answer = match self.answers {
            AnswerRecord::Key(raw) => Answer::key_from_str(&raw),
            AnswerRecord::Steps(lines) => Answer::steps(lines),
        }
        .map_err(|e| malformed(&e))?;

        Question::new(
            SubjectCode::new(self.subject),
            board,
            season,
            self.year,
            self.paper,
            self.variant,
            self.question_number,
            images,
            answer,
            self.topics,
        )
        .map_err(|e| malformed(&e))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::QuestionKind;

    #[test]
    fn split_limit_distributes_remainder_to_earlier_parts() {
        assert_eq!(split_limit(10, 3), vec![4, 3, 3]);
        assert_eq!(split_limit(5, 1), vec![5]);
        assert_eq!(split_limit(2, 4), vec![1, 1, 0, 0]);
        assert_eq!(split_limit(0, 2), vec![0, 0]);
        assert!(split_limit(5, 0).is_empty());
    }

    #[test]
    fn split_limit_sums_back_to_limit() {
        for limit in [1_u32, 7, 64, 250] {
            for parts in 1..=6_usize {
                let shares = split_limit(limit, parts);
                assert_eq!(shares.iter().sum::<u32>(), limit);
            }
        }
    }

    #[test]
    fn listing_response_decodes() {
        let raw = r#"{"data":[
            {"code":"5070","name":"Chemistry","board":"IGCSE","topics":["Acids"]},
            {"code":"5090","name":"Biology","board":"O"}
        ]}"#;
        let body: ListResponse = serde_json::from_str(raw).unwrap();
        let subjects: Vec<Subject> = body
            .data
            .into_iter()
            .map(|r| r.into_subject().unwrap())
            .collect();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].code.as_str(), "5070");
        assert_eq!(subjects[0].board, Board::Igcse);
        assert!(subjects[1].topics.is_empty());
    }

    #[test]
    fn listing_tolerates_empty_data() {
        let body: ListResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(body.data.is_empty());
    }

    #[test]
    fn subject_with_unknown_board_is_a_store_fault() {
        let raw = r#"{"code":"5070","name":"Chemistry","board":"GCSE"}"#;
        let record: SubjectRecord = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            record.into_subject(),
            Err(StoreError::Unavailable(_))
        ));
    }

    #[test]
    fn mcq_question_record_decodes_to_key_answer() {
        let raw = r#"{
            "subject":"5070","board":"IGCSE","season":"m","year":2019,
            "paper":2,"variant":3,"questionNumber":15,
            "questions":["https://img.example.com/5070_m19_qp_23_q15.png"],
            "answers":"b","topics":["Stoichiometry"]
        }"#;
        let record: QuestionRecord = serde_json::from_str(raw).unwrap();
        let question = record.into_question().unwrap();
        assert!(question.is_mcq());
        assert_eq!(question.answer(), &Answer::Key('B'));
        assert_eq!(question.year(), 2019);
    }

    #[test]
    fn structured_question_record_decodes_to_steps() {
        let raw = r#"{
            "subject":"5070","board":"O","season":"w","year":2018,
            "paper":4,"variant":1,"questionNumber":3,
            "questions":["https://img.example.com/a.png","https://img.example.com/b.png"],
            "answers":["2 mol","22.4 dm3"]
        }"#;
        let record: QuestionRecord = serde_json::from_str(raw).unwrap();
        let question = record.into_question().unwrap();
        assert!(!question.is_mcq());
        assert_eq!(question.images().len(), 2);
    }

    #[test]
    fn single_element_answer_array_stays_structured() {
        let raw = r#"{
            "subject":"5070","board":"O","season":"s","year":2020,
            "paper":1,"variant":1,"questionNumber":9,
            "questions":["https://img.example.com/q.png"],
            "answers":["A"]
        }"#;
        let record: QuestionRecord = serde_json::from_str(raw).unwrap();
        let question = record.into_question().unwrap();
        assert!(!question.is_mcq());
        assert!(!QuestionKind::Mcq.admits(question.answer()));
    }

    #[test]
    fn malformed_image_url_is_a_store_fault() {
        let raw = r#"{
            "subject":"5070","board":"O","season":"s","year":2020,
            "paper":1,"variant":1,"questionNumber":9,
            "questions":["https://img.example.com/q.gif"],
            "answers":"A"
        }"#;
        let record: QuestionRecord = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            record.into_question(),
            Err(StoreError::Unavailable(_))
        ));
    }
}
