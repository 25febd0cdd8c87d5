use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::seq::index;

use practice_core::model::{Board, Question, SampleFilter, Subject, validate_amount};

use crate::client::{QuestionStore, StoreError};

/// In-memory question store for testing and prototyping.
///
/// Holds the corpus behind a mutex and performs the uniform
/// without-replacement draw locally.
#[derive(Clone, Default)]
pub struct InMemoryQuestionStore {
    subjects: Arc<Mutex<Vec<Subject>>>,
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryQuestionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a subject into the listing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the corpus lock is poisoned.
    pub fn insert_subject(&self, subject: Subject) -> Result<(), StoreError> {
        let mut guard = self
            .subjects
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        guard.push(subject);
        Ok(())
    }

    /// Seeds questions into the corpus.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the corpus lock is poisoned.
    pub fn insert_questions(
        &self,
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<(), StoreError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        guard.extend(questions);
        Ok(())
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn list_subjects(&self, board: Board) -> Result<Vec<Subject>, StoreError> {
        let guard = self
            .subjects
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(guard.iter().filter(|s| s.board == board).cloned().collect())
    }

    async fn sample(
        &self,
        filter: &SampleFilter,
        limit: u32,
    ) -> Result<Vec<Question>, StoreError> {
        validate_amount(limit)?;

        let pool: Vec<Question> = {
            let guard = self
                .questions
                .lock()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            guard.iter().filter(|q| filter.matches(q)).cloned().collect()
        };

        let draw = (limit as usize).min(pool.len());
        if draw == 0 {
            return Ok(Vec::new());
        }

        let mut rng = rand::rng();
        let picked = index::sample(&mut rng, pool.len(), draw);
        Ok(picked.into_iter().map(|i| pool[i].clone()).collect())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{
        Answer, FilterError, ImageUrl, QuestionKind, QuestionRef, Season, SubjectCode,
    };
    use std::collections::HashSet;

    fn question(code: &str, board: Board, year: u16, number: u8, answer: Answer) -> Question {
        Question::new(
            SubjectCode::new(code),
            board,
            Season::MayJune,
            year,
            1,
            2,
            number,
            vec![ImageUrl::parse("https://img.example.com/q.png").unwrap()],
            answer,
            vec!["General".into()],
        )
        .unwrap()
    }

    fn mcq(code: &str, board: Board, year: u16, number: u8) -> Question {
        question(code, board, year, number, Answer::key('A').unwrap())
    }

    fn seeded_store() -> InMemoryQuestionStore {
        let store = InMemoryQuestionStore::new();
        store
            .insert_questions((1..=8).map(|n| mcq("5070", Board::Igcse, 2016, n)))
            .unwrap();
        store
            .insert_questions((1..=4).map(|n| mcq("5070", Board::Igcse, 2012, n)))
            .unwrap();
        store
            .insert_questions([question(
                "5070",
                Board::Igcse,
                2016,
                30,
                Answer::steps(vec!["free response".into()]).unwrap(),
            )])
            .unwrap();
        store
    }

    fn filter(year: u16) -> SampleFilter {
        SampleFilter::new(vec![SubjectCode::new("5070")], Board::Igcse, year)
            .unwrap()
            .with_kind(QuestionKind::Mcq)
    }

    #[tokio::test]
    async fn sample_size_is_min_of_limit_and_population() {
        let store = seeded_store();

        let five = store.sample(&filter(2015), 5).await.unwrap();
        assert_eq!(five.len(), 5);

        // Only 8 questions from 2015 onward match; asking for 50 under-fills.
        let all = store.sample(&filter(2015), 50).await.unwrap();
        assert_eq!(all.len(), 8);
    }

    #[tokio::test]
    async fn sample_never_repeats_a_question() {
        let store = seeded_store();
        let batch = store.sample(&filter(2010), 12).await.unwrap();
        assert_eq!(batch.len(), 12);

        let identities: HashSet<QuestionRef> = batch.iter().map(Question::reference).collect();
        assert_eq!(identities.len(), batch.len());
    }

    #[tokio::test]
    async fn sampled_questions_satisfy_the_filter() {
        let store = seeded_store();
        let batch = store.sample(&filter(2015), 50).await.unwrap();
        assert!(!batch.is_empty());
        for q in &batch {
            assert_eq!(q.board(), Board::Igcse);
            assert!(q.year() >= 2015);
            assert!(q.is_mcq());
        }
    }

    #[tokio::test]
    async fn mcq_filter_excludes_structured_answers() {
        let store = seeded_store();
        let batch = store.sample(&filter(2010), 50).await.unwrap();
        assert!(batch.iter().all(Question::is_mcq));
    }

    #[tokio::test]
    async fn empty_population_yields_empty_batch() {
        let store = seeded_store();
        let other_subject =
            SampleFilter::new(vec![SubjectCode::new("9701")], Board::Igcse, 2015).unwrap();
        let batch = store.sample(&other_subject, 5).await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn out_of_range_limit_is_rejected_before_sampling() {
        let store = seeded_store();
        let err = store.sample(&filter(2015), 0).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidFilter(FilterError::AmountOutOfRange(0))
        ));

        let err = store.sample(&filter(2015), 251).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidFilter(FilterError::AmountOutOfRange(251))
        ));
    }

    #[tokio::test]
    async fn listing_filters_by_board() {
        let store = InMemoryQuestionStore::new();
        store
            .insert_subject(Subject::new(
                SubjectCode::new("5070"),
                "Chemistry",
                Board::Igcse,
                Vec::new(),
            ))
            .unwrap();
        store
            .insert_subject(Subject::new(
                SubjectCode::new("9701"),
                "Chemistry",
                Board::ALevel,
                Vec::new(),
            ))
            .unwrap();

        let listed = store.list_subjects(Board::Igcse).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].code.as_str(), "5070");

        let empty = store.list_subjects(Board::AsLevel).await.unwrap();
        assert!(empty.is_empty());
    }
}
