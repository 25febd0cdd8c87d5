use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use practice_core::model::{
    Answer, Board, ImageUrl, PracticeRequest, Question, QuestionRef, Season, SessionPhase,
    Subject, SubjectCode,
};
use practice_core::time::fixed_clock;
use services::{
    DisplayError, QuestionCard, SelectionEvent, SelectionSink, SessionDisplay, SessionNotice,
    SessionRunner,
};
use store::InMemoryQuestionStore;

/// Display that picks every offered subject and records what it rendered.
struct SelectAllDisplay {
    shown: Mutex<Vec<QuestionRef>>,
    notices: Mutex<Vec<SessionNotice>>,
}

impl SelectAllDisplay {
    fn new() -> Self {
        Self {
            shown: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SessionDisplay for SelectAllDisplay {
    async fn prompt_subjects(
        &self,
        subjects: &[Subject],
        sink: &SelectionSink,
    ) -> Result<(), DisplayError> {
        let all = subjects.iter().map(|s| s.code.as_str().to_string()).collect();
        sink.submit(SelectionEvent::new(sink.token(), all));
        Ok(())
    }

    async fn show_question(&self, card: QuestionCard<'_>) -> Result<(), DisplayError> {
        self.shown.lock().unwrap().push(card.question.reference());
        Ok(())
    }

    async fn notify(&self, notice: SessionNotice) -> Result<(), DisplayError> {
        self.notices.lock().unwrap().push(notice);
        Ok(())
    }
}

fn mcq(code: &str, year: u16, number: u8) -> Question {
    Question::new(
        SubjectCode::new(code),
        Board::Igcse,
        Season::OctNov,
        year,
        1,
        1,
        number,
        vec![ImageUrl::parse("https://img.example.com/q.png").unwrap()],
        Answer::key('D').unwrap(),
        vec!["General".into()],
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn igcse_session_delivers_what_the_corpus_has() {
    let store = InMemoryQuestionStore::new();
    store
        .insert_subject(Subject::new(
            SubjectCode::new("5070"),
            "Chemistry",
            Board::Igcse,
            Vec::new(),
        ))
        .unwrap();
    // Three questions satisfy the filter; one is from before the minimum
    // year and one is a structured question, so neither may appear.
    store
        .insert_questions([
            mcq("5070", 2016, 1),
            mcq("5070", 2018, 2),
            mcq("5070", 2021, 3),
            mcq("5070", 2012, 4),
        ])
        .unwrap();
    store
        .insert_questions([Question::new(
            SubjectCode::new("5070"),
            Board::Igcse,
            Season::OctNov,
            2019,
            4,
            1,
            5,
            vec![ImageUrl::parse("https://img.example.com/q5.png").unwrap()],
            Answer::steps(vec!["exothermic".into()]).unwrap(),
            Vec::new(),
        )
        .unwrap()])
        .unwrap();

    let display = Arc::new(SelectAllDisplay::new());
    let display_dyn: Arc<dyn SessionDisplay> = display.clone();
    let runner = SessionRunner::new(Arc::new(store), display_dyn)
        .with_clock(fixed_clock());

    let report = runner
        .run(PracticeRequest {
            board: Board::Igcse,
            amount: 5,
            minimum_year: 2015,
        })
        .await
        .unwrap();

    assert_eq!(report.session.phase(), SessionPhase::Complete);
    assert!(!report.is_aborted());
    assert_eq!(report.delivered, 3);
    assert!(report.failures.is_empty());

    let shown = display.shown.lock().unwrap().clone();
    let expected: Vec<QuestionRef> = report
        .session
        .questions()
        .iter()
        .map(Question::reference)
        .collect();
    assert_eq!(shown, expected);
    for question in report.session.questions() {
        assert!(question.is_mcq());
        assert!(question.year() >= 2015);
    }

    assert!(display.notices.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn selecting_every_subject_samples_across_all_of_them() {
    let store = InMemoryQuestionStore::new();
    for (code, name) in [("5070", "Chemistry"), ("5090", "Biology")] {
        store
            .insert_subject(Subject::new(
                SubjectCode::new(code),
                name,
                Board::Igcse,
                Vec::new(),
            ))
            .unwrap();
    }
    store
        .insert_questions([
            mcq("5070", 2017, 1),
            mcq("5070", 2019, 2),
            mcq("5070", 2020, 3),
            mcq("5090", 2016, 1),
            mcq("5090", 2018, 2),
        ])
        .unwrap();

    let display = Arc::new(SelectAllDisplay::new());
    let display_dyn: Arc<dyn SessionDisplay> = display.clone();
    let runner = SessionRunner::new(Arc::new(store), display_dyn)
        .with_clock(fixed_clock());

    let report = runner
        .run(PracticeRequest {
            board: Board::Igcse,
            amount: 10,
            minimum_year: 2015,
        })
        .await
        .unwrap();

    assert_eq!(report.session.phase(), SessionPhase::Complete);
    assert_eq!(report.delivered, 5);

    let per_subject = |code: &str| {
        report
            .session
            .questions()
            .iter()
            .filter(|q| q.subject_code().as_str() == code)
            .count()
    };
    assert_eq!(per_subject("5070"), 3);
    assert_eq!(per_subject("5090"), 2);
}
