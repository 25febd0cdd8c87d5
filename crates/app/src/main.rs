use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;

use practice_core::model::{Board, PracticeRequest, Subject};
use services::{
    DisplayError, QuestionCard, SelectionEvent, SelectionSink, SessionDisplay, SessionNotice,
    SessionRunner,
};
use store::HttpQuestionStore;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFlag { flag: &'static str },
    UnknownArg(String),
    InvalidBoard { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFlag { flag } => write!(f, "{flag} is required"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBoard { raw } => {
                write!(f, "invalid --board value: {raw} (expected a, as or igcse)")
            }
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- --board <a|as|igcse> --amount <1-250> --minimum-year <2010-2022>"
    );
    eprintln!();
    eprintln!("All three flags are required unless supplied via the environment.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PRACTICE_BOARD, PRACTICE_AMOUNT, PRACTICE_MINIMUM_YEAR");
    eprintln!("  PRACTICE_API_URL (question service base URL)");
}

struct Args {
    request: PracticeRequest,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut board: Option<Board> = std::env::var("PRACTICE_BOARD")
            .ok()
            .and_then(|value| value.parse().ok());
        let mut amount: Option<u32> = std::env::var("PRACTICE_AMOUNT")
            .ok()
            .and_then(|value| value.parse().ok());
        let mut minimum_year: Option<u16> = std::env::var("PRACTICE_MINIMUM_YEAR")
            .ok()
            .and_then(|value| value.parse().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--board" => {
                    let value = require_value(args, "--board")?;
                    board = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidBoard { raw: value })?,
                    );
                }
                "--amount" => {
                    let value = require_value(args, "--amount")?;
                    amount = Some(value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--amount",
                        raw: value.clone(),
                    })?);
                }
                "--minimum-year" => {
                    let value = require_value(args, "--minimum-year")?;
                    minimum_year =
                        Some(value.parse().map_err(|_| ArgsError::InvalidNumber {
                            flag: "--minimum-year",
                            raw: value.clone(),
                        })?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let board = board.ok_or(ArgsError::MissingFlag { flag: "--board" })?;
        let amount = amount.ok_or(ArgsError::MissingFlag { flag: "--amount" })?;
        let minimum_year = minimum_year.ok_or(ArgsError::MissingFlag {
            flag: "--minimum-year",
        })?;

        Ok(Self {
            request: PracticeRequest {
                board,
                amount,
                minimum_year,
            },
        })
    }
}

/// Plain-terminal rendition of the session's display primitives.
///
/// The subject prompt reads one line of comma-separated codes from stdin
/// and feeds it back through the selection sink.
struct TerminalDisplay;

#[async_trait]
impl SessionDisplay for TerminalDisplay {
    async fn prompt_subjects(
        &self,
        subjects: &[Subject],
        sink: &SelectionSink,
    ) -> Result<(), DisplayError> {
        println!("Choose your session's subjects (comma-separated codes):");
        for subject in subjects {
            println!("  {} ({})", subject.name, subject.code);
        }
        print!("> ");
        use std::io::Write as _;
        std::io::stdout()
            .flush()
            .map_err(|e| DisplayError::Render(e.to_string()))?;

        let sink = sink.clone();
        tokio::spawn(async move {
            let mut reader = tokio::io::BufReader::new(tokio::io::stdin());
            let mut line = String::new();
            if reader.read_line(&mut line).await.is_ok() {
                let choices = line
                    .split(',')
                    .map(|piece| piece.trim().to_string())
                    .filter(|piece| !piece.is_empty())
                    .collect();
                sink.submit(SelectionEvent::new(sink.token(), choices));
            }
        });
        Ok(())
    }

    async fn show_question(&self, card: QuestionCard<'_>) -> Result<(), DisplayError> {
        let question = card.question;
        println!();
        println!(
            "[{}/{}] {} ({} {})",
            card.index + 1,
            card.total,
            question.reference(),
            question.board(),
            question.year()
        );
        for image in question.images() {
            println!("  {image}");
        }
        Ok(())
    }

    async fn notify(&self, notice: SessionNotice) -> Result<(), DisplayError> {
        println!("{}", notice.message());
        Ok(())
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        print_usage();
        e
    })?;

    let store = Arc::new(HttpQuestionStore::from_env());
    let display = Arc::new(TerminalDisplay);
    let runner = SessionRunner::new(store, display);

    let report = runner.run(parsed.request).await?;
    if let Some(reason) = report.session.abort_reason() {
        eprintln!("session ended early: {reason}");
    } else {
        println!();
        println!("Delivered {} question(s).", report.delivered);
        for failure in &report.failures {
            eprintln!(
                "  item {} failed to render: {}",
                failure.index + 1,
                failure.reason
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
