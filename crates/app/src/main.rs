use std::fmt;
use std::io::{BufRead, Write};

use services::{
    AppServices, Clock, InputEvent, Mode, SessionService, SessionView, UpdateCheckError,
    UpdateOutcome,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidBaseUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
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
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--base-url <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:flashcards.sqlite3");
    eprintln!("  --base-url http://localhost:8000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_DB_URL, VOCAB_BASE_URL");
}

struct Args {
    db_url: String,
    base_url: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("VOCAB_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://flashcards.sqlite3".into(), normalize_sqlite_url);
        let mut base_url =
            std::env::var("VOCAB_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--base-url" => {
                    let value = require_value(args, "--base-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidBaseUrl { raw: value });
                    }
                    base_url = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, base_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// What one line of terminal input asks for.
///
/// Bindings are by role: the arrow roles ("left"/"right"), the reveal role
/// ("space" or a bare Enter in review), answer submission (any plain line in
/// quiz), and the results-screen roles ("w", "r"). Global commands carry a
/// `:` prefix so they never collide with a quiz answer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Event(InputEvent),
    CheckUpdates,
    RefreshCache,
    Help,
    Quit,
    Noop,
}

fn action_for(view: &SessionView, line: &str) -> Action {
    let trimmed = line.trim();

    if let Some(command) = trimmed.strip_prefix(':') {
        return match command {
            "review" => Action::Event(InputEvent::SelectMode(Mode::Review)),
            "quiz" => Action::Event(InputEvent::SelectMode(Mode::Quiz)),
            "update" => Action::CheckUpdates,
            "refresh" => Action::RefreshCache,
            "help" => Action::Help,
            "quit" | "q" => Action::Quit,
            _ => Action::Help,
        };
    }

    match view {
        SessionView::Loading => Action::Noop,
        SessionView::ReviewCard { .. } => match trimmed {
            "left" | "h" | "p" => Action::Event(InputEvent::PrevCard),
            "right" | "l" | "n" => Action::Event(InputEvent::NextCard),
            "" | "space" => Action::Event(InputEvent::Reveal),
            _ => Action::Help,
        },
        SessionView::QuizQuestion { .. } => Action::Event(InputEvent::Submit(line.to_owned())),
        SessionView::QuizResults { .. } => match trimmed {
            "w" => Action::Event(InputEvent::ToggleWrongAnswers),
            "r" => Action::Event(InputEvent::RestartQuiz),
            _ => Action::Help,
        },
    }
}

fn render(view: &SessionView) {
    match view {
        SessionView::Loading => println!("Loading... (no vocabulary available yet)"),
        SessionView::ReviewCard {
            question,
            answer,
            revealed,
            position,
            total,
        } => {
            println!("[{position}/{total}] {question}");
            if *revealed {
                println!("  -> {answer}");
            }
        }
        SessionView::QuizQuestion {
            question,
            position,
            total,
            feedback,
        } => {
            if let Some(feedback) = feedback {
                if feedback.is_correct {
                    println!("Correct!");
                } else {
                    println!("Wrong! The answer was: {}", feedback.correct_answer);
                }
            }
            println!("Question {position}/{total}: {question}");
        }
        SessionView::QuizResults {
            correct,
            total,
            show_wrong,
            wrong,
        } => {
            println!("Quiz complete! Score: {correct}/{total}");
            println!("(w: review wrong answers, r: restart quiz)");
            if *show_wrong {
                for answer in wrong {
                    println!("  Q: {}", answer.question);
                    println!("  Your answer: {}", answer.user_answer);
                    println!("  Correct answer: {}", answer.correct_answer);
                }
            }
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  :review / :quiz     switch mode");
    println!("  :update             check the vocabulary for updates");
    println!("  :refresh            re-download every cached asset");
    println!("  :quit               exit");
    println!("Review: left/right (or h/l) to navigate, Enter or 'space' to flip.");
    println!("Quiz: type your answer and press Enter.");
}

async fn check_updates(services: &AppServices, session: &mut SessionService) {
    match services.check_for_updates().await {
        Ok(UpdateOutcome::Updated { records }) => {
            session.reload(records);
            println!("Vocabulary updated!");
        }
        Ok(UpdateOutcome::AlreadyCurrent) => println!("Already up to date."),
        Err(UpdateCheckError::AlreadyRunning) => println!("A check is already running."),
        Err(err) => println!("Update check failed, please check your connection. ({err})"),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, &parsed.base_url, Clock::default_clock()).await?;
    let mut session = services.start_session().await;

    print_help();
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        render(&session.view());
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match action_for(&session.view(), &line) {
            Action::Event(event) => session.apply(event),
            Action::CheckUpdates => check_updates(&services, &mut session).await,
            Action::RefreshCache => {
                let stored = services.refresh_cache().await;
                println!("Refreshed {stored} cached assets.");
            }
            Action::Help => print_help(),
            Action::Quit => break,
            Action::Noop => {}
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review_view() -> SessionView {
        SessionView::ReviewCard {
            question: "犬".into(),
            answer: "いぬ".into(),
            revealed: false,
            position: 1,
            total: 3,
        }
    }

    fn quiz_view() -> SessionView {
        SessionView::QuizQuestion {
            question: "犬".into(),
            position: 1,
            total: 3,
            feedback: None,
        }
    }

    fn results_view() -> SessionView {
        SessionView::QuizResults {
            correct: 2,
            total: 3,
            show_wrong: false,
            wrong: Vec::new(),
        }
    }

    #[test]
    fn review_keys_bind_by_role() {
        assert_eq!(
            action_for(&review_view(), "left"),
            Action::Event(InputEvent::PrevCard)
        );
        assert_eq!(
            action_for(&review_view(), "right"),
            Action::Event(InputEvent::NextCard)
        );
        assert_eq!(
            action_for(&review_view(), "space"),
            Action::Event(InputEvent::Reveal)
        );
        assert_eq!(
            action_for(&review_view(), ""),
            Action::Event(InputEvent::Reveal)
        );
    }

    #[test]
    fn quiz_lines_are_submissions_even_when_they_look_like_keys() {
        assert_eq!(
            action_for(&quiz_view(), "いぬ"),
            Action::Event(InputEvent::Submit("いぬ".into()))
        );
        assert_eq!(
            action_for(&quiz_view(), "left"),
            Action::Event(InputEvent::Submit("left".into()))
        );
    }

    #[test]
    fn results_keys_toggle_and_restart() {
        assert_eq!(
            action_for(&results_view(), "w"),
            Action::Event(InputEvent::ToggleWrongAnswers)
        );
        assert_eq!(
            action_for(&results_view(), "r"),
            Action::Event(InputEvent::RestartQuiz)
        );
    }

    #[test]
    fn global_commands_work_in_any_mode() {
        for view in [review_view(), quiz_view(), results_view()] {
            assert_eq!(action_for(&view, ":update"), Action::CheckUpdates);
            assert_eq!(action_for(&view, ":quit"), Action::Quit);
            assert_eq!(
                action_for(&view, ":review"),
                Action::Event(InputEvent::SelectMode(Mode::Review))
            );
        }
    }

    #[test]
    fn sqlite_url_normalization_leaves_urls_alone() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.sqlite3".into()),
            "sqlite:///tmp/x.sqlite3"
        );
        assert!(normalize_sqlite_url("sqlite:rel.sqlite3".into()).starts_with("sqlite://"));
    }
}
