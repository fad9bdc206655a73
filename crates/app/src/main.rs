use std::fmt;
use std::path::PathBuf;

use hoax_core::model::{QuestionBank, QuizSettings};
use hoax_core::{Phase, SessionSnapshot};
use log::{debug, info};
use services::{Clock, QuizController, bank_from_path, embedded_bank};
use tokio::io::{AsyncBufReadExt, BufReader};

mod render;

use render::{Input, Screen};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeout { raw: String },
    InvalidQuestionsPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeout { raw } => {
                write!(f, "invalid --timeout value: {raw} (expected 1-600 seconds)")
            }
            ArgsError::InvalidQuestionsPath { raw } => {
                write!(f, "invalid --questions value: {raw:?}")
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
    eprintln!("  hoax-quiz play [--timeout <secs>] [--questions <file.json>]");
    eprintln!("  hoax-quiz list [--questions <file.json>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --timeout 15");
    eprintln!("  --questions <built-in headlines>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  HOAX_QUESTION_TIMEOUT, HOAX_QUESTIONS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    List,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    settings: QuizSettings,
    questions: Option<PathBuf>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut settings = match std::env::var("HOAX_QUESTION_TIMEOUT") {
            Ok(raw) => parse_timeout(raw)?,
            Err(_) => QuizSettings::default(),
        };
        let mut questions = std::env::var("HOAX_QUESTIONS")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--timeout" => {
                    let value = require_value(args, "--timeout")?;
                    settings = parse_timeout(value)?;
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidQuestionsPath { raw: value });
                    }
                    questions = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            settings,
            questions,
        })
    }

    fn load_bank(&self) -> Result<QuestionBank, services::QuestionSourceError> {
        match &self.questions {
            Some(path) => bank_from_path(path),
            None => embedded_bank(),
        }
    }
}

fn parse_timeout(raw: String) -> Result<QuizSettings, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(|secs| QuizSettings::new(secs).ok())
        .ok_or(ArgsError::InvalidTimeout { raw })
}

fn list_questions(bank: &QuestionBank) {
    for (index, question) in bank.iter().enumerate() {
        println!(
            "{:>2}. [{}] {}",
            index + 1,
            question.verdict(),
            question.headline()
        );
    }
}

async fn play(controller: QuizController) -> Result<(), Box<dyn std::error::Error>> {
    let mut snapshots = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = Screen::new();

    let initial = snapshots.borrow_and_update().clone();
    print_snapshot(&mut screen, &initial);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snapshots.borrow_and_update().clone();
                print_snapshot(&mut screen, &snap);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                let Some(input) = Input::parse(&line) else {
                    eprintln!("unrecognised input: {line:?}");
                    continue;
                };
                if !apply_input(&controller, input)? {
                    break;
                }
            }
        }
    }

    controller.stop();
    Ok(())
}

/// Maps a command onto the controller. Returns `false` when the player quits.
fn apply_input(
    controller: &QuizController,
    input: Input,
) -> Result<bool, services::ControllerError> {
    match input {
        Input::Quit => return Ok(false),
        Input::Restart => {
            controller.start()?;
        }
        Input::Answer(verdict) => {
            controller.submit_answer(Some(verdict));
        }
        Input::Next => match controller.snapshot().phase {
            Phase::NotStarted => {
                controller.start()?;
            }
            Phase::ShowingResult => {
                controller.advance()?;
            }
            Phase::AwaitingAnswer | Phase::Finished => {}
        },
    }
    Ok(true)
}

fn print_snapshot(screen: &mut Screen, snap: &SessionSnapshot) {
    if let Some(text) = screen.render(snap) {
        println!("{}", text.trim_end());
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let bank = parsed.load_bank()?;
    info!(
        "loaded {} questions, {}s per question",
        bank.len(),
        parsed.settings.question_timeout_secs()
    );

    match cmd {
        Command::List => {
            list_questions(&bank);
            Ok(())
        }
        Command::Play => {
            let controller = QuizController::new(Clock::system(), bank, parsed.settings);
            play(controller).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
