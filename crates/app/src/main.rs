use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, QuizConfig, QuizLoopService, QuizSource};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFile,
    UnknownArg(String),
    InvalidDbUrl { origin: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFile => write!(f, "validate requires a JSON file path"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { origin, raw } => write!(f, "invalid {origin} value: {raw}"),
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

struct DesktopApp {
    quiz_loop: Arc<QuizLoopService>,
    auto_advance: Duration,
    initial_source: Option<QuizSource>,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn auto_advance(&self) -> Duration {
        self.auto_advance
    }

    fn initial_source(&self) -> Option<QuizSource> {
        self.initial_source.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui [--base-url <url>] [--data-path <path>]");
    eprintln!("                         [--cache-db <sqlite_url>] [--file <json>] [--no-offline]");
    eprintln!("  cargo run -p app -- validate <json>");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --base-url http://127.0.0.1:8000/");
    eprintln!("  --data-path data/quizzes.json");
    eprintln!("  --cache-db sqlite://quiz-cache.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BASE_URL, QUIZ_DATA_PATH, QUIZ_CACHE_DB, QUIZ_AUTO_ADVANCE_MS,");
    eprintln!("  QUIZ_OFFLINE, QUIZ_LOG_JSON, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Validate,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "validate" => Some(Self::Validate),
            _ => None,
        }
    }
}

struct UiArgs {
    config: QuizConfig,
    file: Option<PathBuf>,
}

impl UiArgs {
    fn parse(
        config: QuizConfig,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = config;
        let mut file = None;
        let mut cache_db_origin = "QUIZ_CACHE_DB";

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    let value = require_value(args, "--base-url")?;
                    config = config.with_base_url(&value)?;
                }
                "--data-path" => {
                    config = config.with_data_path(require_value(args, "--data-path")?);
                }
                "--cache-db" => {
                    let value = require_value(args, "--cache-db")?;
                    config = config.with_cache_db(value);
                    cache_db_origin = "--cache-db";
                }
                "--file" => {
                    file = Some(PathBuf::from(require_value(args, "--file")?));
                }
                "--no-offline" => {
                    config = config.with_offline(false);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg).into()),
            }
        }

        let config = normalize_cache_db(config, cache_db_origin)?;
        Ok(Self { config, file })
    }
}

fn parse_validate(args: &mut impl Iterator<Item = String>) -> Result<PathBuf, ArgsError> {
    let path = args.next().ok_or(ArgsError::MissingFile)?;
    if let Some(extra) = args.next() {
        return Err(ArgsError::UnknownArg(extra));
    }
    Ok(PathBuf::from(path))
}

/// `origin` names where the value came from, for the error message.
fn normalize_cache_db(config: QuizConfig, origin: &'static str) -> Result<QuizConfig, ArgsError> {
    if config.cache_db.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            origin,
            raw: config.cache_db,
        });
    }
    let db_url = normalize_sqlite_url(config.cache_db.clone());
    Ok(config.with_cache_db(db_url))
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
            origin: "cache database",
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            origin: "cache database",
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

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Check a question file without starting the UI.
async fn validate_file(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(&path).await?;
    let questions = quiz_core::parse_payload(&text)?;
    println!("{}: {} questions OK", path.display(), questions.len());
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let config = QuizConfig::from_env()?;
    init_tracing(config.log_json);

    let mut iter = argv.into_iter();
    match cmd {
        Command::Validate => {
            let path = parse_validate(&mut iter).inspect_err(|_| print_usage())?;
            validate_file(path).await
        }
        Command::Ui => {
            let parsed = UiArgs::parse(config, &mut iter).inspect_err(|_| print_usage())?;
            let config = parsed.config;

            if config.offline {
                prepare_sqlite_file(&config.cache_db)?;
            }
            let services = AppServices::bootstrap(&config, Clock::system()).await?;
            tracing::info!(
                base_url = %config.base_url,
                offline = services.worker().is_some_and(|worker| worker.is_controlling()),
                "starting quiz"
            );

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                quiz_loop: services.quiz_loop(),
                auto_advance: services.auto_advance(),
                initial_source: parsed.file.map(QuizSource::file),
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
