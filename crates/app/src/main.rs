use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use omr_core::model::Mode;
use services::{AppServices, SheetService, SheetSnapshot};
use storage::StorageKeys;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*};
use ui::vm::map_report;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://omr.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidKeyPrefix { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidKeyPrefix { raw } => {
                write!(f, "invalid --key-prefix value: {raw:?}")
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

struct DesktopApp {
    sheet: Arc<SheetService>,
    initial: SheetSnapshot,
}

impl UiApp for DesktopApp {
    fn sheet_service(&self) -> Arc<SheetService> {
        Arc::clone(&self.sheet)
    }

    fn initial_snapshot(&self) -> SheetSnapshot {
        self.initial.clone()
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    key_prefix: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--db <sqlite_url>] [--key-prefix <prefix>]");
    eprintln!("  cargo run -p app -- report [--db <sqlite_url>] [--key-prefix <prefix>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --key-prefix {}", StorageKeys::DEFAULT_PREFIX);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  OMR_DB_URL, OMR_KEY_PREFIX, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Report,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "report" => Some(Self::Report),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("OMR_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut key_prefix = std::env::var("OMR_KEY_PREFIX")
            .ok()
            .filter(|value| valid_key_prefix(value))
            .unwrap_or_else(|| StorageKeys::DEFAULT_PREFIX.to_string());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--key-prefix" => {
                    let value = require_value(args, "--key-prefix")?;
                    if !valid_key_prefix(&value) {
                        return Err(ArgsError::InvalidKeyPrefix { raw: value });
                    }
                    key_prefix = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, key_prefix })
    }
}

fn valid_key_prefix(raw: &str) -> bool {
    !raw.is_empty() && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(log_fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_report(snapshot: &SheetSnapshot) {
    if !snapshot.has_sheet() {
        println!("No sheet generated.");
        return;
    }

    let total = snapshot.questions.len();
    println!("Questions: {}", snapshot.questions.to_text());
    println!("Choices: {}", snapshot.choices);
    println!("Mode: {}", snapshot.mode);
    println!("Answered: {} / {total}", snapshot.user_answers.len());
    if snapshot.mode == Mode::KeyEntry {
        println!("Skipped: {}", snapshot.skipped.len());
        println!("Key entered: {} / {total}", snapshot.correct_answers.len());
    }

    match snapshot.report.as_ref().filter(|_| snapshot.results_visible) {
        Some(report) => {
            println!();
            for line in map_report(report).lines() {
                println!("{line}");
            }
        }
        None => println!("Results: not checked"),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the window.
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

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    info!(?cmd, db = %parsed.db_url, prefix = %parsed.key_prefix, "starting");

    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, StorageKeys::new(parsed.key_prefix)).await?;
    let sheet = services.sheet();
    let initial = sheet.restore().await;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { sheet, initial });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("OMR Sheet")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Report => {
            print_report(&initial);
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
