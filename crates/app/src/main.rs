use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::QuizId;
use services::{
    AppServices, CatalogService, ClientConfig, Clock, SettingsService, TakeQuizService, TaskService,
};
use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuizId { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --quiz-id value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
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
    services: AppServices,
    launch_quiz: Option<QuizId>,
}

impl UiApp for DesktopApp {
    fn app_name(&self) -> &str {
        "Quiz"
    }

    fn launch_quiz(&self) -> Option<String> {
        self.launch_quiz.map(|id| id.to_string())
    }

    fn take_quiz(&self) -> Arc<TakeQuizService> {
        self.services.take_quiz()
    }

    fn tasks(&self) -> Arc<TaskService> {
        self.services.tasks()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn settings(&self) -> Arc<SettingsService> {
        self.services.settings()
    }
}

#[derive(Debug, Default)]
struct Args {
    api_base_url: Option<String>,
    download_dir: Option<PathBuf>,
    quiz_id: Option<QuizId>,
    help: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <url>] [--download-dir <path>] [--quiz-id <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://127.0.0.1:5000");
    eprintln!("  --download-dir ./downloads");
    eprintln!();
    eprintln!("Environment (a .env file is read first):");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_DOWNLOAD_DIR, QUIZ_POLL_INTERVAL_SECS,");
    eprintln!("  QUIZ_POLL_MAX_ATTEMPTS, QUIZ_TICK_MILLIS, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    parsed.api_base_url = Some(value);
                }
                "--download-dir" => {
                    let value = require_value(args, "--download-dir")?;
                    parsed.download_dir = Some(PathBuf::from(value));
                }
                "--quiz-id" => {
                    let value = require_value(args, "--quiz-id")?;
                    let quiz_id = value
                        .parse::<QuizId>()
                        .map_err(|_| ArgsError::InvalidQuizId { raw: value.clone() })?;
                    parsed.quiz_id = Some(quiz_id);
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }

    /// Flags win over the environment.
    fn apply(&self, config: &mut ClientConfig) {
        if let Some(url) = &self.api_base_url {
            config.api_base_url.clone_from(url);
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir.clone_from(dir);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(log_fmt::layer().with_target(false))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine; the environment and defaults still apply.
    dotenvy::dotenv().ok();
    init_logging();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).inspect_err(|e| {
        eprintln!("{e}");
        print_usage();
    })?;
    if parsed.help {
        print_usage();
        return Ok(());
    }

    let mut config = ClientConfig::from_env()?;
    parsed.apply(&mut config);
    tracing::info!(
        api = %config.api_base_url,
        download_dir = %config.download_dir.display(),
        "starting quiz client"
    );

    let services = AppServices::from_config(config, Clock::default_clock())?;
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        launch_quiz: parsed.quiz_id,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
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

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(ToString::to_string);
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&["--api", "http://quiz.local", "--download-dir", "/tmp/exports"]).unwrap();
        let mut config = ClientConfig::default();
        args.apply(&mut config);
        assert_eq!(config.api_base_url, "http://quiz.local");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn quiz_id_must_be_numeric() {
        assert!(matches!(
            parse(&["--quiz-id", "abc"]),
            Err(ArgsError::InvalidQuizId { .. })
        ));
        assert_eq!(parse(&["--quiz-id", "7"]).unwrap().quiz_id, Some(QuizId::new(7)));
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(matches!(parse(&["--db"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(
            parse(&["--api"]),
            Err(ArgsError::MissingValue { flag: "--api" })
        ));
    }
}
