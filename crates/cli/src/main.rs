//! `momentum` command-line entry point.
//!
//! Without a subcommand the TUI is launched. `init` scaffolds `.momentum/`
//! and `run` drives a single prompt headlessly, printing the activity log.

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};
use colored::{ColoredString, Colorize};
use mm_core::config::loader::load_config;
use mm_core::config::CONFIG_DIR;
use mm_core::engine::RunController;
use mm_core::init::{generate_momentum_structure, InitOptions};
use mm_core::state::manager::RunManager;
use mm_protocol::config_models::DriveStrategy;
use mm_protocol::ipc::Event;
use mm_protocol::log_models::{LogEntry, LogKind};
use mm_protocol::run_models::RunStatus;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "momentum", version, about = "Watch an agent walk a feature request through the pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a `.momentum/` directory with the default configuration.
    Init {
        /// Overwrite an existing `.momentum/` directory.
        #[arg(long)]
        force: bool,

        /// Only write the feature-request pipeline.
        #[arg(long)]
        minimal: bool,

        /// Directory to initialize (defaults to the current directory).
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Run one prompt without the TUI.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// The feature request to hand to the agent.
    prompt: String,

    /// How the run is driven. Overrides `strategy` in config.toml.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Agent backend URL for the delegated strategy.
    #[arg(long)]
    endpoint: Option<String>,

    /// Pause between narration beats, in milliseconds.
    #[arg(long)]
    beat_ms: Option<u64>,

    /// Print the final run snapshot as JSON instead of the log.
    #[arg(long)]
    json: bool,

    /// Project directory containing `.momentum/`.
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Local,
    Delegated,
}

impl From<StrategyArg> for DriveStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Local => DriveStrategy::Local,
            StrategyArg::Delegated => DriveStrategy::Delegated,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        None => {
            let root = std::env::current_dir()?;
            let _guard = init_file_logging(&root);
            let config = load_config(&root).await?;
            mm_tui::run_app(config).await.map_err(|e| eyre!(e))?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Init {
            force,
            minimal,
            dir,
        }) => {
            init_stderr_logging();
            let target_dir = resolve_dir(dir)?;
            let created = generate_momentum_structure(InitOptions {
                target_dir,
                force,
                minimal,
            })
            .await?;
            println!("{} {}", "Initialized".green().bold(), created.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Run(args)) => {
            init_stderr_logging();
            run_headless(args).await
        }
    }
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(std::env::current_dir()?),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `.momentum/logs/momentum.log` so the TUI screen stays clean.
///
/// Logging is skipped when the log directory cannot be created.
fn init_file_logging(root: &Path) -> Option<WorkerGuard> {
    let log_dir = root.join(CONFIG_DIR).join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::never(log_dir, "momentum.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

async fn run_headless(args: RunArgs) -> Result<ExitCode> {
    let root = resolve_dir(args.dir)?;
    let mut config = load_config(&root)
        .await
        .wrap_err_with(|| format!("loading configuration from {}", root.display()))?;

    if let Some(strategy) = args.strategy {
        config.global.strategy = strategy.into();
    }
    if let Some(endpoint) = args.endpoint {
        config.global.endpoint = endpoint;
    }
    if let Some(beat_ms) = args.beat_ms {
        config.global.beat_interval_ms = beat_ms;
    }

    let controller = RunController::from_config(&config)?;
    let (event_tx, mut event_rx) = mpsc::channel(256);
    let manager = RunManager::new(controller, event_tx);

    manager.submit(&args.prompt).await?;
    if !args.json {
        println!("{} {}", "you".cyan().bold(), args.prompt.trim());
    }

    while let Some(event) = event_rx.recv().await {
        if let Event::LogAppended { entry, .. } = &event {
            if !args.json {
                println!("{}", format_entry(entry));
            }
        }
        if event.is_terminal() {
            break;
        }
    }
    manager.wait().await;

    let snapshot = manager
        .snapshot()
        .ok_or_else(|| eyre!("run finished without a snapshot"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        match (&snapshot.status, &snapshot.result_ref, &snapshot.error) {
            (RunStatus::Success, Some(url), _) => {
                println!("{} {}", "Pull request:".green().bold(), url);
            }
            (RunStatus::Error, _, Some(error)) => {
                eprintln!("{} {}", "Error:".red().bold(), error);
            }
            _ => {}
        }
    }

    Ok(match snapshot.status {
        RunStatus::Success => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn kind_label(kind: LogKind) -> ColoredString {
    match kind {
        LogKind::Agent => "agent ".magenta(),
        LogKind::Search => "search".blue(),
        LogKind::Code => "code  ".cyan(),
        LogKind::Test => "test  ".green(),
        LogKind::Review => "review".yellow(),
        LogKind::Git => "git   ".bright_blue(),
        LogKind::Error => "error ".red().bold(),
    }
}

fn format_entry(entry: &LogEntry) -> String {
    let time = entry.timestamp.format("%H:%M:%S").to_string();
    let message = if entry.kind == LogKind::Error {
        entry.message.red()
    } else {
        entry.message.normal()
    };
    format!("{} {} {}", time.dimmed(), kind_label(entry.kind), message)
}
