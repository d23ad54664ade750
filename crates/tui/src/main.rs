mod app;
mod commands;
mod renderer;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use everysize_core::config::CONFIG_FILE;
use everysize_core::model::Session;
use everysize_core::store::FileStorage;
use everysize_core::EverysizeConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

const APP_HOME_DIR: &str = ".everysize";
const STORAGE_FILE: &str = "storage.json";
const LOG_FILE: &str = "everysize.log";
const LOG_ENV: &str = "EVERYSIZE_LOG";

#[derive(Parser)]
#[command(name = "everysize", version, about = "Preview a page at many device sizes at once")]
struct Cli {
    /// Preview this URL, as if opened from a shared link. A URL already
    /// stored takes priority; use `set-url` to replace it.
    #[arg(long)]
    url: Option<String>,

    /// Storage file (default: ~/.everysize/storage.json).
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Config file (default: ~/.everysize/everysize.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Container width in pixels used by `grid`.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let storage_path = cli.storage.clone().unwrap_or_else(|| app_path(STORAGE_FILE));
    let interactive = cli.command.is_none();
    if interactive {
        init_file_logging(&storage_path.with_file_name(LOG_FILE))?;
    } else {
        init_stderr_logging();
    }

    let config_path = cli.config.clone().unwrap_or_else(|| app_path(CONFIG_FILE));
    let config = if cli.config.is_some() {
        EverysizeConfig::load(&config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))?
    } else {
        EverysizeConfig::load_or_default(&config_path)
    };

    let storage = FileStorage::open(&storage_path);
    let mut session = Session::open(storage, config, cli.url);

    match cli.command {
        Some(command) => {
            let mut out = io::stdout().lock();
            commands::run(&mut session, command, cli.width, &mut out)?;
            out.flush()?;
        }
        None => renderer::run_canvas(session)?,
    }
    Ok(())
}

fn app_path(file: &str) -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_HOME_DIR).join(file),
        None => PathBuf::from(file),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

/// The canvas owns the terminal, so log lines go to a file instead.
fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
