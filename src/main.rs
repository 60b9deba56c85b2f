//! Jumpbox - terminal menu for connecting to network devices
//!
//! Loads the configuration, builds the device menu from the configured
//! directory and runs it until the operator leaves the main menu.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use jumpbox::bootstrap::{Connector, build_menu};
use jumpbox::directory::open_directory;
use jumpbox::session::{SessionLauncher, SshLauncher};
use jumpbox::tui::{CrosstermTerminal, MenuApp};
use jumpbox::{Cli, Config};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let exe_dir = get_executable_dir()?;

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| get_log_path(&exe_dir));
    // The terminal belongs to the menu, so logs only go to the file
    let _guard = setup_file_only_logging(&cli, &log_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_path.display(),
        "Jumpbox starting"
    );

    let config = load_config(&cli, &exe_dir)?;
    let directory = open_directory(&config.directory)?;
    let launcher: Rc<dyn SessionLauncher> = Rc::new(SshLauncher::new(
        config.session.command.clone(),
        config.session.args.clone(),
    ));
    let connector = Connector::new(launcher, config.session.username.clone());
    let (tree, root) = build_menu(directory, connector, &config.menu)?;

    let terminal = CrosstermTerminal::new().context("Failed to initialise the terminal")?;
    let mut app = MenuApp::new(terminal, tree);
    let outcome = app.run(root);
    app.into_terminal().restore();

    let returned = outcome?;
    info!(?returned, "Jumpbox finished");
    Ok(())
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Timestamped log file in the Log directory next to the executable
fn get_log_path(exe_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    exe_dir
        .join("Log")
        .join(format!("Jumpbox_{}.log", timestamp))
}

/// Load configuration from file and apply CLI overrides
fn load_config(cli: &Cli, exe_dir: &Path) -> Result<Config> {
    let (file_config, source) = Config::resolve(cli.config.as_deref(), Some(exe_dir))?;
    match source {
        Some(path) => info!(config_file = %path.display(), "Loaded configuration"),
        None => info!("No configuration file, using defaults"),
    }

    let config = cli.merge_with_config(file_config);
    config.validate()?;
    Ok(config)
}

/// Setup file-only logging, nothing is written to the console
fn setup_file_only_logging(cli: &Cli, log_path: &Path) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}
