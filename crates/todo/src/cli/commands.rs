//! # CLI Layer
//!
//! The only place in the workspace that:
//! - Knows about stdout and stderr
//! - Installs the tracing subscriber
//! - Reads process arguments and environment for settings
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: typed commands via clap ([`super::setup`])
//! 2. **Setup**: logging, data directory, configuration, store
//! 3. **Dispatch**: one [`TodoApi`] call per command
//! 4. **Output**: rendered by [`super::render`]

use super::render::render_result;
use super::setup::{parse_cli, Cli, Commands};
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use todoapp::api::{CmdResult, TodoApi};
use todoapp::config::{default_data_dir, TodoConfig};
use todoapp::init::open_store;
use tracing_subscriber::EnvFilter;

pub const DATA_DIR_ENV: &str = "TODO_DATA_DIR";

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let data_dir = resolve_data_dir(&cli)?;
    let config = resolve_config(&cli, &data_dir)?;
    tracing::debug!(
        backend = %config.backend,
        data_dir = %data_dir.display(),
        "resolved configuration"
    );

    let api = TodoApi::new(open_store(&config, &data_dir)?);

    // Naked `todo` lists everything
    let command = cli
        .command
        .clone()
        .unwrap_or(Commands::List { status: None });
    let result = dispatch(&api, &command)?;
    print!("{}", render_result(&command, &result, cli.json)?);
    Ok(())
}

/// Logs go to stderr. `-v` raises the default level to debug; `RUST_LOG`
/// overrides both.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    cli.data_dir
        .clone()
        .or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .or_else(default_data_dir)
        .context("no data directory found; pass --data or set TODO_DATA_DIR")
}

fn resolve_config(cli: &Cli, data_dir: &Path) -> Result<TodoConfig> {
    let mut config = TodoConfig::load(data_dir)?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

fn apply_overrides(config: &mut TodoConfig, cli: &Cli) {
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(file) = &cli.file {
        config.file = Some(file.clone());
    }
    if let Some(namespace) = &cli.namespace {
        config.namespace = namespace.clone();
    }
    if let Some(url) = &cli.redis_url {
        config.redis_url = url.clone();
    }
}

fn dispatch(api: &TodoApi, command: &Commands) -> todoapp::error::Result<CmdResult> {
    match command {
        Commands::Add { data, status } => api.add(data.clone(), status.as_deref()),
        Commands::List { status: Some(status) } => api.list_by_status(status),
        Commands::List { status: None } => api.list(),
        Commands::Get { id } => api.get(id),
        Commands::Update { id, data } => api.update_data(id, data),
        Commands::Status { id, status } => api.update_status(id, status),
        Commands::Rm { id } => api.remove(id),
    }
}
