//! CLI command definitions.
//!
//! Each subcommand maps to one orchestrator operation. Global flags
//! override values from the configuration file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dockyard_core::{Configuration, Orchestrator};
use dockyard_runner::{CliRunner, CommandRunner, ComposeTool};
use thiserror::Error;
use tracing::{debug, warn};

pub mod backup;
pub mod dock;
pub mod down;
pub mod env_set;
pub mod list;
pub mod logs;
pub mod modules;
pub mod restart;
pub mod serve;
pub mod status;
pub mod templates;

/// Dockyard - Docker Compose module manager
#[derive(Parser)]
#[command(name = "dockyard")]
#[command(version, about = "Dockyard - instantiate and manage Docker Compose modules")]
#[command(long_about = r#"
Dockyard turns compose templates into named modules: each module gets its own
directory with a copied docker-compose.yml and a resolved .env, and runs as
its own compose project.

COMMANDS:
  dock       → Create a module from a template and start it
  list       → Show running containers
  logs       → Follow (or tail) a module's logs
  down       → Stop a module's containers
  restart    → Stop and start a module
  templates  → List available templates
  modules    → List docked modules
  status     → Show whether a module's containers are running
  env-set    → Set one variable in a module's .env
  backup     → Back up a module's compose file and .env
  restore    → Restore a module's files from a backup
  backups    → List a module's backups
  serve      → Run the HTTP API

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Not found
  4 - Compose tool failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to ./dockyard.toml when present)
    #[arg(short, long, global = true, env = "DOCKYARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Templates directory
    #[arg(long, global = true, env = "DOCKYARD_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Directory holding docked modules
    #[arg(long, global = true, env = "DOCKYARD_COMPOSE_DIR")]
    pub compose_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Print compose commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a module from a template and start it
    Dock(dock::DockArgs),

    /// List running containers
    List,

    /// Follow a module's logs
    Logs(logs::LogsArgs),

    /// Stop and remove a module's containers
    Down(ModuleArgs),

    /// Restart a module (down, then up)
    Restart(ModuleArgs),

    /// List available templates
    Templates,

    /// List docked modules
    Modules(modules::ModulesArgs),

    /// Show whether a module's containers are running
    Status(ModuleArgs),

    /// Set one variable in a module's .env
    #[command(name = "env-set")]
    EnvSet(env_set::EnvSetArgs),

    /// Back up a module's compose file and .env
    Backup(ModuleArgs),

    /// Restore a module's files from a backup
    Restore(backup::RestoreArgs),

    /// List a module's backups
    Backups(ModuleArgs),

    /// Serve the HTTP API
    Serve(serve::ServeArgs),
}

/// Arguments for commands that act on a single module.
#[derive(Args)]
pub struct ModuleArgs {
    /// Module name
    pub name: String,
}

/// Invalid command-line input detected after parsing.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Build the configuration from the config file and global flags.
pub fn configuration(global: &GlobalArgs) -> Result<Configuration> {
    let mut config = Configuration::discover(global.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(dir) = &global.templates_dir {
        config = config.templates_dir(dir);
    }
    if let Some(dir) = &global.compose_dir {
        config = config.compose_dir(dir);
    }

    debug!("Configuration: {:?}", config);
    Ok(config)
}

/// Fill in the compose tool when the configuration leaves it unset.
///
/// Detection probes through `runner`, so only allowed programs are tried.
pub async fn with_detected_tool(
    config: Configuration,
    runner: &dyn CommandRunner,
) -> Configuration {
    if config.compose_tool.is_some() {
        return config;
    }

    match ComposeTool::detect(runner, None).await {
        Some(tool) => config.compose_tool(tool),
        None => {
            warn!("No compose tool detected, falling back to docker compose");
            config
        }
    }
}

/// Build an orchestrator backed by the real process runner.
pub async fn orchestrator(global: &GlobalArgs) -> Result<Orchestrator> {
    let mut config = configuration(global)?;

    let mut options = config.runner_options();
    if global.dry_run {
        options = options.dry_run();
    }
    let runner = CliRunner::new(options);

    // a dry run spawns nothing, so there is nothing to probe
    if !global.dry_run {
        config = with_detected_tool(config, &runner).await;
    }

    Ok(Orchestrator::new(Arc::new(config), Arc::new(runner)))
}
