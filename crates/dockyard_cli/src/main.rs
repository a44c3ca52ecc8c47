//! Dockyard CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Module, template or backup not found
//! - 4: Compose tool failure (non-zero exit, timeout or refused program)

use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dockyard_core::{CoreError, ErrorKind};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands, UsageError};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const NOT_FOUND: u8 = 3;
    pub const TOOL_FAILURE: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {:#}", e);
        return ExitCode::from(ExitCodes::INVALID_ARGS);
    }

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let orchestrator = commands::orchestrator(&cli.global).await?;

    match cli.command {
        Commands::Dock(args) => commands::dock::execute(args, &orchestrator).await,
        Commands::List => commands::list::execute(&orchestrator).await,
        Commands::Logs(args) => commands::logs::execute(args, &orchestrator).await,
        Commands::Down(args) => commands::down::execute(args, &orchestrator).await,
        Commands::Restart(args) => commands::restart::execute(args, &orchestrator).await,
        Commands::Templates => commands::templates::execute(&orchestrator),
        Commands::Modules(args) => commands::modules::execute(args, &orchestrator),
        Commands::Status(args) => commands::status::execute(args, &orchestrator).await,
        Commands::EnvSet(args) => commands::env_set::execute(args, &orchestrator),
        Commands::Backup(args) => commands::backup::backup(args, &orchestrator),
        Commands::Restore(args) => commands::backup::restore(args, &orchestrator),
        Commands::Backups(args) => commands::backup::list(args, &orchestrator),
        Commands::Serve(args) => commands::serve::execute(args, Arc::new(orchestrator)).await,
    }
}

/// Install the tracing subscriber. Logs go to stderr, and additionally to
/// `log_file` when given.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> std::io::Result<()> {
    let default_directive = if verbose {
        "warn,dockyard=debug"
    } else {
        "warn,dockyard=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .try_init();

    Ok(())
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.chain().any(|cause| cause.is::<UsageError>()) {
        return ExitCodes::INVALID_ARGS;
    }

    let kind = e
        .chain()
        .find_map(|cause| cause.downcast_ref::<CoreError>())
        .map(CoreError::kind);

    match kind {
        Some(ErrorKind::NotFound) => ExitCodes::NOT_FOUND,
        Some(ErrorKind::InvalidInput) => ExitCodes::INVALID_ARGS,
        Some(ErrorKind::ExternalTool | ErrorKind::Timeout | ErrorKind::Forbidden) => {
            ExitCodes::TOOL_FAILURE
        }
        Some(ErrorKind::Io) | None => ExitCodes::GENERAL_ERROR,
    }
}
