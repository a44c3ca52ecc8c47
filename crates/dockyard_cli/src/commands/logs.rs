//! Logs command - Follow or tail a module's logs.

use anyhow::{Context, Result};
use clap::Args;

use dockyard_core::Orchestrator;

#[derive(Args)]
pub struct LogsArgs {
    /// Module name
    pub name: String,

    /// Print the last N lines and exit instead of following
    #[arg(long, value_name = "N")]
    pub tail: Option<usize>,
}

pub async fn execute(args: LogsArgs, orchestrator: &Orchestrator) -> Result<()> {
    match args.tail {
        Some(tail) => {
            let output = orchestrator
                .logs_tail(&args.name, tail)
                .await
                .with_context(|| format!("Failed to read logs of module {}", args.name))?;
            println!("{}", output.trim_end());
        }
        None => orchestrator
            .logs(&args.name)
            .await
            .with_context(|| format!("Failed to follow logs of module {}", args.name))?,
    }
    Ok(())
}
