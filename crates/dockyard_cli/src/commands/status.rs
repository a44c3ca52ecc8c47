//! Status command - Ask the compose tool whether a module is running.

use anyhow::{Context, Result};

use dockyard_core::{ModuleStatus, Orchestrator};

use super::ModuleArgs;

pub async fn execute(args: ModuleArgs, orchestrator: &Orchestrator) -> Result<()> {
    let status = orchestrator
        .status(&args.name)
        .await
        .with_context(|| format!("Failed to query status of module {}", args.name))?;

    let icon = match status {
        ModuleStatus::Running => "🟢",
        ModuleStatus::Stopped => "🔴",
        ModuleStatus::Unknown => "⚪",
    };
    println!("{} {}: {}", icon, args.name, status);
    Ok(())
}
