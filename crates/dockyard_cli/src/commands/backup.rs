//! Backup, restore and backups commands.

use anyhow::{Context, Result};
use clap::Args;

use dockyard_core::Orchestrator;

use super::ModuleArgs;

#[derive(Args)]
pub struct RestoreArgs {
    /// Module name
    pub name: String,

    /// Backup name as printed by `dockyard backups`
    pub backup: String,
}

pub fn backup(args: ModuleArgs, orchestrator: &Orchestrator) -> Result<()> {
    let info = orchestrator
        .backup(&args.name)
        .with_context(|| format!("Failed to back up module {}", args.name))?;

    println!("✅ Backup {} created", info.name);
    println!("   Path: {}", info.path.display());
    Ok(())
}

pub fn restore(args: RestoreArgs, orchestrator: &Orchestrator) -> Result<()> {
    orchestrator
        .restore(&args.name, &args.backup)
        .with_context(|| format!("Failed to restore module {} from {}", args.name, args.backup))?;

    println!("✅ Module {} restored from {}", args.name, args.backup);
    Ok(())
}

pub fn list(args: ModuleArgs, orchestrator: &Orchestrator) -> Result<()> {
    let backups = orchestrator
        .list_backups(&args.name)
        .with_context(|| format!("Failed to list backups of module {}", args.name))?;

    if backups.is_empty() {
        println!("No backups for module {}", args.name);
        return Ok(());
    }

    for info in backups {
        match info.created_at {
            Some(at) => println!("  {}  ({})", info.name, at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("  {}", info.name),
        }
    }
    Ok(())
}
