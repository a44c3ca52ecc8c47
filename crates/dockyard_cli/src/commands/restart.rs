//! Restart command - Stop then start a module.

use anyhow::{Context, Result};

use dockyard_core::Orchestrator;

use super::ModuleArgs;

pub async fn execute(args: ModuleArgs, orchestrator: &Orchestrator) -> Result<()> {
    let result = orchestrator
        .restart(&args.name)
        .await
        .with_context(|| format!("Failed to restart module {}", args.name))?;

    let output = result.combined_output();
    if !output.trim().is_empty() {
        println!("{}", output.trim_end());
    }
    println!("✅ Module {} restarted", args.name);
    Ok(())
}
