//! Down command - Stop a module's containers. Files are kept.

use anyhow::{Context, Result};

use dockyard_core::Orchestrator;

use super::ModuleArgs;

pub async fn execute(args: ModuleArgs, orchestrator: &Orchestrator) -> Result<()> {
    let result = orchestrator
        .down(&args.name)
        .await
        .with_context(|| format!("Failed to stop module {}", args.name))?;

    let output = result.combined_output();
    if !output.trim().is_empty() {
        println!("{}", output.trim_end());
    }
    println!("✅ Module {} stopped", args.name);
    Ok(())
}
