//! Templates command - List available templates.

use anyhow::{Context, Result};

use dockyard_core::Orchestrator;

pub fn execute(orchestrator: &Orchestrator) -> Result<()> {
    let mut templates = orchestrator
        .list_templates()
        .context("Failed to list templates")?;
    templates.sort();

    if templates.is_empty() {
        println!(
            "⚠️  No templates found in {}",
            orchestrator.config().templates_dir.display()
        );
        return Ok(());
    }

    println!("📋 Available templates:\n");
    for name in templates {
        println!("  {}", name);
    }
    Ok(())
}
