//! Modules command - List docked modules.

use anyhow::{Context, Result};
use clap::Args;

use dockyard_core::{Module, Orchestrator};

#[derive(Args)]
pub struct ModulesArgs {
    /// Print the modules as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ModulesArgs, orchestrator: &Orchestrator) -> Result<()> {
    let mut modules = orchestrator
        .list_modules()
        .context("Failed to list modules")?;
    modules.sort_by(|a, b| a.name.cmp(&b.name));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&modules)?);
        return Ok(());
    }

    if modules.is_empty() {
        println!("No modules docked yet");
        return Ok(());
    }

    println!("📦 Docked modules:\n");
    for module in &modules {
        println!("{}", describe(module));
    }
    Ok(())
}

fn describe(module: &Module) -> String {
    format!(
        "  {:<24} template: {:<16} vars: {}",
        module.name,
        module.template,
        module.env_config.len()
    )
}
