//! Dock command - Instantiate a template as a module and start it.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dockyard_core::{ModuleConfig, Orchestrator};
use dockyard_templates::StdinValueSource;

use super::UsageError;

#[derive(Args)]
pub struct DockArgs {
    /// Module name (also the compose project name)
    #[arg(short, long)]
    pub name: String,

    /// Template to instantiate
    #[arg(short, long)]
    pub template: String,

    /// Write KEY=VALUE to the module's .env instead of prompting (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

pub async fn execute(args: DockArgs, orchestrator: &Orchestrator) -> Result<()> {
    let mut request = ModuleConfig::new(&args.name, &args.template);
    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        request = request.with_env_var(key, value);
    }

    if request.env_vars.is_none() {
        info!("Resolving placeholders for template {}", args.template);
    }

    let mut source = StdinValueSource::stdin();
    let report = orchestrator
        .dock(&request, &mut source)
        .await
        .with_context(|| format!("Failed to dock module {}", args.name))?;

    println!("✅ Module {} docked from template {}", report.module, report.template);
    println!("   Directory: {}", report.module_dir.display());
    if !report.output.trim().is_empty() {
        println!();
        println!("{}", report.output.trim_end());
    }

    Ok(())
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str), UsageError> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(UsageError(format!(
            "Invalid --set value {:?}: expected KEY=VALUE",
            assignment
        ))),
    }
}
