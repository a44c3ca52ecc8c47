//! Env-set command - Update one variable in a module's .env.

use anyhow::{Context, Result};
use clap::Args;

use dockyard_core::Orchestrator;

#[derive(Args)]
pub struct EnvSetArgs {
    /// Module name
    pub name: String,

    /// Variable name
    pub key: String,

    /// New value
    pub value: String,
}

pub fn execute(args: EnvSetArgs, orchestrator: &Orchestrator) -> Result<()> {
    orchestrator
        .update_env_var(&args.name, &args.key, &args.value)
        .with_context(|| format!("Failed to update {} in module {}", args.key, args.name))?;

    println!("✅ {}={} set for module {}", args.key, args.value, args.name);
    println!("   Run `dockyard restart {}` to apply it", args.name);
    Ok(())
}
