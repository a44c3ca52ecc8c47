//! List command - Show running containers.

use anyhow::{Context, Result};

use dockyard_core::Orchestrator;

pub async fn execute(orchestrator: &Orchestrator) -> Result<()> {
    orchestrator
        .list()
        .await
        .context("Failed to list running containers")
}
