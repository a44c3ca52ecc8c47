//! Compose tool flavours and command construction.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ExecOptions;
use crate::runner::{CommandRunner, CommandSpec};

/// Timeout for each `version` probe during detection.
pub const PROBE_TIMEOUT_SECONDS: u64 = 10;

/// The compose-capable CLI used to drive modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComposeTool {
    /// `docker compose` (v2 plugin)
    #[default]
    DockerPlugin,
    /// Standalone `docker-compose`
    DockerStandalone,
    /// `podman compose`
    PodmanPlugin,
    /// Standalone `podman-compose`
    PodmanStandalone,
}

impl ComposeTool {
    pub const ALL: [ComposeTool; 4] = [
        Self::DockerPlugin,
        Self::DockerStandalone,
        Self::PodmanPlugin,
        Self::PodmanStandalone,
    ];

    /// Program to spawn.
    pub fn program(&self) -> &'static str {
        match self {
            Self::DockerPlugin => "docker",
            Self::DockerStandalone => "docker-compose",
            Self::PodmanPlugin => "podman",
            Self::PodmanStandalone => "podman-compose",
        }
    }

    /// Container engine CLI behind this tool.
    pub fn engine(&self) -> &'static str {
        match self {
            Self::DockerPlugin | Self::DockerStandalone => "docker",
            Self::PodmanPlugin | Self::PodmanStandalone => "podman",
        }
    }

    fn base_command(&self) -> CommandSpec {
        let command = CommandSpec::new(self.program());
        match self {
            Self::DockerPlugin | Self::PodmanPlugin => command.arg("compose"),
            Self::DockerStandalone | Self::PodmanStandalone => command,
        }
    }

    /// Build `<compose> -p <project> <args...>` running inside `workdir`.
    pub fn project_command<I, S>(
        &self,
        project: &str,
        args: I,
        workdir: impl Into<PathBuf>,
    ) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_command()
            .arg("-p")
            .arg(project)
            .args(args)
            .workdir(workdir)
    }

    /// Build the engine's `ps` command listing running containers.
    pub fn ps_command(&self) -> CommandSpec {
        CommandSpec::new(self.engine()).arg("ps")
    }

    /// `<compose> version`, used to probe for the tool.
    pub fn version_command(&self) -> CommandSpec {
        self.base_command().arg("version")
    }

    /// Find a working compose tool, preferring `preferred`.
    ///
    /// Probes go through `runner`, so programs outside its allow-list are
    /// never spawned and each probe is bounded by [`PROBE_TIMEOUT_SECONDS`].
    pub async fn detect(
        runner: &dyn CommandRunner,
        preferred: Option<ComposeTool>,
    ) -> Option<ComposeTool> {
        if let Some(tool) = preferred {
            if tool.probe(runner).await {
                return Some(tool);
            }
            warn!("Preferred compose tool {} not available, trying alternatives", tool);
        }

        for tool in Self::ALL {
            if Some(tool) != preferred && tool.probe(runner).await {
                info!("Using compose tool: {}", tool);
                return Some(tool);
            }
        }
        None
    }

    async fn probe(&self, runner: &dyn CommandRunner) -> bool {
        if !runner.is_available(self.program()).await {
            debug!("{} not available", self.program());
            return false;
        }

        let options = ExecOptions::new().timeout(PROBE_TIMEOUT_SECONDS);
        match runner.run(&self.version_command(), &options).await {
            Ok(result) => result.success(),
            Err(e) => {
                debug!("Probe for {} failed: {}", self, e);
                false
            }
        }
    }
}

impl std::fmt::Display for ComposeTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DockerPlugin => write!(f, "docker compose"),
            Self::DockerStandalone => write!(f, "docker-compose"),
            Self::PodmanPlugin => write!(f, "podman compose"),
            Self::PodmanStandalone => write!(f, "podman-compose"),
        }
    }
}

impl std::str::FromStr for ComposeTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "docker compose" | "docker-plugin" | "docker" => Ok(Self::DockerPlugin),
            "docker-compose" | "docker-standalone" => Ok(Self::DockerStandalone),
            "podman compose" | "podman-plugin" | "podman" => Ok(Self::PodmanPlugin),
            "podman-compose" | "podman-standalone" => Ok(Self::PodmanStandalone),
            other => Err(format!("unknown compose tool: {}", other)),
        }
    }
}
