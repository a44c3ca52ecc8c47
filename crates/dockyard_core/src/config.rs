//! Process-wide configuration.
//!
//! Built once at startup (defaults, then an optional TOML file, then CLI
//! overrides) and passed by reference into every component.

use std::fs;
use std::path::{Path, PathBuf};

use dockyard_runner::{CliRunnerOptions, ComposeTool, ExecOptions, DEFAULT_ALLOWED_COMMANDS};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreResult;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dockyard.toml";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_path: "/api".to_string(),
        }
    }
}

/// Dockyard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Root of template directories
    pub templates_dir: PathBuf,
    /// Root of module directories
    pub compose_dir: PathBuf,
    /// Root of module backups
    pub backups_dir: PathBuf,
    /// Compose tool; `None` means detect at startup
    pub compose_tool: Option<ComposeTool>,
    /// Timeout for captured external commands (seconds)
    pub command_timeout_secs: u64,
    /// Programs the executor may spawn
    pub allowed_commands: Vec<String>,
    pub server: ServerConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            compose_dir: PathBuf::from("compose"),
            backups_dir: PathBuf::from("backups"),
            compose_tool: None,
            command_timeout_secs: dockyard_runner::config::DEFAULT_TIMEOUT_SECONDS,
            allowed_commands: DEFAULT_ALLOWED_COMMANDS.iter().map(|s| s.to_string()).collect(),
            server: ServerConfig::default(),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML configuration. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> CoreResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        debug!("Loading configuration from {:?}", path);
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load `path` if given, else `dockyard.toml` if it exists, else defaults.
    pub fn discover(path: Option<&Path>) -> CoreResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    pub fn compose_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.compose_dir = dir.into();
        self
    }

    pub fn backups_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backups_dir = dir.into();
        self
    }

    pub fn compose_tool(mut self, tool: ComposeTool) -> Self {
        self.compose_tool = Some(tool);
        self
    }

    pub fn command_timeout(mut self, seconds: u64) -> Self {
        self.command_timeout_secs = seconds;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Directory of module `name`.
    pub fn module_dir(&self, name: &str) -> PathBuf {
        self.compose_dir.join(name)
    }

    /// Options for captured (bounded) invocations.
    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions::default().timeout(self.command_timeout_secs)
    }

    /// Executor options carrying the allow-list.
    pub fn runner_options(&self) -> CliRunnerOptions {
        CliRunnerOptions::new().allow_only(self.allowed_commands.iter().cloned())
    }
}
