//! Module data model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dockyard_templates::ResolvedEnvironment;
use serde::{Deserialize, Serialize};

/// Template name reported when a module cannot be attributed.
pub const UNKNOWN_TEMPLATE: &str = "unknown";

/// Runtime state of a module's containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Running,
    Stopped,
    #[default]
    Unknown,
}

impl std::fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A docked module as found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    /// Best-effort template attribution, or [`UNKNOWN_TEMPLATE`]
    pub template: String,
    pub env_config: ResolvedEnvironment,
    pub status: ModuleStatus,
}

impl Module {
    pub fn has_known_template(&self) -> bool {
        self.template != UNKNOWN_TEMPLATE
    }
}

/// Docking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub name: String,
    pub template: String,
    /// Pre-supplied environment; when set, template resolution is skipped
    #[serde(default, alias = "envVars", skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<BTreeMap<String, String>>,
}

impl ModuleConfig {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            env_vars: None,
        }
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// The pre-supplied environment, if any, ordered by key.
    pub fn environment(&self) -> Option<ResolvedEnvironment> {
        self.env_vars
            .as_ref()
            .map(|vars| vars.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect())
    }
}

/// Outcome of a successful dock.
#[derive(Debug, Clone, Serialize)]
pub struct DockReport {
    pub module: String,
    pub template: String,
    pub module_dir: PathBuf,
    pub env: ResolvedEnvironment,
    /// Combined output of `up -d`
    pub output: String,
}

/// A stored copy of a module's files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupInfo {
    pub module: String,
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
}
