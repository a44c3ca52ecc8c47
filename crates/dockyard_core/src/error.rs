//! Error types for the core module.

use dockyard_runner::RunnerError;
use dockyard_templates::TemplateError;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur during core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Backup not found: {module}/{backup}")]
    BackupNotFound { module: String, backup: String },

    #[error("Invalid environment key: {0:?}")]
    InvalidEnvKey(String),

    #[error("Invalid value for environment key {0}: line breaks and trailing whitespace are not allowed")]
    InvalidEnvValue(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("Copy failed: {0}")]
    Copy(#[from] fs_extra::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error categories for boundary adapters (exit codes, HTTP statuses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    ExternalTool,
    Timeout,
    Forbidden,
    Io,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ModuleNotFound(_) | Self::BackupNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidEnvKey(_) | Self::InvalidEnvValue(_) | Self::Config(_) => {
                ErrorKind::InvalidInput
            }
            Self::Template(e) => match e {
                TemplateError::NotFound(_) | TemplateError::MissingEnvTemplate(_) => {
                    ErrorKind::NotFound
                }
                TemplateError::InvalidName { .. } => ErrorKind::InvalidInput,
                TemplateError::Input { .. } | TemplateError::Walk(_) | TemplateError::Io(_) => {
                    ErrorKind::Io
                }
            },
            Self::Runner(e) => match e {
                RunnerError::Forbidden(_) => ErrorKind::Forbidden,
                RunnerError::Timeout(_) => ErrorKind::Timeout,
                RunnerError::CommandFailed { .. }
                | RunnerError::SpawnFailed { .. }
                | RunnerError::ExecutionFailed(_) => ErrorKind::ExternalTool,
                RunnerError::Io(_) => ErrorKind::Io,
            },
            Self::Copy(_) | Self::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
