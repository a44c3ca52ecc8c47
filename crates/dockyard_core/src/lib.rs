//! # dockyard_core
//!
//! Module repository and lifecycle orchestration for Dockyard.
//!
//! A module is a directory under the compose directory holding a copy of a
//! template's `docker-compose.yml` and a resolved `.env`. The
//! [`Orchestrator`] creates modules from templates and drives their
//! containers through the compose tool:
//!
//! - **dock**: copy the template, resolve its environment, `up -d`
//! - **list**: show running containers
//! - **logs**: follow (or tail) a module's logs
//! - **down** / **restart**: stop, or stop then start again
//! - **status**, **update_env_var**, **backup** / **restore**
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use dockyard_core::{Configuration, ModuleConfig, Orchestrator};
//! use dockyard_runner::CliRunner;
//! use dockyard_templates::StdinValueSource;
//!
//! # async fn run() -> Result<(), dockyard_core::CoreError> {
//! let config = Arc::new(Configuration::default());
//! let runner = Arc::new(CliRunner::new(config.runner_options()));
//! let orchestrator = Orchestrator::new(config, runner);
//!
//! let request = ModuleConfig::new("blog", "wordpress");
//! orchestrator.dock(&request, &mut StdinValueSource::stdin()).await?;
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod repository;

pub use backup::BackupStore;
pub use config::{Configuration, ServerConfig, DEFAULT_CONFIG_FILE};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use lifecycle::Orchestrator;
pub use models::{BackupInfo, DockReport, Module, ModuleConfig, ModuleStatus, UNKNOWN_TEMPLATE};
pub use repository::ModuleRepository;
