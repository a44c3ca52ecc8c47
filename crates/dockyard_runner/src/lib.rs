//! # dockyard_runner
//!
//! Process execution layer for Dockyard.
//!
//! Every external tool invocation made by Dockyard goes through a
//! [`CommandRunner`]. The production implementation, [`CliRunner`], only
//! spawns programs named in its allow-list and bounds every call with a
//! timeout.
//!
//! # Features
//!
//! - **Allow-list**: programs outside the list fail with [`RunnerError::Forbidden`]
//! - **Timeouts**: captured runs are killed after [`ExecOptions::timeout_seconds`]
//! - **Streaming**: follow-mode commands inherit the terminal
//! - **Compose tools**: `docker compose`, `docker-compose`, `podman compose`, `podman-compose`
//! - **Dry-Run Mode**: log commands without executing them
//! - **Mock Runner**: for testing without a container runtime
//!
//! # Example
//!
//! ```rust,no_run
//! use dockyard_runner::{CliRunner, CliRunnerOptions, CommandRunner, ComposeTool, ExecOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = CliRunner::new(CliRunnerOptions::default());
//!
//!     let command = ComposeTool::DockerPlugin.project_command("web", ["up", "-d"], "compose/web");
//!     let result = runner.run(&command, &ExecOptions::default()).await?;
//!     println!("Exit code: {}", result.exit_code);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod compose;
pub mod config;
pub mod error;
pub mod mock;
pub mod runner;

pub use cli::{CliRunner, CliRunnerOptions, DEFAULT_ALLOWED_COMMANDS};
pub use compose::{ComposeTool, PROBE_TIMEOUT_SECONDS};
pub use config::ExecOptions;
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockResponse, MockRunner};
pub use runner::{CommandRunner, CommandSpec, ExecutionResult};
