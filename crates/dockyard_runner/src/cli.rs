//! Subprocess-backed command runner.
//!
//! [`CliRunner`] spawns external programs with `tokio::process`, refusing
//! anything that is not on its allow-list and killing captured runs that
//! exceed their timeout.

use std::future::Future;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::compose::PROBE_TIMEOUT_SECONDS;
use crate::config::ExecOptions;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandRunner, CommandSpec, ExecutionResult};

/// Programs a default runner may spawn.
pub const DEFAULT_ALLOWED_COMMANDS: [&str; 4] = ["docker", "docker-compose", "podman", "podman-compose"];

/// CLI runner options.
#[derive(Debug, Clone)]
pub struct CliRunnerOptions {
    /// Program names that may be spawned
    pub allowed_commands: Vec<String>,
    /// Dry-run mode (log commands without executing)
    pub dry_run: bool,
}

impl Default for CliRunnerOptions {
    fn default() -> Self {
        Self {
            allowed_commands: DEFAULT_ALLOWED_COMMANDS.iter().map(|s| s.to_string()).collect(),
            dry_run: false,
        }
    }
}

impl CliRunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Replace the allow-list.
    pub fn allow_only<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_commands = commands.into_iter().map(Into::into).collect();
        self
    }
}

/// Subprocess command runner.
pub struct CliRunner {
    options: CliRunnerOptions,
}

impl CliRunner {
    pub fn new(options: CliRunnerOptions) -> Self {
        Self { options }
    }

    /// Check if dry-run mode is enabled.
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Reject programs outside the allow-list.
    ///
    /// Only bare program names are accepted, so `/tmp/docker` does not pass
    /// for `docker`.
    pub fn check_allowed(&self, program: &str) -> RunnerResult<()> {
        if self.options.allowed_commands.iter().any(|c| c == program) {
            Ok(())
        } else {
            warn!("Refusing to run {}: not in allow-list", program);
            Err(RunnerError::Forbidden(program.to_string()))
        }
    }

    fn build_command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.workdir {
            cmd.current_dir(dir);
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Await `fut`, giving up after `timeout_seconds` (0 = wait forever).
///
/// Children are spawned with `kill_on_drop`, so abandoning the future on
/// timeout also kills the process.
async fn bounded<F, T>(fut: F, timeout_seconds: u64) -> RunnerResult<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    if timeout_seconds == 0 {
        return Ok(fut.await?);
    }

    match tokio::time::timeout(Duration::from_secs(timeout_seconds), fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(RunnerError::Timeout(timeout_seconds)),
    }
}

#[async_trait]
impl CommandRunner for CliRunner {
    async fn is_available(&self, program: &str) -> bool {
        if self.check_allowed(program).is_err() {
            return false;
        }

        let mut cmd = Command::new(program);
        cmd.arg("version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        matches!(
            bounded(cmd.status(), PROBE_TIMEOUT_SECONDS).await,
            Ok(status) if status.success()
        )
    }

    async fn run(
        &self,
        command: &CommandSpec,
        options: &ExecOptions,
    ) -> RunnerResult<ExecutionResult> {
        self.check_allowed(&command.program)?;

        let cmd_str = command.to_string();
        debug!("Command: {} (in {:?})", cmd_str, command.workdir);

        if self.options.dry_run {
            info!("[DRY-RUN] Would execute: {}", cmd_str);
            return Ok(ExecutionResult {
                command: cmd_str.clone(),
                exit_code: 0,
                stdout: format!("[DRY-RUN] Command: {}", cmd_str),
                stderr: String::new(),
                started_at: Utc::now(),
                finished_at: Utc::now(),
                duration_ms: 0,
            });
        }

        let mut cmd = self.build_command(command);
        let spawn_err = |source| RunnerError::SpawnFailed {
            program: command.program.clone(),
            source,
        };

        let started_at = Utc::now();
        let (exit_code, stdout, stderr) = if options.stream_output {
            cmd.stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
            let mut child = cmd.spawn().map_err(spawn_err)?;
            let status = bounded(child.wait(), options.timeout_seconds).await?;
            (status.code().unwrap_or(-1) as i64, String::new(), String::new())
        } else {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let child = cmd.spawn().map_err(spawn_err)?;
            let output = bounded(child.wait_with_output(), options.timeout_seconds).await?;
            (
                output.status.code().unwrap_or(-1) as i64,
                String::from_utf8_lossy(&output.stdout).to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
        };
        let finished_at = Utc::now();
        let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

        if exit_code == 0 {
            debug!("{} completed in {}ms", command.program, duration_ms);
        } else {
            error!(
                "{} failed with exit code {} after {}ms",
                command.program, exit_code, duration_ms
            );
        }

        Ok(ExecutionResult {
            command: cmd_str,
            exit_code,
            stdout,
            stderr,
            started_at,
            finished_at,
            duration_ms,
        })
    }
}
