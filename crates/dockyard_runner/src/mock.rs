//! Mock command runner for testing.
//!
//! Provides a configurable implementation of the [`CommandRunner`] trait
//! for use in tests without requiring Docker or Podman.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::config::ExecOptions;
use crate::error::{RunnerError, RunnerResult};
use crate::runner::{CommandRunner, CommandSpec, ExecutionResult};

/// Predefined mock response for a command execution.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl MockResponse {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            duration_ms: 100,
        }
    }

    pub fn failure(exit_code: i64, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration_ms: 100,
        }
    }

    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone)]
pub struct CapturedCall {
    pub program: String,
    pub args: Vec<String>,
    pub workdir: Option<PathBuf>,
    pub options: ExecOptions,
}

impl CapturedCall {
    /// Arguments joined with spaces, for terse assertions.
    pub fn args_line(&self) -> String {
        self.args.join(" ")
    }
}

/// Mock command runner.
///
/// Captures all calls and replays predefined responses in order. Once the
/// list is exhausted the last response repeats; with no responses every
/// call succeeds with empty output.
#[derive(Clone)]
pub struct MockRunner {
    responses: Arc<RwLock<Vec<MockResponse>>>,
    response_index: Arc<AtomicUsize>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    unavailable: Arc<RwLock<Vec<String>>>,
    simulate_error: Arc<RwLock<Option<SimulatedError>>>,
}

#[derive(Debug, Clone)]
enum SimulatedError {
    Timeout(u64),
    Forbidden,
    Failure(String),
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(Vec::new())),
            response_index: Arc::new(AtomicUsize::new(0)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
            unavailable: Arc::new(RwLock::new(Vec::new())),
            simulate_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a mock response for the next run call.
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.write().push(response);
        self
    }

    /// Set multiple responses.
    pub fn with_responses(self, responses: Vec<MockResponse>) -> Self {
        *self.responses.write() = responses;
        self
    }

    /// Report `program` as unavailable.
    pub fn set_unavailable(self, program: impl Into<String>) -> Self {
        self.unavailable.write().push(program.into());
        self
    }

    /// Fail every run with [`RunnerError::ExecutionFailed`].
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_error.write() = Some(SimulatedError::Failure(message.into()));
        self
    }

    /// Fail every run with [`RunnerError::Timeout`].
    pub fn simulate_timeout(self, seconds: u64) -> Self {
        *self.simulate_error.write() = Some(SimulatedError::Timeout(seconds));
        self
    }

    /// Fail every run with [`RunnerError::Forbidden`].
    pub fn simulate_forbidden(self) -> Self {
        *self.simulate_error.write() = Some(SimulatedError::Forbidden);
        self
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    /// Get all captured calls.
    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Get calls whose argument line contains `needle`.
    pub fn calls_containing(&self, needle: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.args_line().contains(needle))
            .cloned()
            .collect()
    }

    fn next_response(&self) -> MockResponse {
        let responses = self.responses.read();
        if responses.is_empty() {
            return MockResponse::success("");
        }
        let index = self.response_index.fetch_add(1, Ordering::SeqCst);
        responses
            .get(index.min(responses.len() - 1))
            .cloned()
            .unwrap_or_else(|| MockResponse::success(""))
    }

    fn check_error(&self, program: &str) -> RunnerResult<()> {
        match self.simulate_error.read().clone() {
            Some(SimulatedError::Timeout(secs)) => Err(RunnerError::Timeout(secs)),
            Some(SimulatedError::Forbidden) => Err(RunnerError::Forbidden(program.to_string())),
            Some(SimulatedError::Failure(msg)) => Err(RunnerError::ExecutionFailed(msg)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn is_available(&self, program: &str) -> bool {
        !self.unavailable.read().iter().any(|p| p == program)
    }

    async fn run(
        &self,
        command: &CommandSpec,
        options: &ExecOptions,
    ) -> RunnerResult<ExecutionResult> {
        self.captured_calls.write().push(CapturedCall {
            program: command.program.clone(),
            args: command.args.clone(),
            workdir: command.workdir.clone(),
            options: options.clone(),
        });

        self.check_error(&command.program)?;

        let response = self.next_response();
        let started_at = Utc::now();
        let finished_at = started_at + chrono::Duration::milliseconds(response.duration_ms as i64);

        Ok(ExecutionResult {
            command: command.to_string(),
            exit_code: response.exit_code,
            stdout: response.stdout,
            stderr: response.stderr,
            started_at,
            finished_at,
            duration_ms: response.duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose_up() -> CommandSpec {
        CommandSpec::new("docker")
            .args(["compose", "-p", "web", "up", "-d"])
            .workdir("compose/web")
    }

    #[tokio::test]
    async fn test_mock_runner_basic() {
        let runner = MockRunner::new().add_response(MockResponse::success("started"));

        let result = runner.run(&compose_up(), &ExecOptions::default()).await.unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "started");
    }

    #[tokio::test]
    async fn test_mock_runner_captures_calls() {
        let runner = MockRunner::new();

        let _ = runner.run(&compose_up(), &ExecOptions::default().timeout(10)).await;

        let calls = runner.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "docker");
        assert_eq!(calls[0].args_line(), "compose -p web up -d");
        assert_eq!(calls[0].workdir, Some(PathBuf::from("compose/web")));
        assert_eq!(calls[0].options.timeout_seconds, 10);
    }

    #[tokio::test]
    async fn test_mock_runner_sequential_responses_repeat_last() {
        let runner = MockRunner::new().with_responses(vec![
            MockResponse::success("first"),
            MockResponse::failure(1, "second failed"),
        ]);

        let options = ExecOptions::default();
        let r1 = runner.run(&compose_up(), &options).await.unwrap();
        let r2 = runner.run(&compose_up(), &options).await.unwrap();
        let r3 = runner.run(&compose_up(), &options).await.unwrap();

        assert_eq!(r1.stdout, "first");
        assert_eq!(r2.exit_code, 1);
        assert_eq!(r3.stderr, "second failed");
    }

    #[tokio::test]
    async fn test_mock_runner_simulated_errors() {
        let runner = MockRunner::new().simulate_timeout(5);
        let result = runner.run(&compose_up(), &ExecOptions::default()).await;
        assert!(matches!(result, Err(RunnerError::Timeout(5))));
        assert_eq!(runner.call_count(), 1);

        let runner = MockRunner::new().simulate_forbidden();
        let result = runner.run(&compose_up(), &ExecOptions::default()).await;
        assert!(matches!(result, Err(RunnerError::Forbidden(p)) if p == "docker"));
    }

    #[tokio::test]
    async fn test_mock_runner_availability() {
        let runner = MockRunner::new().set_unavailable("podman");

        assert!(runner.is_available("docker").await);
        assert!(!runner.is_available("podman").await);
    }
}
