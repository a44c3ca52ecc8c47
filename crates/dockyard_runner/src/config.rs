//! Execution options.

use serde::{Deserialize, Serialize};

/// Default timeout for captured commands, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Per-invocation execution options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOptions {
    /// Timeout in seconds (0 = no timeout)
    pub timeout_seconds: u64,
    /// Inherit the terminal instead of capturing output
    pub stream_output: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            stream_output: false,
        }
    }
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Disable the timeout. Only meant for follow-mode commands the user interrupts.
    pub fn unbounded(mut self) -> Self {
        self.timeout_seconds = 0;
        self
    }

    pub fn stream(mut self) -> Self {
        self.stream_output = true;
        self
    }

    /// Whether a timeout applies.
    pub fn is_bounded(&self) -> bool {
        self.timeout_seconds > 0
    }
}
