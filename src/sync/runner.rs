// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command execution seam.
//!
//! ```text
//! Invocation { program, args, cwd, env, timeout }
//!        |
//!        v
//! CommandRunner::run()
//!   ProcessRunner   --> core::process::ProcessBuilder
//!   (tests)         --> scripted responses
//!        |
//!        v
//! Ok(CommandOutput { exit_code, stdout, stderr }) | Err(ProcessError)
//! ```

use futures_util::future::BoxFuture;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::StderrPolicy;
use super::redact::redact_credentials;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::ProcessError;

/// Captured result of a command that met its success criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// One external command: argument vector, never a shell string.
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Added on top of the inherited environment.
    pub env: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
            env: Vec::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the argument vector contains `needle` as a contiguous run.
    #[must_use]
    pub fn has_args(&self, needle: &[&str]) -> bool {
        !needle.is_empty()
            && self
                .args
                .windows(needle.len())
                .any(|w| w.iter().zip(needle).all(|(a, b)| a == b))
    }

    /// Value of an environment entry added by this invocation.
    #[must_use]
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Redacted command line for logs and details.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = Path::new(&self.program)
            .file_stem()
            .map_or_else(|| self.program.clone(), |s| s.to_string_lossy().into_owned());
        for arg in &self.args {
            line.push(' ');
            if arg.contains(' ') {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        redact_credentials(&line)
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env: Vec<(&str, &str)> = self.env.iter().map(|(k, _)| (k.as_str(), "[hidden]")).collect();
        f.debug_struct("Invocation")
            .field("command", &self.command_line())
            .field("cwd", &self.cwd)
            .field("env", &env)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Executes invocations.
///
/// Implementations spawn exactly one process per call, never retry, and
/// resolve only after the process has exited and its output is drained.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, Result<CommandOutput, ProcessError>>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    stderr_policy: StderrPolicy,
    cancel: CancellationToken,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(stderr_policy: StderrPolicy) -> Self {
        Self {
            stderr_policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Kills in-flight children and refuses new spawns once `token` fires.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    async fn execute(&self, invocation: &Invocation) -> Result<CommandOutput, ProcessError> {
        let mut builder = ProcessBuilder::which(&invocation.program)?
            .args(&invocation.args)
            .cwd(&invocation.cwd)
            .envs(invocation.env.iter().cloned())
            .capture_output()
            .redact(redact_credentials);

        if let Some(timeout) = invocation.timeout {
            builder = builder.timeout(timeout);
        }
        if self.stderr_policy == StderrPolicy::Strict {
            builder = builder.flag(ProcessFlags::FAIL_ON_STDERR);
        }

        let output = builder.run_with_cancellation(&self.cancel).await?;

        if !output.stderr().trim().is_empty() {
            warn!(
                cmd = %invocation.command_line(),
                stderr = %output.stderr().trim(),
                "command succeeded with stderr output"
            );
        }

        Ok(CommandOutput {
            exit_code: output.exit_code(),
            stdout: output.stdout().to_string(),
            stderr: output.stderr().to_string(),
        })
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, Result<CommandOutput, ProcessError>> {
        Box::pin(self.execute(invocation))
    }
}
