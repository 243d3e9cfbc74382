// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, cwd, env, stdio
//!              |
//!              v
//!          spawn() ----------> SpawnFailed
//!              |
//!              v
//!          run_child()
//!     wait | deadline | cancel --> Timeout / Interrupted
//!              |
//!              v
//!        classify exit
//!     exit code != 0          --> NonZeroExit
//!     stderr + FAIL_ON_STDERR --> UnexpectedStderr
//!              |
//!              v
//!       ProcessOutput
//!    { exit_code, stdout, stderr }
//! ```
//!
//! The returned future completes only after the child has exited and its
//! output streams have been drained.

use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
use super::io::Ending;
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Program stem used in log fields.
    fn display_name(&self) -> String {
        self.program()
            .file_stem()
            .map_or_else(|| "process".to_string(), |s| s.to_string_lossy().into_owned())
    }

    /// Effective stderr flags; stderr is always kept when it decides success.
    pub(super) fn effective_stderr_flags(&self) -> StreamFlags {
        if self.process_flags().contains(ProcessFlags::FAIL_ON_STDERR) {
            self.stderr_config() | StreamFlags::KEEP_IN_STRING
        } else {
            self.stderr_config()
        }
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if:
    /// - Spawning the child process fails.
    /// - The process exits with a non-zero code.
    /// - The process writes to stderr while `FAIL_ON_STDERR` is set.
    /// - The timeout elapses.
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        self.execute(None).await
    }

    /// Spawns and runs the process with cancellation support.
    ///
    /// When the token is cancelled the process is killed and
    /// `ProcessError::Interrupted` is returned. A token that is already
    /// cancelled prevents the spawn.
    ///
    /// # Errors
    ///
    /// Same as [`ProcessBuilder::run`], plus `Interrupted`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use tokio_util::sync::CancellationToken;
    /// use repo_sync::core::process::builder::ProcessBuilder;
    ///
    /// let token = CancellationToken::new();
    /// let output = ProcessBuilder::new("git")
    ///     .args(["fetch", "--quiet"])
    ///     .run_with_cancellation(&token)
    ///     .await?;
    /// ```
    pub async fn run_with_cancellation(
        self,
        token: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        self.execute(Some(token)).await
    }

    async fn execute(
        self,
        token: Option<&CancellationToken>,
    ) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_some_and(CancellationToken::is_cancelled) {
            return Err(ProcessError::Interrupted { command: cmd_line });
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();
        let mut child = command.spawn().map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let (output, ending) = self
            .run_child(&name, &mut child, token)
            .await
            .map_err(|e| ProcessError::OutputError {
                command: cmd_line.clone(),
                message: e.to_string(),
            })?;

        match ending {
            Ending::TimedOut => Err(ProcessError::Timeout {
                command: cmd_line,
                timeout_secs: self.timeout_duration().map_or(0, |d| d.as_secs()),
            }),
            Ending::Interrupted => Err(ProcessError::Interrupted { command: cmd_line }),
            Ending::Exited => self.classify(&name, cmd_line, output),
        }
    }

    /// Turns a finished process into success or a typed failure.
    fn classify(
        &self,
        name: &str,
        cmd_line: String,
        output: ProcessOutput,
    ) -> Result<ProcessOutput, ProcessError> {
        if !output.success() {
            if !output.stderr().is_empty() {
                debug!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
                stdout: output.stdout().to_string(),
                stderr: output.stderr().to_string(),
            });
        }

        if self.process_flags().contains(ProcessFlags::FAIL_ON_STDERR)
            && !output.stderr().trim().is_empty()
        {
            return Err(ProcessError::UnexpectedStderr {
                command: cmd_line,
                stderr: output.stderr().to_string(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in self.environment() {
            command.env(key, value);
        }

        // Nothing reads from us; a prompt must fail, not wait.
        command.stdin(Stdio::null());
        command.stdout(Self::stdio_from_flags(self.stdout_config()));
        command.stderr(Self::stdio_from_flags(self.effective_stderr_flags()));

        command.kill_on_drop(true);

        command
    }

    /// Converts `StreamFlags` to Stdio configuration.
    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    }
}
