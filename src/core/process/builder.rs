// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process builder.
//!
//! ```text
//! ProcessBuilder
//!  • new / which (cached PATH lookup)
//!  • arg(s), cwd, env(s), flag, timeout, redact, capture_output
//!
//! ProcessFlags: FAIL_ON_STDERR
//! StreamFlags:  FORWARD_TO_LOG (default), KEEP_IN_STRING
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::Duration;

use crate::error::ProcessError;

/// Executables already resolved via `which`, keyed by the requested name.
static EXECUTABLE_CACHE: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

fn exe_cache() -> &'static RwLock<BTreeMap<String, PathBuf>> {
    EXECUTABLE_CACHE.get_or_init(|| RwLock::new(BTreeMap::new()))
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// Fail if a successful process wrote anything to stderr
        const FAIL_ON_STDERR = 0x01;
    }
}

bitflags! {
    /// What happens to each line of a child stream.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StreamFlags: u32 {
        /// Log every line at trace level
        const FORWARD_TO_LOG = 0x01;
        /// Keep the text for the caller
        const KEEP_IN_STRING = 0x02;
    }
}

impl Default for StreamFlags {
    fn default() -> Self {
        Self::FORWARD_TO_LOG
    }
}

/// Output from a completed process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub const fn new(exit_code: i32, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Captured stdout, empty unless `KEEP_IN_STRING` was set.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured stderr, empty unless `KEEP_IN_STRING` was set.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Rewrites text before it reaches logs or error messages.
pub type Redactor = fn(&str) -> String;

/// Builder for configuring and running a process.
///
/// Environment values are appended to the inherited environment and are
/// never printed by `Debug`.
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
    flags: ProcessFlags,
    stdout: StreamFlags,
    stderr: StreamFlags,
    timeout: Option<Duration>,
    redactor: Option<Redactor>,
}

impl fmt::Debug for ProcessBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_keys: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("ProcessBuilder")
            .field("command", &self.command_line())
            .field("cwd", &self.cwd)
            .field("env", &env_keys)
            .field("flags", &self.flags)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ProcessBuilder {
    /// A bare program name is resolved via PATH at spawn time.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            flags: ProcessFlags::empty(),
            stdout: StreamFlags::default(),
            stderr: StreamFlags::default(),
            timeout: None,
            redactor: None,
        }
    }

    /// Resolves `program` via PATH first, caching the result.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if the lookup fails.
    pub fn which(program: &str) -> Result<Self, ProcessError> {
        let cached = exe_cache()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(program)
            .cloned();
        if let Some(path) = cached {
            return Ok(Self::new(path));
        }

        let path = which::which(program).map_err(|_| ProcessError::ExecutableNotFound {
            name: program.to_string(),
        })?;
        exe_cache()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(program.to_string(), path.clone());
        Ok(Self::new(path))
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an environment variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Keeps stdout and stderr for the caller while still logging them.
    #[must_use]
    pub fn capture_output(mut self) -> Self {
        self.stdout = StreamFlags::KEEP_IN_STRING | StreamFlags::FORWARD_TO_LOG;
        self.stderr = StreamFlags::KEEP_IN_STRING | StreamFlags::FORWARD_TO_LOG;
        self
    }

    /// The process is killed once `duration` elapses.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Applied to the command line and every output line before they are
    /// logged or put into errors.
    #[must_use]
    pub const fn redact(mut self, redactor: Redactor) -> Self {
        self.redactor = Some(redactor);
        self
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) fn environment(&self) -> &[(String, String)] {
        &self.env
    }

    pub(super) const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    pub(super) const fn stdout_config(&self) -> StreamFlags {
        self.stdout
    }

    pub(super) const fn stderr_config(&self) -> StreamFlags {
        self.stderr
    }

    pub(super) const fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }

    pub(super) const fn redactor(&self) -> Option<Redactor> {
        self.redactor
    }

    /// Program stem plus arguments, redacted.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = self
            .program
            .file_stem()
            .map_or_else(|| self.program.display().to_string(), |s| s.to_string_lossy().into_owned());
        for arg in &self.args {
            cmd.push(' ');
            if arg.contains(' ') {
                cmd.push('"');
                cmd.push_str(arg);
                cmd.push('"');
            } else {
                cmd.push_str(arg);
            }
        }
        match self.redactor {
            Some(redact) => redact(&cmd),
            None => cmd,
        }
    }
}
