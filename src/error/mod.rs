// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            RepoSyncError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+-----+-------+
//!   |      |      |       |      |     |       |
//!   v      v      v       v      v     v       v
//! Bail  Process Target  Store  Config Git  Io/Other
//!        Box     Box     Box    Box   Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Process  ExecutableNotFound, SpawnFailed, NonZeroExit,
//!            UnexpectedStderr, Timeout, Interrupted
//!   Target   NotFound, Invalid, SnapshotUnavailable
//!   Store    Read, Parse, Write, UnsupportedVersion
//!   Config   ParseError, MissingKey, InvalidValue
//!   Git      RepoNotFound, Gix
//! ```
//!
//! Process errors are target-scoped: the sync layer folds them into a
//! failed outcome and never lets them escape a run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::target::TargetId;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`RepoSyncError`].
pub type RepoSyncResult<T> = std::result::Result<T, RepoSyncError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum RepoSyncError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// External command failed.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Repository target error.
    #[error("target error: {0}")]
    Target(#[from] Box<TargetError>),

    /// Target store (persistence) error.
    #[error("store error: {0}")]
    Store(#[from] Box<StoreError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Working copy inspection failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`RepoSyncError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> RepoSyncError {
    RepoSyncError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for RepoSyncError {
                fn from(err: $error) -> Self {
                    RepoSyncError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ProcessError => Process,
    TargetError => Target,
    StoreError => Store,
    ConfigError => Config,
    GitError => Git,
    std::io::Error => Io,
}

// --- Process Errors ---

/// Coarse classification of a failed sync step.
///
/// This is what ends up in a failed outcome; the full error is rendered
/// into the outcome detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The tool could not be started (missing binary, bad working directory).
    SpawnFailure,
    /// The tool ran and reported failure.
    NonZeroExit,
    /// The tool exited 0 but wrote to its error stream.
    UnexpectedStderr,
    /// The tool did not finish before the deadline and was killed.
    Timeout,
    /// The run was cancelled while (or before) the tool ran.
    Interrupted,
    /// The target is missing a field required to build the command.
    InvalidTarget,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SpawnFailure => "spawn failure",
            Self::NonZeroExit => "non-zero exit",
            Self::UnexpectedStderr => "unexpected stderr",
            Self::Timeout => "timeout",
            Self::Interrupted => "interrupted",
            Self::InvalidTarget => "invalid target",
        };
        f.write_str(s)
    }
}

/// Appends captured stderr to an error message when there is any.
fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Process execution errors.
///
/// `command` fields always hold a redacted command line.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}{}", stderr_tail(.stderr))]
    NonZeroExit {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// Process exited with status 0 but wrote to stderr.
    #[error("process '{command}' wrote to stderr{}", stderr_tail(.stderr))]
    UnexpectedStderr { command: String, stderr: String },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Process was interrupted by cancellation.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },

    /// Failed to wait for the process or read its output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

impl ProcessError {
    /// Maps this error onto the outcome taxonomy.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ExecutableNotFound { .. } | Self::SpawnFailed { .. } | Self::OutputError { .. } => {
                FailureKind::SpawnFailure
            }
            Self::NonZeroExit { .. } => FailureKind::NonZeroExit,
            Self::UnexpectedStderr { .. } => FailureKind::UnexpectedStderr,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Interrupted { .. } => FailureKind::Interrupted,
        }
    }

    /// Exit code, if the process ran to completion with a non-zero status.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns whether stdout or stderr of a failed run contains `needle`.
    #[must_use]
    pub fn output_contains(&self, needle: &str) -> bool {
        match self {
            Self::NonZeroExit { stdout, stderr, .. } => {
                stdout.contains(needle) || stderr.contains(needle)
            }
            Self::UnexpectedStderr { stderr, .. } => stderr.contains(needle),
            _ => false,
        }
    }
}

// --- Target Errors ---

/// Repository target errors.
#[derive(Debug, Error)]
pub enum TargetError {
    /// No target with this id.
    #[error("target {0} not found")]
    NotFound(TargetId),

    /// Target is missing data needed to run a command.
    #[error("target {id} is invalid: {reason}")]
    Invalid { id: TargetId, reason: String },

    /// The target collection could not be read.
    #[error("target collection is unavailable (lock poisoned)")]
    SnapshotUnavailable,
}

// --- Store Errors ---

/// Target store (persistence) errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the store file.
    #[error("failed to read target store '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file is not valid JSON or has the wrong shape.
    #[error("failed to parse target store '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Failed to write the store file.
    #[error("failed to write target store '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file was written by a newer version.
    #[error(
        "target store '{}' has version {found}, newest supported is {supported}",
        .path.display()
    )]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        supported: u32,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Git Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Status walk failed.
    #[error("failed to compute status: {0}")]
    Status(String),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

/// Working copy inspection errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// No working copy at the path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

#[cfg(test)]
mod tests;
