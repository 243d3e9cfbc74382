// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! [global]  output_log_level, file_log_level, log_file, log_format
//! [sync]    git, timeout_secs, max_concurrent, stderr_policy,
//!           credential_mode, commit_message
//! [store]   path
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::{LogFormat, LogLevel};
use crate::sync::{CredentialMode, DEFAULT_COMMIT_MESSAGE, StderrPolicy, SyncSettings};

/// Default per-invocation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Log file; no file log when unset.
    pub log_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_format: LogFormat::Text,
        }
    }
}

/// Synchronization behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Git executable name or path.
    pub git: String,
    /// Per-invocation timeout; 0 disables it.
    pub timeout_secs: u64,
    /// Targets processed at once.
    pub max_concurrent: usize,
    pub stderr_policy: StderrPolicy,
    pub credential_mode: CredentialMode,
    /// Commit message template; `{timestamp}` is replaced, or the instant
    /// appended when the template has none.
    pub commit_message: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent: 1,
            stderr_policy: StderrPolicy::default(),
            credential_mode: CredentialMode::default(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }
}

impl SyncConfig {
    /// `None` when the timeout is disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Settings handed to the sync layer.
    #[must_use]
    pub fn settings(&self) -> SyncSettings {
        SyncSettings::builder()
            .git(self.git.clone())
            .maybe_timeout(self.timeout())
            .credential_mode(self.credential_mode)
            .commit_message(self.commit_message.clone())
            .build()
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty git program, an empty
    /// commit message, or `max_concurrent = 0`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            section: "sync".to_string(),
            key: key.to_string(),
            message: message.to_string(),
        };
        if self.git.trim().is_empty() {
            return Err(invalid("git", "must not be empty"));
        }
        if self.max_concurrent == 0 {
            return Err(invalid("max_concurrent", "must be at least 1"));
        }
        if self.commit_message.trim().is_empty() {
            return Err(invalid("commit_message", "must not be empty"));
        }
        Ok(())
    }
}

/// Target store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("repos.json"),
        }
    }
}
