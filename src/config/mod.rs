// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for repo-sync.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. reposync.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. REPOSYNC_<SECTION>__<KEY> env vars
//! 5. --set section.key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! REPOSYNC_SYNC__TIMEOUT_SECS=60        → sync.timeout_secs = 60
//! REPOSYNC_SYNC__CREDENTIAL_MODE=url    → sync.credential_mode = "url"
//! REPOSYNC_STORE__PATH=/data/repos.json → store.path = "/data/repos.json"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use loader::ConfigLoader;
pub use types::{GlobalConfig, StoreConfig, SyncConfig};

/// Name of the configuration file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "reposync.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "REPOSYNC";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Synchronization options.
    pub sync: SyncConfig,
    /// Target store options.
    pub store: StoreConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repo_sync::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("reposync.toml")
    ///     .with_env_prefix("REPOSYNC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<()> {
        self.sync.validate()?;
        if self.store.path.as_os_str().is_empty() {
            return Err(crate::error::ConfigError::InvalidValue {
                section: "store".to_string(),
                key: "path".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is ordered by key and aligned on `=`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_sync_options(&mut options);
        options.insert(
            "store.path".to_string(),
            self.store.path.display().to_string(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p: &PathBuf| p.display().to_string()),
        );
        options.insert(
            "global.log_format".into(),
            self.global.log_format.as_str().to_string(),
        );
    }

    fn format_sync_options(&self, options: &mut BTreeMap<String, String>) {
        let sync = &self.sync;
        options.insert("sync.git".into(), sync.git.clone());
        options.insert("sync.timeout_secs".into(), sync.timeout_secs.to_string());
        options.insert(
            "sync.max_concurrent".into(),
            sync.max_concurrent.to_string(),
        );
        options.insert(
            "sync.stderr_policy".into(),
            sync.stderr_policy.as_str().to_string(),
        );
        options.insert(
            "sync.credential_mode".into(),
            sync.credential_mode.as_str().to_string(),
        );
        options.insert("sync.commit_message".into(), sync.commit_message.clone());
    }
}
