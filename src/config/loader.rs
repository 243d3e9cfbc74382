// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional("reposync.toml")
//!   .add_toml_file(--config)
//!   .add_toml_str()
//!   .with_env_prefix("REPOSYNC")   REPOSYNC_SYNC__TIMEOUT_SECS=60
//!   .set() / .set_str()            --set sync.timeout_secs=60
//!        |
//!        v
//!    build() --> Config (validated)
//! ```
//!
//! Only variables with a `__` section separator are read from the
//! environment, so unrelated `REPOSYNC_*` variables never reach the
//! strict deserializer.

use anyhow::Context;
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::Result;

/// Separator between section and key in environment variable names.
const ENV_SEPARATOR: &str = "__";

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    files: Vec<(String, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            files: Vec::new(),
        }
    }

    /// Adds a TOML configuration file that must exist.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self.files.push(("file".to_string(), p.to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        if p.exists() {
            self.files.push(("optional".to_string(), p.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.files
            .push(("string".to_string(), PathBuf::from("<string>")));
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .with_context(|| format!("invalid override key '{key}'"))?;
        Ok(self)
    }

    /// Applies a `section.key=value` override.
    ///
    /// Booleans and integers are parsed; anything else stays a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the option has no `=` or no section.
    pub fn set_str(self, option: &str) -> Result<Self> {
        let (key, value) = option
            .split_once('=')
            .with_context(|| format!("override '{option}' is not of the form section.key=value"))?;
        let key = key.trim();
        if !key.contains('.') {
            anyhow::bail!("override key '{key}' must be of the form section.key");
        }
        let value = value.trim();
        if let Ok(flag) = value.parse::<bool>() {
            self.set(key, flag)
        } else if let Ok(number) = value.parse::<i64>() {
            self.set(key, number)
        } else {
            self.set(key, value)
        }
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - A key is unknown or a value has the wrong type.
    /// - Validation of the merged configuration fails.
    pub fn build(self) -> Result<Config> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(Some(sectioned_env(prefix, std::env::vars()))),
            ),
            None => self.builder,
        };
        let cfg = builder.build().context("failed to load configuration")?;
        let config: Config = cfg
            .try_deserialize()
            .context("failed to read configuration")?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn loaded_files(&self) -> Vec<(String, PathBuf)> {
        self.files.clone()
    }

    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, (source, path))| format!("{}. [{}] {}", i + 1, source, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps only `PREFIX_SECTION__KEY` variables.
pub(super) fn sectioned_env(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> config::Map<String, String> {
    let head = format!("{prefix}_");
    vars.into_iter()
        .filter(|(key, _)| key.starts_with(&head) && key[head.len()..].contains(ENV_SEPARATOR))
        .collect()
}
