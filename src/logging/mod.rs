// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Diagnostics for sync runs.
//!
//! ```text
//! init_logging(&LogConfig)
//!   registry
//!   ├── console   stderr, ANSI when a terminal, no module paths
//!   └── file      appended, non_blocking, text or JSON lines
//!   --> LogGuard (flushes the file writer on drop)
//! ```
//!
//! Levels are numeric so they fit `--log-level` and `[global]` alike:
//!
//! | level | this crate | git, gix, tokio |
//! |-------|------------|-----------------|
//! | 0     | off        | off             |
//! | 1     | error      | error           |
//! | 2     | warn       | warn            |
//! | 3     | info       | warn            |
//! | 4     | debug      | warn            |
//! | 5     | trace      | warn            |
//! | 6     | trace      | trace           |
//!
//! At debug, every git command line is logged with credentials redacted.
//! At trace, every line the child writes is logged too.


use anyhow::Context;
use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::error::{ConfigError, Result};

/// Verbosity, 0 (silent) to 6 (everything, dependencies included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LogLevel(u8);

impl Default for LogLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl LogLevel {
    pub const SILENT: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const DEBUG: Self = Self(4);
    pub const TRACE: Self = Self(5);
    pub const DUMP: Self = Self(6);

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` above 6.
    pub fn new(level: u8) -> std::result::Result<Self, ConfigError> {
        if level <= Self::DUMP.0 {
            Ok(Self(level))
        } else {
            Err(ConfigError::InvalidValue {
                section: "global".to_string(),
                key: "log_level".to_string(),
                message: format!("log level must be 0-6, got {level}"),
            })
        }
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// `EnvFilter` directives for this level.
    ///
    /// Below [`LogLevel::DUMP`] only this crate gets past `warn`.
    #[must_use]
    pub const fn directives(self) -> &'static str {
        match self.0 {
            0 => "off",
            1 => "error",
            2 => "warn",
            3 => "warn,repo_sync=info,reposync=info",
            4 => "warn,repo_sync=debug,reposync=debug",
            5 => "warn,repo_sync=trace,reposync=trace",
            _ => "trace",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(self.directives())
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// Line format of the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

impl LogFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default = LogLevel::INFO)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::TRACE)]
    file_level: LogLevel,
    #[builder(setters(name = with_log_file), into)]
    log_file: Option<PathBuf>,
    #[builder(setters(name = with_file_format), default)]
    file_format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    #[must_use]
    pub const fn file_level(&self) -> LogLevel {
        self.file_level
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    #[must_use]
    pub const fn file_format(&self) -> LogFormat {
        self.file_format
    }
}

/// Keeps the file writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

/// Installs the global subscriber.
///
/// The log file is appended to, so repeated scheduled runs share one file.
///
/// # Errors
///
/// Returns an error if the log directory or file cannot be created.
///
/// # Example
///
/// ```no_run
/// use repo_sync::logging::{LogConfig, LogFormat, LogLevel, init_logging};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::WARN)
///     .with_log_file("logs/reposync.log")
///     .with_file_format(LogFormat::Json)
///     .build();
///
/// let _guard = init_logging(&config)?;
/// tracing::info!(targets = 3, "sync started");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console_layer: BoxedLayer = fmt::layer()
        .with_target(false)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .with_writer(std::io::stderr)
        .with_filter(config.console_level().filter())
        .boxed();

    let mut layers = vec![console_layer];
    let mut file_guard = None;

    if let Some(path) = config.log_file() {
        let (layer, guard) = file_layer(path, config.file_level(), config.file_format())?;
        layers.push(layer);
        file_guard = Some(guard);
    }

    tracing_subscriber::registry().with(layers).init();

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

fn file_layer(path: &Path, level: LogLevel, format: LogFormat) -> Result<(BoxedLayer, WorkerGuard)> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let layer = match format {
        LogFormat::Text => fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(level.filter())
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(level.filter())
            .boxed(),
    };

    Ok((layer, guard))
}
