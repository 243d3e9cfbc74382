// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Progress events and user notices.
//!
//! ```text
//! Orchestrator --emit--> EventSink
//!                          ChannelSink  --> flume::Sender<SyncEvent>
//!                          NoticeSink   --> Notifier::notify(Notice)
//!                                             LogNotifier (tracing)
//!                                             terminal (cmd layer)
//! ```

use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{FailureKind, Result};
use crate::sync::{Operation, SyncOutcome};
use crate::target::TargetId;

/// How long informational notices stay visible.
pub const INFO_NOTICE_DURATION: Duration = Duration::from_secs(3);
/// How long failure notices stay visible.
pub const FAILURE_NOTICE_DURATION: Duration = Duration::from_secs(5);

/// Per-target progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    Started {
        target_id: TargetId,
        target_name: String,
        operation: Operation,
    },
    Succeeded {
        target_id: TargetId,
        target_name: String,
        operation: Operation,
        detail: String,
    },
    Failed {
        target_id: TargetId,
        target_name: String,
        operation: Operation,
        kind: FailureKind,
        detail: String,
    },
}

impl SyncEvent {
    /// Terminal event for an outcome.
    #[must_use]
    pub fn finished(outcome: &SyncOutcome) -> Self {
        match outcome.failure_kind() {
            None => Self::Succeeded {
                target_id: outcome.target_id,
                target_name: outcome.target_name.clone(),
                operation: outcome.operation,
                detail: outcome.detail.clone(),
            },
            Some(kind) => Self::Failed {
                target_id: outcome.target_id,
                target_name: outcome.target_name.clone(),
                operation: outcome.operation,
                kind,
                detail: outcome.detail.clone(),
            },
        }
    }

    #[must_use]
    pub const fn target_id(&self) -> TargetId {
        match self {
            Self::Started { target_id, .. }
            | Self::Succeeded { target_id, .. }
            | Self::Failed { target_id, .. } => *target_id,
        }
    }

    /// Whether this event ends a target's operation.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }

    /// User-facing notice for this event.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Started {
                target_name,
                operation,
                ..
            } => Notice::info(format!(
                "Starting {} for {target_name} (1/2)",
                operation.label()
            )),
            Self::Succeeded {
                target_name,
                operation,
                ..
            } => Notice::info(format!(
                "{} for {target_name} succeeded (2/2)",
                operation.title()
            )),
            Self::Failed {
                target_name,
                operation,
                detail,
                ..
            } => Notice::failure(format!(
                "{} for {target_name} failed: {detail}",
                operation.title()
            )),
        }
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Failure,
}

/// Short status message for a display surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub duration: Duration,
}

impl Notice {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
            duration: INFO_NOTICE_DURATION,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Failure,
            duration: FAILURE_NOTICE_DURATION,
        }
    }
}

/// Receives progress events. Errors are logged by the caller and ignored.
pub trait EventSink: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered.
    fn emit(&self, event: &SyncEvent) -> Result<()>;
}

/// Display surface for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Forwards events into a flume channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: flume::Sender<SyncEvent>,
}

impl ChannelSink {
    #[must_use]
    pub const fn new(tx: flume::Sender<SyncEvent>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with an unbounded receiver.
    #[must_use]
    pub fn unbounded() -> (Self, flume::Receiver<SyncEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &SyncEvent) -> Result<()> {
        self.tx
            .try_send(event.clone())
            .map_err(|e| anyhow::anyhow!("event channel unavailable: {e}"))
    }
}

/// Turns events into notices for a [`Notifier`].
#[derive(Debug, Clone)]
pub struct NoticeSink<N> {
    notifier: N,
}

impl<N: Notifier> NoticeSink<N> {
    pub const fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

impl<N: Notifier> EventSink for NoticeSink<N> {
    fn emit(&self, event: &SyncEvent) -> Result<()> {
        self.notifier.notify(&event.notice());
        Ok(())
    }
}

/// Writes notices to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => info!(notice = %notice.message),
            NoticeLevel::Failure => warn!(notice = %notice.message),
        }
    }
}
