// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runs operations across the target collection.
//!
//! ```text
//! Orchestrator::new(targets, sync_operation)
//!   .with_max_concurrent() .with_cancel_token() .with_sink()
//!
//! run_all(kind)
//!   snapshot SharedTargets  --poisoned--> TargetError::SnapshotUnavailable
//!   select enabled (+ filter)
//!   stream::iter(targets).map(run_target).buffered(max_concurrent)
//!       Started --> [per-path lock] --> execute --> Succeeded | Failed
//!       cancelled before start --> Failed(Interrupted)
//!   --> RunReport { outcomes in collection order }
//!
//! run_one(id, operation)   manual trigger, ignores enable flags
//! trigger(kind, id)        run_one wrapped in a RunReport
//! sync_all()               run_all(Push) then run_all(Pull)
//! ```
//!
//! A target's failure never stops the run; every selected target gets
//! exactly one outcome.

pub mod events;
pub mod filter;


use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{FailureKind, TargetError};
use crate::sync::{Operation, OperationKind, SyncOperation, SyncOutcome};
use crate::target::{RepositoryTarget, SharedTargets, TargetId};

pub use events::{EventSink, Notice, NoticeLevel, Notifier, SyncEvent};
pub use filter::TargetFilter;

/// Outcomes of one bulk run, in collection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub kind: OperationKind,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<SyncOutcome>,
}

impl RunReport {
    #[must_use]
    pub fn new(kind: OperationKind, outcomes: Vec<SyncOutcome>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            kind,
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&SyncOutcome> {
        self.outcomes.iter().find(|o| o.target_id == id)
    }
}

/// Identity of a working copy: the canonical path if it exists, else the
/// absolute path, else the path as configured.
fn working_copy_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// One mutex per distinct working copy in a run.
struct PathLocks(BTreeMap<PathBuf, Mutex<()>>);

impl PathLocks {
    fn new<'a>(targets: impl IntoIterator<Item = &'a RepositoryTarget>) -> Self {
        Self(
            targets
                .into_iter()
                .map(|t| (working_copy_key(&t.local_path), Mutex::new(())))
                .collect(),
        )
    }

    async fn lock(&self, path: &Path) -> Option<MutexGuard<'_, ()>> {
        match self.0.get(&working_copy_key(path)) {
            Some(mutex) => Some(mutex.lock().await),
            None => None,
        }
    }
}

/// Applies operations to every selected target and reports per-target results.
pub struct Orchestrator {
    targets: SharedTargets,
    operation: SyncOperation,
    max_concurrent: usize,
    cancel: CancellationToken,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("operation", &self.operation)
            .field("max_concurrent", &self.max_concurrent)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    #[must_use]
    pub fn new(targets: SharedTargets, operation: SyncOperation) -> Self {
        Self {
            targets,
            operation,
            max_concurrent: 1,
            cancel: CancellationToken::new(),
            sinks: Vec::new(),
        }
    }

    /// Number of targets processed at once; values below 1 mean 1.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Targets not yet started when `token` fires fail as interrupted.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Requests cancellation of the current and future runs.
    pub fn interrupt(&self) {
        info!("interrupting sync run");
        self.cancel.cancel();
    }

    fn snapshot(&self) -> Result<Arc<[RepositoryTarget]>, TargetError> {
        self.targets
            .read()
            .map(|set| set.snapshot())
            .map_err(|_| TargetError::SnapshotUnavailable)
    }

    /// Runs `kind` over every target whose flag for it is set.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::SnapshotUnavailable` if the collection cannot be
    /// read; no target runs in that case. Target failures are reported in
    /// the returned report, never as an error.
    pub async fn run_all(&self, kind: OperationKind) -> Result<RunReport, TargetError> {
        self.run_filtered(kind, &TargetFilter::all()).await
    }

    /// Like [`Orchestrator::run_all`], limited to targets matching `filter`.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::run_all`].
    pub async fn run_filtered(
        &self,
        kind: OperationKind,
        filter: &TargetFilter,
    ) -> Result<RunReport, TargetError> {
        let snapshot = self.snapshot()?;
        let selected: Vec<&RepositoryTarget> = snapshot
            .iter()
            .filter(|t| {
                let enabled = t.is_enabled_for(kind);
                if !enabled {
                    debug!(target = %t.id, op = %kind, "disabled, skipping");
                }
                enabled && filter.matches(t)
            })
            .collect();

        info!(
            op = %kind,
            targets = selected.len(),
            total = snapshot.len(),
            "starting run"
        );

        let locks = PathLocks::new(selected.iter().copied());
        let operation = Operation::from(kind);
        let outcomes: Vec<SyncOutcome> = stream::iter(selected)
            .map(|target| self.run_target(target, operation, &locks))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let report = RunReport::new(kind, outcomes);
        info!(
            op = %kind,
            succeeded = report.succeeded,
            failed = report.failed,
            "run finished"
        );
        Ok(report)
    }

    /// Runs one operation on one target regardless of its enable flags.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::NotFound` for an unknown id and
    /// `TargetError::SnapshotUnavailable` if the collection cannot be read.
    pub async fn run_one(
        &self,
        id: TargetId,
        operation: Operation,
    ) -> Result<SyncOutcome, TargetError> {
        let snapshot = self.snapshot()?;
        let target = snapshot
            .iter()
            .find(|t| t.id == id)
            .ok_or(TargetError::NotFound(id))?;
        let locks = PathLocks::new(std::iter::once(target));
        Ok(self.run_target(target, operation, &locks).await)
    }

    /// Manual push or pull of one target, reported like a bulk run.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::run_one`].
    pub async fn trigger(
        &self,
        kind: OperationKind,
        id: TargetId,
    ) -> Result<RunReport, TargetError> {
        let outcome = self.run_one(id, kind.into()).await?;
        Ok(RunReport::new(kind, vec![outcome]))
    }

    /// Pushes, then pulls.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::run_all`].
    pub async fn sync_all(&self, filter: &TargetFilter) -> Result<Vec<RunReport>, TargetError> {
        let push = self.run_filtered(OperationKind::Push, filter).await?;
        let pull = self.run_filtered(OperationKind::Pull, filter).await?;
        Ok(vec![push, pull])
    }

    async fn run_target(
        &self,
        target: &RepositoryTarget,
        operation: Operation,
        locks: &PathLocks,
    ) -> SyncOutcome {
        self.emit(&SyncEvent::Started {
            target_id: target.id,
            target_name: target.display_name(),
            operation,
        });

        let outcome = if self.cancel.is_cancelled() {
            Self::interrupted(target, operation)
        } else {
            let _guard = locks.lock(&target.local_path).await;
            if self.cancel.is_cancelled() {
                Self::interrupted(target, operation)
            } else {
                self.operation.execute(target, operation).await
            }
        };

        self.emit(&SyncEvent::finished(&outcome));
        outcome
    }

    fn interrupted(target: &RepositoryTarget, operation: Operation) -> SyncOutcome {
        SyncOutcome::failed(
            target,
            operation,
            FailureKind::Interrupted,
            "run cancelled before this target started",
        )
    }

    fn emit(&self, event: &SyncEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.emit(event) {
                warn!(target = %event.target_id(), error = %e, "event sink rejected event");
            }
        }
    }
}
