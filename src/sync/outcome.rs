// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde::Serialize;

use super::Operation;
use crate::error::FailureKind;
use crate::target::{RepositoryTarget, TargetId};

/// Result state of one (target, operation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "kind", rename_all = "snake_case")]
pub enum SyncStatus {
    Succeeded,
    Failed(FailureKind),
}

/// Result of applying one operation to one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub target_id: TargetId,
    pub target_name: String,
    pub operation: Operation,
    #[serde(flatten)]
    pub status: SyncStatus,
    /// Human-readable, credential-free summary.
    pub detail: String,
}

impl SyncOutcome {
    #[must_use]
    pub fn succeeded(target: &RepositoryTarget, operation: Operation, detail: impl Into<String>) -> Self {
        Self {
            target_id: target.id,
            target_name: target.display_name(),
            operation,
            status: SyncStatus::Succeeded,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn failed(
        target: &RepositoryTarget,
        operation: Operation,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            target_id: target.id,
            target_name: target.display_name(),
            operation,
            status: SyncStatus::Failed(kind),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, SyncStatus::Succeeded)
    }

    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self.status {
            SyncStatus::Succeeded => None,
            SyncStatus::Failed(kind) => Some(kind),
        }
    }
}
