// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command sequences and result reduction for one target.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::command::{GitCommands, commit_message};
use super::redact::scrub;
use super::runner::{CommandOutput, CommandRunner, Invocation};
use super::{MergeStrategy, Operation, SyncOutcome, SyncSettings};
use crate::error::{FailureKind, ProcessError, TargetError};
use crate::target::RepositoryTarget;

const NOTHING_TO_COMMIT: &str = "nothing to commit";
const PUSH_REJECTED: &str = "[rejected]";

/// First failing step of a sequence.
#[derive(Debug, Error)]
enum StepError {
    #[error(transparent)]
    Target(#[from] TargetError),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl StepError {
    const fn kind(&self) -> FailureKind {
        match self {
            Self::Target(_) => FailureKind::InvalidTarget,
            Self::Process(e) => e.kind(),
        }
    }
}

/// Applies operations to targets through a [`CommandRunner`].
#[derive(Clone)]
pub struct SyncOperation {
    runner: Arc<dyn CommandRunner>,
    settings: SyncSettings,
}

impl std::fmt::Debug for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOperation")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SyncOperation {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, settings: SyncSettings) -> Self {
        Self { runner, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Runs `operation` against `target` and reduces the result.
    ///
    /// Never fails: every error becomes a failed outcome whose detail is
    /// free of the target's credentials. Steps stop at the first failure
    /// and nothing is rolled back.
    pub async fn execute(&self, target: &RepositoryTarget, operation: Operation) -> SyncOutcome {
        let result = match target.validate() {
            Err(e) => Err(StepError::from(e)),
            Ok(()) => match operation {
                Operation::Push => self.push(target).await,
                Operation::Pull => self.pull(target).await,
                Operation::SetMergeStrategy(strategy) => {
                    self.set_merge_strategy(target, strategy).await
                }
            },
        };

        match result {
            Ok(detail) => {
                info!(target = %target.id, op = %operation, detail = %detail, "operation succeeded");
                SyncOutcome::succeeded(target, operation, detail)
            }
            Err(e) => {
                let detail = scrub(&e.to_string(), target.access_token.expose());
                info!(target = %target.id, op = %operation, detail = %detail, "operation failed");
                SyncOutcome::failed(target, operation, e.kind(), detail)
            }
        }
    }

    async fn run(&self, target: &RepositoryTarget, inv: &Invocation) -> Result<CommandOutput, ProcessError> {
        debug!(target = %target.id, cmd = %inv.command_line(), "running");
        self.runner.run(inv).await
    }

    async fn push(&self, target: &RepositoryTarget) -> Result<String, StepError> {
        let git = GitCommands::new(&self.settings, target);
        let push = git.push()?;

        self.run(target, &git.stage_all()).await?;

        let has_staged = match self.run(target, &git.staged_changes()).await {
            Ok(_) => false,
            Err(e) if e.exit_code() == Some(1) => true,
            Err(e) => return Err(e.into()),
        };

        let committed = if has_staged {
            let message = commit_message(&self.settings.commit_message, chrono::Utc::now());
            match self.run(target, &git.commit(&message)).await {
                Ok(_) => true,
                Err(e) if e.output_contains(NOTHING_TO_COMMIT) => false,
                Err(e) => return Err(e.into()),
            }
        } else {
            false
        };

        if committed {
            self.run(target, &push).await?;
            return Ok("committed and pushed".to_string());
        }

        // Delivers earlier unpushed commits. With nothing new committed, a
        // remote that moved ahead is not a failure.
        match self.run(target, &push).await {
            Ok(_) => Ok(format!("{NOTHING_TO_COMMIT}; pushed")),
            Err(e) if e.output_contains(PUSH_REJECTED) => {
                info!(target = %target.id, "remote is ahead; nothing to push");
                Ok(format!("{NOTHING_TO_COMMIT}; remote is ahead"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn pull(&self, target: &RepositoryTarget) -> Result<String, StepError> {
        let pull = GitCommands::new(&self.settings, target).pull()?;
        self.run(target, &pull).await?;
        Ok("pulled".to_string())
    }

    async fn set_merge_strategy(
        &self,
        target: &RepositoryTarget,
        strategy: MergeStrategy,
    ) -> Result<String, StepError> {
        let config = GitCommands::new(&self.settings, target).set_merge_strategy(strategy);
        self.run(target, &config).await?;
        Ok(format!("pull.rebase set to {}", strategy.rebase_value()))
    }
}
