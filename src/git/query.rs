// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix.

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::error::{GitError, GixError, RepoSyncResult};

/// Snapshot of a working copy as seen by `reposync status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingCopyStatus {
    /// Short branch name; `None` when HEAD is detached.
    pub branch: Option<String>,
    pub dirty: bool,
    pub stashed: bool,
}

impl fmt::Display for WorkingCopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.branch.as_deref().unwrap_or("(detached)"))?;
        f.write_str(if self.dirty { ", dirty" } else { ", clean" })?;
        if self.stashed {
            f.write_str(", stashed")?;
        }
        Ok(())
    }
}

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    gix::discover(path).is_ok()
}

fn discover(path: &Path) -> Result<gix::Repository, GitError> {
    if !path.exists() {
        return Err(GitError::RepoNotFound {
            path: path.display().to_string(),
        });
    }
    gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))
}

/// Inspects the working copy at `path`.
///
/// # Errors
///
/// Returns `GitError::RepoNotFound` if the path does not exist and a gix
/// error if discovery, head resolution or the status walk fails.
pub fn inspect(path: &Path) -> RepoSyncResult<WorkingCopyStatus> {
    let repo = discover(path)?;
    Ok(WorkingCopyStatus {
        branch: current_branch(&repo)?,
        dirty: has_uncommitted_changes(&repo)?,
        stashed: has_stashed_changes(&repo)?,
    })
}

fn current_branch(repo: &gix::Repository) -> Result<Option<String>, GitError> {
    let head = repo
        .head_name()
        .map_err(|e| GitError::Gix(GixError::Head(e)))?;
    Ok(head.map(|name| name.shorten().to_string()))
}

fn has_uncommitted_changes(repo: &gix::Repository) -> Result<bool, GitError> {
    use gix::status::UntrackedFiles;

    if repo.workdir().is_none() {
        return Err(GitError::Gix(GixError::BareRepository));
    }
    let has_changes = repo
        .status(gix::progress::Discard)
        .map_err(|e| GixError::Status(e.to_string()))?
        .untracked_files(UntrackedFiles::Files)
        .into_iter(None)
        .map_err(|e| GixError::Status(e.to_string()))?
        .next()
        .is_some();

    Ok(has_changes)
}

fn has_stashed_changes(repo: &gix::Repository) -> Result<bool, GitError> {
    // refs/stash exists iff there are stashed changes
    match repo.find_reference("refs/stash") {
        Ok(_) => Ok(true),
        Err(gix::reference::find::existing::Error::NotFound { name: _ }) => Ok(false),
        Err(e) => Err(GitError::Gix(GixError::Head(e))),
    }
}
