// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only working copy inspection.
//!
//! ```text
//! inspect(local_path)
//!   gix::discover --> .git/ (no subprocess)
//!     head_name   --> branch (None when detached)
//!     status      --> dirty (staged, unstaged or untracked)
//!     refs/stash  --> stashed
//! ```
//!
//! Everything that changes a repository goes through the git executable
//! in [`crate::sync`]; this module never writes.

pub mod query;


pub use query::{WorkingCopyStatus, inspect, is_git_repo};
