// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Target list arguments.
//!
//! # Subcommands
//!
//! ```text
//! targets list [--json]
//! targets add --link L --path P [--name N] [--username U] [--token T]
//!             [--no-push] [--no-pull]
//!   → appends a target, prints its id
//! targets set ID [--link L] [--path P] [--name N] [--username U]
//!             [--token T] [--push BOOL] [--pull BOOL]
//!   → edits the given fields only
//! targets remove ID
//! ```
//!
//! Every edit is saved to the store before the command returns.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::target::{AccessToken, RepositoryTarget, TargetId, TargetPatch};

/// Environment variable read by `targets add --token`.
pub const TOKEN_ENV: &str = "REPOSYNC_TOKEN";

/// Arguments for the `targets` command.
#[derive(Debug, Clone, Args)]
pub struct TargetsArgs {
    #[command(subcommand)]
    pub subcommand: TargetsSubcommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TargetsSubcommand {
    /// Lists all targets.
    List(ListArgs),

    /// Adds a target.
    Add(AddArgs),

    /// Changes fields of a target.
    Set(SetArgs),

    /// Removes a target.
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Prints the targets as JSON (tokens are never included).
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct AddArgs {
    /// Remote host and path, such as `github.com/alice/notes`.
    #[arg(long = "link", value_name = "LINK", default_value = "")]
    pub remote_link: String,

    /// Working copy directory.
    #[arg(long = "path", value_name = "DIR")]
    pub local_path: Option<PathBuf>,

    /// Display name; defaults to the working copy directory name.
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(short = 'u', long, default_value = "")]
    pub username: String,

    /// Access token or password.
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<AccessToken>,

    /// Excludes the target from `push`.
    #[arg(long)]
    pub no_push: bool,

    /// Excludes the target from `pull`.
    #[arg(long)]
    pub no_pull: bool,
}

impl AddArgs {
    /// Target with an unassigned id.
    #[must_use]
    pub fn to_target(&self) -> RepositoryTarget {
        RepositoryTarget {
            name: self.name.clone(),
            remote_link: self.remote_link.clone(),
            username: self.username.clone(),
            access_token: self.token.clone().unwrap_or_default(),
            local_path: self.local_path.clone().unwrap_or_default(),
            push_enabled: !self.no_push,
            pull_enabled: !self.no_pull,
            ..RepositoryTarget::default()
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SetArgs {
    /// Target id.
    #[arg(value_name = "ID")]
    pub id: TargetId,

    #[arg(long = "link", value_name = "LINK")]
    pub remote_link: Option<String>,

    #[arg(long = "path", value_name = "DIR")]
    pub local_path: Option<PathBuf>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Access token or password.
    #[arg(long)]
    pub token: Option<AccessToken>,

    /// Includes or excludes the target from `push`.
    #[arg(long, value_name = "BOOL")]
    pub push: Option<bool>,

    /// Includes or excludes the target from `pull`.
    #[arg(long, value_name = "BOOL")]
    pub pull: Option<bool>,
}

impl SetArgs {
    #[must_use]
    pub fn to_patch(&self) -> TargetPatch {
        TargetPatch {
            name: self.name.clone(),
            remote_link: self.remote_link.clone(),
            username: self.username.clone(),
            access_token: self.token.clone(),
            local_path: self.local_path.clone(),
            push_enabled: self.push,
            pull_enabled: self.pull,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RemoveArgs {
    /// Target id.
    #[arg(value_name = "ID")]
    pub id: TargetId,
}
