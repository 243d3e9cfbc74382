// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the run commands.

use clap::Args;

use crate::sync::MergeStrategy;
use crate::target::TargetId;

/// Arguments shared by `push`, `pull` and `sync`.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Only runs targets whose name matches GLOB.
    /// Can be specified multiple times.
    #[arg(long = "only", value_name = "GLOB", action = clap::ArgAction::Append)]
    pub only: Vec<String>,

    /// Only runs the target with this id (`3` or `#3`).
    /// Can be specified multiple times. A single `--target` without
    /// `--only` runs that target even if this direction is disabled for it.
    #[arg(short = 't', long = "target", value_name = "ID", action = clap::ArgAction::Append)]
    pub targets: Vec<TargetId>,

    /// Prints the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `strategy`.
#[derive(Debug, Clone, Args)]
pub struct StrategyArgs {
    /// What `git pull` does with diverged histories.
    #[arg(value_enum)]
    pub strategy: MergeStrategy,

    /// Target id.
    #[arg(value_name = "ID")]
    pub target: TargetId,
}
