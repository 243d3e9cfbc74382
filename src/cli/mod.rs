// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for repo-sync using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! reposync [global options] <command>
//! push     [--only GLOB]... [--target ID]... [--json]
//! pull     [--only GLOB]... [--target ID]... [--json]
//! sync     [--only GLOB]... [--target ID]... [--json]
//! strategy {merge|rebase} ID
//! targets  {list|add|set ID|remove ID}
//! status
//! options | config-files | version
//! ```

pub mod global;
pub mod sync;
pub mod targets;


use crate::cli::global::GlobalOptions;
use crate::cli::sync::{RunArgs, StrategyArgs};
use crate::cli::targets::TargetsArgs;
use clap::{Parser, Subcommand};

/// Multi-repository git push/pull synchronizer.
#[derive(Debug, Parser)]
#[command(
    name = "reposync",
    author,
    version,
    about = "Multi-repository git synchronizer",
    long_about = "repo-sync Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Commits and pushes, or pulls, every configured repository.\n\n\
                  Register working copies with `reposync targets add`, then run\n\
                  `reposync sync` to push local changes and pull remote ones. See\n\
                  `reposync <command> --help` for more information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  reposync reads `reposync.toml` from the current directory if it\n\
                  exists, then every file given with --config, in order. Variables\n\
                  named REPOSYNC_<SECTION>__<KEY> and --set section.key=value come\n\
                  last. Use --no-default-config to skip `reposync.toml`."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files that were loaded.
    ConfigFiles,

    /// Commits all changes and pushes every push-enabled target.
    Push(RunArgs),

    /// Pulls every pull-enabled target.
    Pull(RunArgs),

    /// Pushes, then pulls.
    Sync(RunArgs),

    /// Sets the pull merge strategy of one target.
    Strategy(StrategyArgs),

    /// Manages the list of targets.
    Targets(TargetsArgs),

    /// Shows branch and working copy state of every target.
    Status,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
