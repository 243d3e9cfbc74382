// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::git;
use crate::target::RepositoryTarget;

/// One status line for a target.
#[must_use]
pub fn status_line(target: &RepositoryTarget) -> String {
    let state = match git::inspect(&target.local_path) {
        Ok(status) => status.to_string(),
        Err(e) => format!("unavailable ({e})"),
    };
    format!("{} {}: {state}", target.id, target.display_name())
}

/// Prints branch and dirty state of every target.
///
/// # Errors
///
/// Returns an error if the target store cannot be loaded.
pub fn run_status_command(config: &Config) -> Result<()> {
    let (_, set) = super::load_targets(config)?;
    if set.is_empty() {
        println!("No targets configured");
        return Ok(());
    }
    for target in set.iter() {
        println!("{}", status_line(target));
    }
    Ok(())
}
