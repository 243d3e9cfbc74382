// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Targets command implementation.

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::cli::targets::{TargetsArgs, TargetsSubcommand};
use crate::config::Config;
use crate::error::Result;
use crate::target::{RepositoryTarget, TargetId, TargetSet, TargetStore};

/// Listing row; never carries the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetView {
    pub id: TargetId,
    pub name: String,
    pub remote_link: String,
    pub username: String,
    pub has_token: bool,
    pub local_path: PathBuf,
    pub push_enabled: bool,
    pub pull_enabled: bool,
}

impl From<&RepositoryTarget> for TargetView {
    fn from(target: &RepositoryTarget) -> Self {
        Self {
            id: target.id,
            name: target.display_name(),
            remote_link: target.remote_link.clone(),
            username: target.username.clone(),
            has_token: !target.access_token.is_empty(),
            local_path: target.local_path.clone(),
            push_enabled: target.push_enabled,
            pull_enabled: target.pull_enabled,
        }
    }
}

/// Renders the target list as aligned columns.
#[must_use]
pub fn format_targets(set: &TargetSet) -> Vec<String> {
    let rows: Vec<[String; 5]> = set
        .iter()
        .map(|t| {
            let mut modes = Vec::new();
            if t.push_enabled {
                modes.push("push");
            }
            if t.pull_enabled {
                modes.push("pull");
            }
            [
                t.id.to_string(),
                t.display_name(),
                if modes.is_empty() {
                    "-".to_string()
                } else {
                    modes.join(",")
                },
                t.remote_link.clone(),
                t.local_path.display().to_string(),
            ]
        })
        .collect();

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|[id, name, modes, link, path]| {
            format!(
                "{id:<w0$}  {name:<w1$}  {modes:<w2$}  {link:<w3$}  {path}",
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
                w3 = widths[3],
            )
        })
        .collect()
}

/// Main handler for the `targets` command.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded or saved, or the id given
/// to `set` or `remove` does not exist.
pub fn run_targets_command(args: &TargetsArgs, config: &Config) -> Result<()> {
    let (store, mut set) = super::load_targets(config)?;

    match &args.subcommand {
        TargetsSubcommand::List(list) => {
            if list.json {
                let views: Vec<TargetView> = set.iter().map(TargetView::from).collect();
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if set.is_empty() {
                println!("No targets configured");
            } else {
                for line in format_targets(&set) {
                    println!("{line}");
                }
            }
            Ok(())
        }
        TargetsSubcommand::Add(add) => {
            let id = set.add(add.to_target());
            save(&store, &set)?;
            info!(target = %id, "target added");
            println!("Added target {id}");
            Ok(())
        }
        TargetsSubcommand::Set(edit) => {
            let patch = edit.to_patch();
            if patch.is_empty() {
                anyhow::bail!("nothing to change for target {}", edit.id);
            }
            set.update(edit.id, patch)?;
            save(&store, &set)?;
            info!(target = %edit.id, "target updated");
            println!("Updated target {}", edit.id);
            Ok(())
        }
        TargetsSubcommand::Remove(remove) => {
            let removed = set.remove(remove.id)?;
            save(&store, &set)?;
            info!(target = %remove.id, "target removed");
            println!("Removed target {} ({})", removed.id, removed.display_name());
            Ok(())
        }
    }
}

fn save(store: &TargetStore, set: &TargetSet) -> Result<()> {
    store.save(set)?;
    Ok(())
}
