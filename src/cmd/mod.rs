// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   sync (push, pull, sync, strategy), targets, status, config
//!        |
//!        v
//!   TargetStore::load --> TargetSet --> Orchestrator / edits --> save
//! ```

pub mod config;
pub mod status;
pub mod sync;
pub mod targets;


use anyhow::Context;

use crate::config::Config;
use crate::error::Result;
use crate::target::{TargetSet, TargetStore};

/// Opens the configured store and loads its targets.
///
/// # Errors
///
/// Returns an error if the store exists but cannot be read or parsed.
pub fn load_targets(config: &Config) -> Result<(TargetStore, TargetSet)> {
    let store = TargetStore::new(&config.store.path);
    let set = store
        .load()
        .with_context(|| format!("failed to open targets from {}", store.path().display()))?;
    Ok((store, set))
}
