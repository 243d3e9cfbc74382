// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Narrowing a run to some targets.
//!
//! ```text
//! ids ["#2"] + patterns ["work-*"]
//!   target matches if its id is listed
//!   or its display name equals / glob-matches a pattern
//! empty filter --> every target
//! ```

use anyhow::Context;
use wax::{Glob, Program};

use crate::error::Result;
use crate::target::{RepositoryTarget, TargetId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFilter {
    ids: Vec<TargetId>,
    patterns: Vec<String>,
}

impl TargetFilter {
    /// Matches every target.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a filter, checking that every pattern is a valid glob.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid pattern.
    pub fn new(ids: Vec<TargetId>, patterns: Vec<String>) -> Result<Self> {
        for pattern in &patterns {
            Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
        }
        Ok(Self { ids, patterns })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.patterns.is_empty()
    }

    #[must_use]
    pub fn matches(&self, target: &RepositoryTarget) -> bool {
        if self.is_empty() || self.ids.contains(&target.id) {
            return true;
        }
        let name = target.display_name();
        self.patterns.iter().any(|pattern| {
            *pattern == name
                || Glob::new(pattern).is_ok_and(|glob| glob.is_match(name.as_str()))
        })
    }
}
