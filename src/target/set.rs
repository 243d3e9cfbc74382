// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Ordered target collection.
//!
//! ```text
//! add()     --> append, assign next id (ids are never reused)
//! update()  --> patch in place
//! remove()  --> delete at any index
//! snapshot() --> Arc<[RepositoryTarget]> read by one run
//! ```

use std::sync::{Arc, RwLock};

use super::{RepositoryTarget, TargetId, TargetPatch};
use crate::error::TargetError;

/// Handle shared by the configuration surface and the orchestrator.
pub type SharedTargets = Arc<RwLock<TargetSet>>;

/// Ordered collection of repository targets with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    next_id: u32,
    targets: Vec<RepositoryTarget>,
}

impl Default for TargetSet {
    fn default() -> Self {
        Self {
            next_id: 1,
            targets: Vec::new(),
        }
    }
}

impl TargetSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a collection from persisted parts.
    ///
    /// Targets with an unassigned id get a fresh one; `next_id` is raised
    /// past the highest id present. Callers must reject duplicate ids first.
    #[must_use]
    pub fn restore(next_id: u32, targets: Vec<RepositoryTarget>) -> Self {
        let highest = targets.iter().map(|t| t.id.get()).max().unwrap_or(0);
        let mut set = Self {
            next_id: next_id.max(highest.saturating_add(1)).max(1),
            targets: Vec::with_capacity(targets.len()),
        };
        for mut target in targets {
            if target.id.is_unassigned() {
                target.id = set.allocate_id();
            }
            set.targets.push(target);
        }
        set
    }

    /// Wraps this collection in a shareable handle.
    #[must_use]
    pub fn into_shared(self) -> SharedTargets {
        Arc::new(RwLock::new(self))
    }

    fn allocate_id(&mut self) -> TargetId {
        let id = TargetId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Appends a target, assigning it the next id.
    pub fn add(&mut self, mut target: RepositoryTarget) -> TargetId {
        let id = self.allocate_id();
        target.id = id;
        self.targets.push(target);
        id
    }

    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&RepositoryTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Applies a field-level edit.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::NotFound` if no target has this id.
    pub fn update(&mut self, id: TargetId, patch: TargetPatch) -> Result<&RepositoryTarget, TargetError> {
        let target = self
            .targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TargetError::NotFound(id))?;
        patch.apply(target);
        Ok(target)
    }

    /// Removes a target, preserving the order of the others.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::NotFound` if no target has this id.
    pub fn remove(&mut self, id: TargetId) -> Result<RepositoryTarget, TargetError> {
        let index = self
            .targets
            .iter()
            .position(|t| t.id == id)
            .ok_or(TargetError::NotFound(id))?;
        Ok(self.targets.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepositoryTarget> {
        self.targets.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Id the next added target will get.
    #[must_use]
    pub const fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Immutable copy for one run.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[RepositoryTarget]> {
        Arc::from(self.targets.as_slice())
    }
}
