// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Target persistence.
//!
//! ```text
//! repos.json
//! {
//!   "version": 1,
//!   "nextId": 3,
//!   "repos": [ { "id": 1, "remoteLink": "...", ... }, ... ]
//! }
//!
//! load(): missing file  --> empty set
//!         legacy object --> one-element set (gitLink/gitKey/gitFolderPath)
//!         version > 1   --> UnsupportedVersion
//! save(): temp file in same dir --> rename over the old file
//! ```
//!
//! The file holds access tokens in plain text. The temp file is created
//! with owner-only permissions on Unix and the rename keeps them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{AccessToken, RepositoryTarget, TargetSet};
use crate::error::StoreError;

/// Newest document version this build reads and writes.
pub const STORE_VERSION: u32 = 1;

const fn default_version() -> u32 {
    1
}

/// On-disk document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    next_id: u32,
    #[serde(default)]
    repos: Vec<RepositoryTarget>,
}

/// Settings written by the single-repository predecessor.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacySettings {
    git_link: String,
    username: String,
    git_key: String,
    git_folder_path: String,
}

impl From<LegacySettings> for RepositoryTarget {
    fn from(legacy: LegacySettings) -> Self {
        Self {
            remote_link: legacy.git_link,
            username: legacy.username,
            access_token: AccessToken::new(legacy.git_key),
            local_path: PathBuf::from(legacy.git_folder_path),
            ..Self::default()
        }
    }
}

/// Loads and saves the target collection.
#[derive(Debug, Clone)]
pub struct TargetStore {
    path: PathBuf,
}

impl TargetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the collection. A missing file yields an empty collection.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the file cannot be read, is malformed, holds
    /// duplicate ids, or was written by a newer version.
    pub fn load(&self) -> Result<TargetSet, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "target store missing, starting empty");
            return Ok(TargetSet::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let set = self.parse(&content)?;
        debug!(path = %self.path.display(), targets = set.len(), "loaded target store");
        Ok(set)
    }

    /// Parses a store document.
    ///
    /// # Errors
    ///
    /// See [`TargetStore::load`].
    pub fn parse(&self, content: &str) -> Result<TargetSet, StoreError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| self.parse_error(e.to_string()))?;

        if is_legacy(&value) {
            let legacy: LegacySettings =
                serde_json::from_value(value).map_err(|e| self.parse_error(e.to_string()))?;
            info!(path = %self.path.display(), "migrating single-repository settings");
            return Ok(TargetSet::restore(1, vec![legacy.into()]));
        }

        let document: StoreDocument =
            serde_json::from_value(value).map_err(|e| self.parse_error(e.to_string()))?;

        if document.version > STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                found: document.version,
                supported: STORE_VERSION,
            });
        }

        let mut seen = BTreeSet::new();
        for target in &document.repos {
            if !target.id.is_unassigned() && !seen.insert(target.id) {
                return Err(self.parse_error(format!("duplicate target id {}", target.id)));
            }
        }

        Ok(TargetSet::restore(document.next_id, document.repos))
    }

    /// Writes the collection atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Write` if the directory, temp file, or rename fails.
    pub fn save(&self, set: &TargetSet) -> Result<(), StoreError> {
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let document = StoreDocument {
            version: STORE_VERSION,
            next_id: set.next_id(),
            repos: set.iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| write_err(std::io::Error::other(e)))?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(write_err)?;

        let mut file = tempfile::NamedTempFile::new_in(&parent).map_err(write_err)?;
        file.write_all(json.as_bytes()).map_err(write_err)?;
        file.write_all(b"\n").map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), targets = set.len(), "saved target store");
        Ok(())
    }

    fn parse_error(&self, message: String) -> StoreError {
        StoreError::Parse {
            path: self.path.clone(),
            message,
        }
    }
}

/// A legacy document is a flat object with the old field names and no `repos`.
fn is_legacy(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|obj| {
        !obj.contains_key("repos")
            && ["gitLink", "gitKey", "gitFolderPath"]
                .iter()
                .any(|key| obj.contains_key(*key))
    })
}
