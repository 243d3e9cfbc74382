// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository targets.
//!
//! ```text
//! RepositoryTarget { id, name, remoteLink, username, accessToken,
//!                    localPath, pushEnabled, pullEnabled }
//!
//! TargetSet     ordered, add / update / remove, snapshot()
//! TargetStore   JSON persistence, atomic save, legacy migration
//! ```
//!
//! A target is plain data. Nothing here touches the network or the working
//! copy; validation that needs the filesystem is left to `git`.

pub mod set;
pub mod store;


use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::TargetError;

pub use set::{SharedTargets, TargetSet};
pub use store::TargetStore;

/// Stable identifier of a target within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(u32);

impl TargetId {
    /// Wraps a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this id has not been assigned by a [`TargetSet`] yet.
    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::str::FromStr for TargetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#').parse().map(Self)
    }
}

/// Access token or password. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the secret value. Only the command builder should call this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("AccessToken(<empty>)")
        } else {
            f.write_str("AccessToken([hidden])")
        }
    }
}

impl std::str::FromStr for AccessToken {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_empty() { "" } else { "[hidden]" })
    }
}

/// One repository to synchronize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepositoryTarget {
    pub id: TargetId,
    /// Display label; empty means derived from `local_path`.
    pub name: String,
    /// Host and path of the remote, e.g. `github.com/user/notes`.
    pub remote_link: String,
    pub username: String,
    pub access_token: AccessToken,
    pub local_path: PathBuf,
    pub push_enabled: bool,
    pub pull_enabled: bool,
}

impl Default for RepositoryTarget {
    fn default() -> Self {
        Self {
            id: TargetId::default(),
            name: String::new(),
            remote_link: String::new(),
            username: String::new(),
            access_token: AccessToken::default(),
            local_path: PathBuf::new(),
            push_enabled: true,
            pull_enabled: true,
        }
    }
}

impl RepositoryTarget {
    /// Label used in notices and reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        self.local_path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or_else(|| self.id.to_string(), str::to_string)
    }

    /// Remote URL without credentials.
    ///
    /// Links without a scheme are treated as `https`.
    #[must_use]
    pub fn remote_url(&self) -> String {
        let link = self.remote_link.trim();
        if link.contains("://") {
            link.to_string()
        } else {
            format!("https://{link}")
        }
    }

    /// Whether both halves of the credential pair are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.access_token.is_empty()
    }

    /// Whether the given operation direction is enabled for this target.
    #[must_use]
    pub const fn is_enabled_for(&self, kind: crate::sync::OperationKind) -> bool {
        match kind {
            crate::sync::OperationKind::Push => self.push_enabled,
            crate::sync::OperationKind::Pull => self.pull_enabled,
        }
    }

    /// Checks the fields needed to build a command.
    ///
    /// # Errors
    ///
    /// Returns `TargetError::Invalid` if the remote link or local path is empty.
    pub fn validate(&self) -> Result<(), TargetError> {
        if self.remote_link.trim().is_empty() {
            return Err(TargetError::Invalid {
                id: self.id,
                reason: "remote link is empty".to_string(),
            });
        }
        if self.local_path.as_os_str().is_empty() {
            return Err(TargetError::Invalid {
                id: self.id,
                reason: "local path is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Field-level edit from the configuration surface.
#[derive(Debug, Clone, Default)]
pub struct TargetPatch {
    pub name: Option<String>,
    pub remote_link: Option<String>,
    pub username: Option<String>,
    pub access_token: Option<AccessToken>,
    pub local_path: Option<PathBuf>,
    pub push_enabled: Option<bool>,
    pub pull_enabled: Option<bool>,
}

impl TargetPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.remote_link.is_none()
            && self.username.is_none()
            && self.access_token.is_none()
            && self.local_path.is_none()
            && self.push_enabled.is_none()
            && self.pull_enabled.is_none()
    }

    /// Applies the set fields to `target`.
    pub fn apply(self, target: &mut RepositoryTarget) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(link) = self.remote_link {
            target.remote_link = link;
        }
        if let Some(username) = self.username {
            target.username = username;
        }
        if let Some(token) = self.access_token {
            target.access_token = token;
        }
        if let Some(path) = self.local_path {
            target.local_path = path;
        }
        if let Some(enabled) = self.push_enabled {
            target.push_enabled = enabled;
        }
        if let Some(enabled) = self.pull_enabled {
            target.pull_enabled = enabled;
        }
    }
}
