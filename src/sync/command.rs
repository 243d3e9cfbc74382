// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git argument vectors for one target.
//!
//! ```text
//! git add .
//! git diff --cached --quiet
//! git commit --quiet -m <message>
//! git [-c credential.helper= -c credential.helper=<helper>] push --quiet <url> HEAD
//! git [-c credential.helper= -c credential.helper=<helper>] pull --quiet <url>
//! git config pull.rebase <true|false>
//! ```
//!
//! Every invocation runs in the target's working copy with prompts disabled.

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use super::runner::Invocation;
use super::{CredentialMode, MergeStrategy, SyncSettings};
use crate::error::TargetError;
use crate::target::RepositoryTarget;

/// Child environment variable holding the username in helper mode.
pub const USERNAME_ENV: &str = "REPOSYNC_GIT_USERNAME";
/// Child environment variable holding the token in helper mode.
pub const TOKEN_ENV: &str = "REPOSYNC_GIT_TOKEN";

/// Answers `get` requests from the two variables above and ignores
/// `store`/`erase`.
const INLINE_HELPER: &str = "!f() { test \"$1\" = get && \
printf 'username=%s\\npassword=%s\\n' \"$REPOSYNC_GIT_USERNAME\" \"$REPOSYNC_GIT_TOKEN\"; }; f";

/// Applied to every git invocation.
const NON_INTERACTIVE_ENV: [(&str, &str); 2] =
    [("GIT_TERMINAL_PROMPT", "0"), ("GCM_INTERACTIVE", "never")];

const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

/// Renders a commit message template for the given instant.
///
/// A template without `{timestamp}` gets the instant appended, so every
/// commit carries one.
#[must_use]
pub fn commit_message(template: &str, now: DateTime<Utc>) -> String {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    if template.contains(TIMESTAMP_PLACEHOLDER) {
        template.replace(TIMESTAMP_PLACEHOLDER, &stamp)
    } else {
        format!("{} {stamp}", template.trim_end())
    }
}

/// Builds the git invocations for one target.
#[derive(Debug, Clone, Copy)]
pub struct GitCommands<'a> {
    settings: &'a SyncSettings,
    target: &'a RepositoryTarget,
}

impl<'a> GitCommands<'a> {
    #[must_use]
    pub const fn new(settings: &'a SyncSettings, target: &'a RepositoryTarget) -> Self {
        Self { settings, target }
    }

    fn git(&self) -> Invocation {
        NON_INTERACTIVE_ENV.iter().fold(
            Invocation::new(&self.settings.git, &self.target.local_path)
                .timeout(self.settings.timeout),
            |inv, (key, value)| inv.env(*key, *value),
        )
    }

    #[must_use]
    pub fn stage_all(&self) -> Invocation {
        self.git().args(["add", "."])
    }

    /// Exits 0 when nothing is staged and 1 when something is.
    #[must_use]
    pub fn staged_changes(&self) -> Invocation {
        self.git().args(["diff", "--cached", "--quiet"])
    }

    #[must_use]
    pub fn commit(&self, message: &str) -> Invocation {
        self.git().args(["commit", "--quiet", "-m", message])
    }

    /// # Errors
    ///
    /// Returns `TargetError::Invalid` if credentials must go into a URL that
    /// cannot hold them.
    pub fn push(&self) -> Result<Invocation, TargetError> {
        self.remote("push", &["HEAD"])
    }

    /// # Errors
    ///
    /// See [`GitCommands::push`].
    pub fn pull(&self) -> Result<Invocation, TargetError> {
        self.remote("pull", &[])
    }

    /// Writes `pull.rebase` into the working copy's local configuration.
    #[must_use]
    pub fn set_merge_strategy(&self, strategy: MergeStrategy) -> Invocation {
        self.git()
            .args(["config", "pull.rebase", strategy.rebase_value()])
    }

    fn remote(&self, subcommand: &str, trailing: &[&str]) -> Result<Invocation, TargetError> {
        let url = self.target.remote_url();
        let mut inv = self.git();

        let url = if self.wants_credentials(&url) {
            match self.settings.credential_mode {
                CredentialMode::Helper => {
                    inv = inv
                        .args([
                            "-c".to_string(),
                            "credential.helper=".to_string(),
                            "-c".to_string(),
                            format!("credential.helper={INLINE_HELPER}"),
                        ])
                        .env(USERNAME_ENV, self.target.username.as_str())
                        .env(TOKEN_ENV, self.target.access_token.expose());
                    url
                }
                CredentialMode::Url => self.authenticated_url(&url)?,
            }
        } else {
            url
        };

        Ok(inv
            .args([subcommand, "--quiet"])
            .args([url])
            .args(trailing.iter().copied()))
    }

    fn wants_credentials(&self, url: &str) -> bool {
        self.target.has_credentials()
            && Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
    }

    fn authenticated_url(&self, url: &str) -> Result<String, TargetError> {
        let invalid = |reason: &str| TargetError::Invalid {
            id: self.target.id,
            reason: reason.to_string(),
        };
        let mut parsed = Url::parse(url).map_err(|_| invalid("remote link is not a valid URL"))?;
        parsed
            .set_username(&self.target.username)
            .map_err(|()| invalid("remote URL cannot carry a username"))?;
        parsed
            .set_password(Some(self.target.access_token.expose()))
            .map_err(|()| invalid("remote URL cannot carry a password"))?;
        Ok(parsed.into())
    }
}
