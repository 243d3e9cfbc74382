// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests the Config module with realistic TOML configurations.

use std::fs;
use std::time::Duration;

use repo_sync::config::Config;
use repo_sync::logging::LogLevel;
use repo_sync::sync::{CredentialMode, StderrPolicy};

// =============================================================================
// Loading from TOML strings
// =============================================================================

#[test]
fn config_parse_empty_is_default() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_parse_all_sections() {
    let toml = r#"
[global]
output_log_level = 4
file_log_level = 6
log_file = "logs/reposync.log"
log_format = "json"

[sync]
git = "/usr/local/bin/git"
timeout_secs = 45
max_concurrent = 3
stderr_policy = "lenient"
credential_mode = "url"
commit_message = "Notes snapshot {timestamp}"

[store]
path = "/var/lib/reposync/repos.json"
"#;
    let config = Config::parse(toml).unwrap();
    insta::assert_yaml_snapshot!(config, @r#"
    global:
      output_log_level: 4
      file_log_level: 6
      log_file: logs/reposync.log
      log_format: json
    sync:
      git: /usr/local/bin/git
      timeout_secs: 45
      max_concurrent: 3
      stderr_policy: lenient
      credential_mode: url
      commit_message: "Notes snapshot {timestamp}"
    store:
      path: /var/lib/reposync/repos.json
    "#);
}

#[test]
fn config_settings_follow_sync_section() {
    let config = Config::parse(
        r#"
[sync]
git = "git2"
timeout_secs = 0
credential_mode = "url"
"#,
    )
    .unwrap();

    let settings = config.sync.settings();
    assert_eq!(settings.git, "git2");
    assert_eq!(settings.timeout, None);
    assert_eq!(settings.credential_mode, CredentialMode::Url);

    let config = Config::parse("[sync]\ntimeout_secs = 7\n").unwrap();
    assert_eq!(config.sync.settings().timeout, Some(Duration::from_secs(7)));
}

// =============================================================================
// Rejection
// =============================================================================

#[test]
fn config_rejects_unknown_section_and_key() {
    assert!(Config::parse("[paths]\nprefix = \"/build\"\n").is_err());
    assert!(Config::parse("[sync]\nretries = 2\n").is_err());
}

#[test]
fn config_rejects_bad_enum_values() {
    assert!(Config::parse("[sync]\nstderr_policy = \"loose\"\n").is_err());
    assert!(Config::parse("[sync]\ncredential_mode = \"ssh\"\n").is_err());
}

#[test]
fn config_rejects_invalid_values() {
    let err = Config::parse("[sync]\ngit = \"  \"\n").unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'git' in section '[sync]': must not be empty"
    );

    let err = Config::parse("[store]\npath = \"\"\n").unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'path' in section '[store]': must not be empty"
    );
}

// =============================================================================
// Layering
// =============================================================================

#[test]
fn config_files_layer_in_order() {
    let temp = tempfile::tempdir().unwrap();
    let base = temp.path().join("base.toml");
    let site = temp.path().join("site.toml");
    fs::write(
        &base,
        "[sync]\ntimeout_secs = 10\nmax_concurrent = 4\n[global]\noutput_log_level = 2\n",
    )
    .unwrap();
    fs::write(&site, "[sync]\ntimeout_secs = 20\n").unwrap();

    let loader = Config::builder()
        .add_toml_file(&base)
        .add_toml_file(&site)
        .set_str("global.output_log_level=5")
        .unwrap();
    assert_eq!(loader.loaded_files().len(), 2);

    let config = loader.build().unwrap();
    assert_eq!(config.sync.timeout_secs, 20);
    assert_eq!(config.sync.max_concurrent, 4);
    assert_eq!(config.sync.stderr_policy, StderrPolicy::Strict);
    assert_eq!(config.global.output_log_level, LogLevel::TRACE);
}

#[test]
fn config_optional_file_may_be_absent() {
    let temp = tempfile::tempdir().unwrap();
    let loader = Config::builder().add_toml_file_optional(temp.path().join("reposync.toml"));
    assert!(loader.loaded_files().is_empty());
    assert_eq!(loader.build().unwrap(), Config::default());
}
