// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the `reposync` binary.
//!
//! Each test runs in its own temporary directory with its own store, and
//! with `REPOSYNC_*` variables cleared so the host environment cannot leak in.

use std::path::Path;
use std::process::{Command, Output};

use clap::Parser;
use repo_sync::cli::{Cli, Command as CliCommand};
use tempfile::TempDir;

fn reposync(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reposync"));
    cmd.current_dir(dir).args(args);
    for (key, _) in std::env::vars() {
        if key.starts_with("REPOSYNC_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run reposync")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn cli_version_alias() {
    let cli = Cli::try_parse_from(["reposync", "-v"]).unwrap();
    assert!(matches!(cli.command, Some(CliCommand::Version)));
}

#[test]
fn cli_sync_accepts_globals_anywhere() {
    let cli = Cli::try_parse_from([
        "reposync",
        "--store",
        "a.json",
        "sync",
        "--only",
        "notes",
        "--log-level",
        "4",
    ])
    .unwrap();
    assert_eq!(cli.global.log_level, Some(4));
    assert!(matches!(cli.command, Some(CliCommand::Sync(ref args)) if args.only == ["notes"]));
}

#[test]
fn cli_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["reposync", "fetch"]).is_err());
}

#[test]
fn cli_config_files_command() {
    let cli = Cli::try_parse_from(["reposync", "config-files"]).unwrap();
    assert!(matches!(cli.command, Some(CliCommand::ConfigFiles)));
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn binary_prints_version() {
    let temp = temp_dir();
    let output = run(&mut reposync(temp.path(), &["version"]));
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn binary_targets_round_trip_through_store() {
    let temp = temp_dir();

    let add = run(reposync(
        temp.path(),
        &[
            "targets",
            "add",
            "--link",
            "github.com/alice/notes",
            "--path",
            "/home/alice/notes",
            "-u",
            "alice",
        ],
    )
    .env("REPOSYNC_TOKEN", "hunter2"));
    assert!(add.status.success(), "{add:?}");
    assert_eq!(stdout(&add).trim(), "Added target #1");

    let set = run(&mut reposync(
        temp.path(),
        &["targets", "set", "1", "--pull", "false", "--name", "journal"],
    ));
    assert!(set.status.success(), "{set:?}");

    let list = run(&mut reposync(temp.path(), &["targets", "list", "--json"]));
    assert!(list.status.success(), "{list:?}");
    let listed = stdout(&list);
    assert!(!listed.contains("hunter2"));
    let views: serde_json::Value = serde_json::from_str(&listed).unwrap();
    insta::assert_json_snapshot!(views, @r#"
    [
      {
        "hasToken": true,
        "id": 1,
        "localPath": "/home/alice/notes",
        "name": "journal",
        "pullEnabled": false,
        "pushEnabled": true,
        "remoteLink": "github.com/alice/notes",
        "username": "alice"
      }
    ]
    "#);

    let stored = std::fs::read_to_string(temp.path().join("repos.json")).unwrap();
    assert!(stored.contains("\"accessToken\": \"hunter2\""), "{stored}");

    let remove = run(&mut reposync(temp.path(), &["targets", "remove", "#1"]));
    assert!(remove.status.success(), "{remove:?}");
    let list = run(&mut reposync(temp.path(), &["targets", "list"]));
    assert_eq!(stdout(&list).trim(), "No targets configured");
}

#[test]
fn binary_unknown_target_fails() {
    let temp = temp_dir();
    let output = run(&mut reposync(temp.path(), &["targets", "remove", "9"]));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("target #9 not found"));
}

#[test]
fn binary_options_reflect_every_layer() {
    let temp = temp_dir();
    std::fs::write(
        temp.path().join("reposync.toml"),
        "[sync]\nmax_concurrent = 2\ntimeout_secs = 10\n",
    )
    .unwrap();
    std::fs::write(temp.path().join("extra.toml"), "[sync]\ntimeout_secs = 20\n").unwrap();

    let output = run(reposync(
        temp.path(),
        &[
            "--config",
            "extra.toml",
            "--set",
            "sync.credential_mode=url",
            "options",
        ],
    )
    .env("REPOSYNC_SYNC__STDERR_POLICY", "lenient")
    .env("REPOSYNC_TOKEN", "not-a-config-key"));
    assert!(output.status.success(), "{output:?}");

    let options = stdout(&output);
    let find = |key: &str| {
        options
            .lines()
            .find(|line| line.starts_with(key))
            .map(|line| line.split_once(" = ").map_or("", |(_, v)| v).to_string())
    };
    assert_eq!(find("sync.max_concurrent").as_deref(), Some("2"));
    assert_eq!(find("sync.timeout_secs").as_deref(), Some("20"));
    assert_eq!(find("sync.stderr_policy").as_deref(), Some("lenient"));
    assert_eq!(find("sync.credential_mode").as_deref(), Some("url"));
}

#[test]
fn binary_rejects_unknown_config_key() {
    let temp = temp_dir();
    std::fs::write(temp.path().join("reposync.toml"), "[sync]\nparallel = 3\n").unwrap();

    let output = run(&mut reposync(temp.path(), &["options"]));
    assert!(!output.status.success());

    let skipped = run(&mut reposync(temp.path(), &["--no-default-config", "options"]));
    assert!(skipped.status.success(), "{skipped:?}");
}

#[test]
fn binary_push_unknown_target_fails() {
    let temp = temp_dir();
    let output = run(&mut reposync(temp.path(), &["push", "--target", "9"]));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("target #9 not found"));
}

#[test]
fn binary_lone_target_runs_despite_disabled_direction() {
    let temp = temp_dir();
    let missing = temp.path().join("missing");
    let add = run(&mut reposync(
        temp.path(),
        &[
            "targets",
            "add",
            "--link",
            "github.com/alice/notes",
            "--path",
            missing.to_str().unwrap(),
            "--no-push",
        ],
    ));
    assert!(add.status.success(), "{add:?}");

    let bulk = run(&mut reposync(temp.path(), &["push", "--json"]));
    assert!(bulk.status.success(), "{bulk:?}");
    let reports: serde_json::Value = serde_json::from_str(&stdout(&bulk)).unwrap();
    assert_eq!(reports[0]["outcomes"].as_array().map(Vec::len), Some(0));

    // The working copy does not exist, so the triggered push runs and fails.
    let manual = run(&mut reposync(temp.path(), &["push", "--target", "1", "--json"]));
    assert!(!manual.status.success());
    let reports: serde_json::Value = serde_json::from_str(&stdout(&manual)).unwrap();
    assert_eq!(reports[0]["outcomes"].as_array().map(Vec::len), Some(1));
    assert_eq!(reports[0]["failed"], 1);
}

#[test]
fn binary_push_with_no_targets_succeeds() {
    let temp = temp_dir();
    let output = run(&mut reposync(temp.path(), &["push", "--json"]));
    assert!(output.status.success(), "{output:?}");
    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    insta::assert_json_snapshot!(reports, @r#"
    [
      {
        "failed": 0,
        "kind": "push",
        "outcomes": [],
        "succeeded": 0
      }
    ]
    "#);
}
