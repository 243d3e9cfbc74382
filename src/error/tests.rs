// repo-sync: Multi-repository git synchronizer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, FailureKind, ProcessError, RepoSyncError, RepoSyncResult, TargetError};
use crate::target::TargetId;

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "sync".to_string(),
        key: "git".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"missing required config key 'git' in section '[sync]'");
}

#[test]
fn test_non_zero_exit_includes_stderr() {
    let err = ProcessError::NonZeroExit {
        command: "git pull --quiet https://example.com/repo".to_string(),
        code: 1,
        stdout: String::new(),
        stderr: "fatal: authentication failed\n".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"process 'git pull --quiet https://example.com/repo' exited with code 1: fatal: authentication failed"
    );
    assert_eq!(err.kind(), FailureKind::NonZeroExit);
    assert_eq!(err.exit_code(), Some(1));
}

#[test]
fn test_non_zero_exit_without_stderr() {
    let err = ProcessError::NonZeroExit {
        command: "git commit".to_string(),
        code: 1,
        stdout: "nothing to commit, working tree clean".to_string(),
        stderr: "  ".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"process 'git commit' exited with code 1");
    assert!(err.output_contains("nothing to commit"));
}

#[test]
fn test_process_error_kinds() {
    let spawn = ProcessError::SpawnFailed {
        command: "git".to_string(),
        source: std::io::Error::from(std::io::ErrorKind::NotFound),
    };
    let missing = ProcessError::ExecutableNotFound {
        name: "git".to_string(),
    };
    let timeout = ProcessError::Timeout {
        command: "git push".to_string(),
        timeout_secs: 5,
    };
    let stderr = ProcessError::UnexpectedStderr {
        command: "git pull".to_string(),
        stderr: "warning".to_string(),
    };
    assert_eq!(spawn.kind(), FailureKind::SpawnFailure);
    assert_eq!(missing.kind(), FailureKind::SpawnFailure);
    assert_eq!(timeout.kind(), FailureKind::Timeout);
    assert_eq!(stderr.kind(), FailureKind::UnexpectedStderr);
    assert_eq!(timeout.exit_code(), None);
}

#[test]
fn test_target_error_display() {
    let err = TargetError::Invalid {
        id: TargetId::new(3),
        reason: "remote link is empty".to_string(),
    };
    insta::assert_snapshot!(err.to_string(), @"target #3 is invalid: remote link is empty");
}

#[test]
fn test_boxed_conversion() {
    let err: RepoSyncError = TargetError::NotFound(TargetId::new(9)).into();
    assert!(matches!(err, RepoSyncError::Target(_)));
    insta::assert_snapshot!(err.to_string(), @"target error: target #9 not found");
}

#[test]
fn test_repo_sync_error_size() {
    // Box<str> variants (Bailed, Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<RepoSyncError>();
    assert!(size <= 24, "RepoSyncError is {size} bytes, expected <= 24");
}

#[test]
fn test_repo_sync_result_size() {
    let size = std::mem::size_of::<RepoSyncResult<()>>();
    assert!(size <= 24, "RepoSyncResult<()> is {size} bytes, expected <= 24");
}
