// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for daemon client behavior.

use super::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn paths() -> (TempDir, Paths) {
    let dir = tempdir().unwrap();
    let mut paths = Paths::for_state_dir(dir.path());
    paths.socket_path = dir.path().join("d.sock");
    (dir, paths)
}

/// connect() runs while a fresh daemon is still starting up, so it must
/// leave the pid file alone.
#[test]
fn connect_does_not_delete_pid_file() {
    let (_dir, paths) = paths();
    fs::write(&paths.lock_path, "12345\n").unwrap();

    let result = DaemonClient::connect(&paths);

    assert!(matches!(result, Err(ClientError::DaemonNotRunning)));
    assert!(paths.lock_path.exists(), "connect() must not delete pid file");
}

#[tokio::test]
async fn stopping_nothing_clears_a_stale_pid() {
    let (_dir, paths) = paths();
    fs::write(&paths.lock_path, "12345\n").unwrap();

    assert!(!daemon_stop(&paths).await.unwrap());
    assert!(!paths.lock_path.exists());
}

#[test]
fn pid_file_is_parsed_leniently() {
    let (_dir, paths) = paths();
    assert_eq!(read_daemon_pid(&paths), None);

    fs::write(&paths.lock_path, "4242\n").unwrap();
    assert_eq!(read_daemon_pid(&paths), Some(4242));

    fs::write(&paths.lock_path, "garbage").unwrap();
    assert_eq!(read_daemon_pid(&paths), None);
}

#[test]
fn startup_errors_come_from_the_latest_attempt() {
    let log = "\
--- choresd: starting (pid: 1)
ERROR Failed to start daemon: old problem
--- choresd: starting (pid: 2)
2026-05-01T00:00:00Z  INFO choresd: starting choresd in /tmp/state
ERROR Failed to start daemon: invalid config: scan_interval must be positive
";
    assert_eq!(
        startup_error_in(log).as_deref(),
        Some("invalid config: scan_interval must be positive")
    );
}

#[test]
fn clean_startup_has_no_error() {
    let log = "--- choresd: starting (pid: 7)\n2026-05-01T00:00:00Z  INFO choresd: daemon ready\n";
    assert_eq!(startup_error_in(log), None);
    assert_eq!(startup_error_in("no marker at all"), None);
}

#[test]
fn rejections_keep_their_reason() {
    let err = unexpected(Response::Rejected {
        action: "claim".to_string(),
        reason: BlockReason::NotMyTurn,
        message: "cannot claim: not_my_turn".to_string(),
    });
    match err {
        ClientError::Rejected { reason, message } => {
            assert_eq!(reason, BlockReason::NotMyTurn);
            assert_eq!(message, "cannot claim: not_my_turn");
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(matches!(unexpected(Response::Pong), ClientError::UnexpectedResponse));
}
