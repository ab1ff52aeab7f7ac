//! Daemon logs specs
//!
//! Verify the daemon log and startup failure reporting.

use crate::prelude::*;

#[test]
fn daemon_logs_shows_startup_marker() {
    let temp = Project::empty();
    temp.chores().args(&["daemon", "start"]).passes();

    temp.chores()
        .args(&["daemon", "logs", "--lines", "10"])
        .passes()
        .stdout_has("choresd: starting");
}

#[test]
fn daemon_logs_without_log_file() {
    let temp = Project::empty();

    temp.chores()
        .args(&["daemon", "logs"])
        .passes()
        .stdout_has("No log at");
}

#[test]
fn bad_config_surfaces_the_startup_error() {
    let temp = Project::empty();
    temp.file("state/choresd.toml", "scan_interval = \"0s\"\n");

    temp.chores()
        .args(&["kid", "list"])
        .fails()
        .stderr_has("scan_interval must be positive");
}

#[test]
fn unknown_config_keys_are_rejected() {
    let temp = Project::empty();
    temp.file("state/choresd.toml", "scan_intreval = \"30s\"\n");

    temp.chores()
        .args(&["daemon", "start"])
        .fails()
        .stderr_has("invalid config");
}
