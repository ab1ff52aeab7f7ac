//! Daemon lifecycle specs
//!
//! Verify daemon start/stop/status lifecycle.

use crate::prelude::*;

#[test]
fn daemon_status_when_not_running() {
    let temp = Project::empty();

    temp.chores()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_start_reports_success() {
    let temp = Project::empty();

    temp.chores()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon started");
}

#[test]
fn daemon_start_twice_reports_already_running() {
    let temp = Project::empty();
    temp.chores().args(&["daemon", "start"]).passes();

    temp.chores()
        .args(&["daemon", "start"])
        .passes()
        .stdout_has("Daemon already running");
}

#[test]
fn daemon_status_shows_running_details() {
    let temp = Project::household();

    temp.chores()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Status: running")
        .stdout_has("Uptime:")
        .stdout_has("Version:")
        .stdout_has("Kids: 2")
        .stdout_has("Chores: 3");
}

#[test]
fn daemon_status_json() {
    let temp = Project::empty();
    temp.chores().args(&["daemon", "start"]).passes();

    let run = temp.chores().args(&["-o", "json", "daemon", "status"]).passes();
    assert_eq!(run.json()["status"], "running");
}

#[test]
fn daemon_stop_reports_success() {
    let temp = Project::empty();
    temp.chores().args(&["daemon", "start"]).passes();

    temp.chores()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon stopped");
}

#[test]
fn daemon_status_after_stop() {
    let temp = Project::empty();
    temp.chores().args(&["daemon", "start"]).passes();
    temp.chores().args(&["daemon", "stop"]).passes();

    temp.chores()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_stop_when_not_running() {
    let temp = Project::empty();

    temp.chores()
        .args(&["daemon", "stop"])
        .passes()
        .stdout_has("Daemon not running");
}

#[test]
fn daemon_stop_removes_pid_file() {
    let temp = Project::empty();
    temp.chores().args(&["daemon", "start"]).passes();
    let pid_file = temp.state_dir().join("choresd.pid");
    assert!(pid_file.exists());

    temp.chores().args(&["daemon", "stop"]).passes();

    assert!(wait_for(2000, || !pid_file.exists()));
}

#[test]
fn commands_start_the_daemon_on_demand() {
    let temp = Project::empty();

    temp.chores().args(&["kid", "list"]).passes().stdout_has("No kids");
    temp.chores()
        .args(&["daemon", "status"])
        .passes()
        .stdout_has("Status: running");
}

#[test]
fn household_survives_a_restart() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "dishes"]).passes();
    temp.chores().args(&["daemon", "stop"]).passes();

    temp.chores()
        .args(&["kid", "show", "ada", "dishes"])
        .passes()
        .stdout_has("State: claimed");
}
