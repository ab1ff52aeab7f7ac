//! Help and completion specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("claim"))
        .stdout(predicate::str::contains("approve"))
        .stdout(predicate::str::contains("rotation"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn version_flag() {
    let temp = Project::empty();

    temp.command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("chores "));
}

#[test]
fn completions_do_not_need_a_daemon() {
    let temp = Project::empty();

    temp.chores()
        .args(&["completions", "bash"])
        .passes()
        .stdout_has("chores");
    assert!(!temp.state_dir().join("choresd.pid").exists());
}
