//! Error reporting specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn unknown_subcommand_fails() {
    let temp = Project::empty();

    temp.command()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn unknown_chore_is_reported() {
    let temp = Project::household();

    temp.chores()
        .args(&["claim", "ada", "laundry"])
        .fails()
        .stderr_has("laundry");
}

#[test]
fn unknown_kid_is_reported() {
    let temp = Project::household();

    temp.chores()
        .args(&["kid", "chores", "zed"])
        .fails()
        .stderr_has("zed");
}

#[test]
fn due_date_needs_a_date_or_clear() {
    let temp = Project::household();

    temp.chores()
        .args(&["chore", "due", "dishes"])
        .fails()
        .stderr_has("--clear");
}

#[test]
fn unparseable_due_date_fails() {
    let temp = Project::household();

    temp.chores()
        .args(&["chore", "due", "dishes", "someday"])
        .fails()
        .stderr_has("not a date or duration");
}

#[test]
fn manifest_with_unknown_kid_fails() {
    let temp = Project::empty();
    temp.file(
        "bad.toml",
        "[[chores]]\nid = \"dishes\"\nname = \"Dishes\"\nassigned_kids = [\"zed\"]\n",
    );

    temp.chores()
        .args(&["chore", "apply", "bad.toml"])
        .fails()
        .stderr_has("zed");
}
