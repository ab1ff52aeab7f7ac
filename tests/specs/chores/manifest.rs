//! Manifest and kid management specs

use crate::prelude::*;

#[test]
fn applying_a_manifest_reports_counts() {
    let temp = Project::empty();
    temp.file("household.toml", HOUSEHOLD);

    temp.chores()
        .args(&["chore", "apply", "household.toml"])
        .passes()
        .stdout_has("2 kids, 3 chores created, 0 updated");
}

#[test]
fn reapplying_updates_instead_of_creating() {
    let temp = Project::household();

    temp.chores()
        .args(&["chore", "apply", "household.toml"])
        .passes()
        .stdout_has("0 chores created, 3 updated");
}

#[test]
fn kid_list_shows_names() {
    let temp = Project::household();

    temp.chores()
        .args(&["kid", "list"])
        .passes()
        .stdout_has("Ada")
        .stdout_has("Bo");
}

#[test]
fn kid_list_json() {
    let temp = Project::household();

    let run = temp.chores().args(&["-o", "json", "kid", "list"]).passes();
    let kids = run.json();
    assert_eq!(kids[0]["id"], "ada");
    assert_eq!(kids[1]["name"], "Bo");
}

#[test]
fn adding_a_kid_twice_renames() {
    let temp = Project::empty();

    temp.chores()
        .args(&["kid", "add", "cy"])
        .passes()
        .stdout_has("Kid added: cy");
    temp.chores()
        .args(&["kid", "add", "cy", "--name", "Cyrus"])
        .passes()
        .stdout_has("Kid updated: cy");
    temp.chores()
        .args(&["kid", "list"])
        .passes()
        .stdout_has("Cyrus");
}

#[test]
fn removing_a_kid_unassigns_their_chores() {
    let temp = Project::household();

    temp.chores()
        .args(&["kid", "remove", "bo"])
        .fails()
        .stderr_has("rotation chore trash needs at least 2 kids");
    temp.chores().args(&["chore", "remove", "trash"]).passes();
    temp.chores()
        .args(&["kid", "remove", "bo"])
        .passes()
        .stdout_has("Kid removed: bo");
    temp.chores()
        .args(&["chore", "show", "bed"])
        .passes()
        .stdout_has("Ada")
        .stdout_lacks("Bo");
}

#[test]
fn chore_list_and_show() {
    let temp = Project::household();

    temp.chores()
        .args(&["chore", "list"])
        .passes()
        .stdout_has("dishes")
        .stdout_has("shared_first")
        .stdout_has("rotation_simple");
    temp.chores()
        .args(&["chore", "show", "dishes"])
        .passes()
        .stdout_has("Chore: Dishes (dishes)")
        .stdout_has("Points: 5");
}

#[test]
fn removed_chore_is_gone() {
    let temp = Project::household();

    temp.chores()
        .args(&["chore", "remove", "bed"])
        .passes()
        .stdout_has("Chore removed: bed");
    temp.chores()
        .args(&["chore", "list"])
        .passes()
        .stdout_lacks("Make bed");
}

#[test]
fn due_date_can_be_set_and_cleared() {
    let temp = Project::household();

    temp.chores()
        .args(&["chore", "due", "dishes", "2030-01-02T18:00:00Z"])
        .passes()
        .stdout_has("Due date for dishes set to 2030-01-02T18:00:00+00:00");
    temp.chores()
        .args(&["chore", "show", "dishes"])
        .passes()
        .stdout_has("Due: 2030-01-02 18:00");

    temp.chores()
        .args(&["chore", "due", "dishes", "--clear"])
        .passes()
        .stdout_has("cleared");
    temp.chores()
        .args(&["chore", "show", "dishes"])
        .passes()
        .stdout_has("Due: -");
}
