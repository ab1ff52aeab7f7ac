//! Rotation specs

use crate::prelude::*;

#[test]
fn first_kid_holds_the_first_turn() {
    let temp = Project::household();

    temp.chores()
        .args(&["chore", "show", "trash"])
        .passes()
        .stdout_has("Turn: Ada");
    temp.chores()
        .args(&["claim", "bo", "trash"])
        .fails()
        .stderr_has("not_my_turn");
}

#[test]
fn approval_advances_the_turn() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "trash"]).passes();

    temp.chores()
        .args(&["approve", "ada", "trash"])
        .passes()
        .stdout_has("rotation_advanced");
    temp.chores()
        .args(&["chore", "show", "trash"])
        .passes()
        .stdout_has("Turn: Bo");
}

#[test]
fn parent_can_hand_the_turn_over() {
    let temp = Project::household();

    temp.chores()
        .args(&["rotation", "turn", "trash", "bo"])
        .passes()
        .stdout_has("Turn for trash set to bo");
    temp.chores().args(&["claim", "bo", "trash"]).passes();
}

#[test]
fn open_cycle_lets_anyone_claim() {
    let temp = Project::household();

    temp.chores()
        .args(&["rotation", "open", "trash"])
        .passes()
        .stdout_has("rotation_cycle_opened");
    temp.chores().args(&["claim", "bo", "trash"]).passes();
}

#[test]
fn rotation_commands_need_a_rotation_chore() {
    let temp = Project::household();

    temp.chores()
        .args(&["rotation", "reset", "bed"])
        .fails()
        .stderr_has("not a rotation chore");
}
