//! Claim, approval and audit-log specs

use crate::prelude::*;

#[test]
fn claim_then_approve() {
    let temp = Project::household();

    temp.chores()
        .args(&["claim", "ada", "bed"])
        .passes()
        .stdout_has("Claimed bed for ada")
        .stdout_has("chore_claimed");
    temp.chores()
        .args(&["approve", "ada", "bed"])
        .passes()
        .stdout_has("chore_approved");

    temp.chores()
        .args(&["kid", "show", "ada", "bed"])
        .passes()
        .stdout_has("State: approved")
        .stdout_has("Approved: 1");
}

#[test]
fn independent_kids_do_not_block_each_other() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "bed"]).passes();

    temp.chores().args(&["claim", "bo", "bed"]).passes();
}

#[test]
fn shared_first_blocks_the_second_claimer() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "dishes"]).passes();

    temp.chores()
        .args(&["claim", "bo", "dishes"])
        .fails()
        .stderr_has("claimed_by_other");
}

#[test]
fn double_claim_is_rejected() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "bed"]).passes();

    temp.chores()
        .args(&["claim", "ada", "bed"])
        .fails()
        .stderr_has("already_claimed");
}

#[test]
fn disapprove_returns_to_pending() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "bed"]).passes();

    temp.chores()
        .args(&["disapprove", "ada", "bed", "--reason", "sheets on the floor"])
        .passes()
        .stdout_has("chore_disapproved");
    temp.chores()
        .args(&["kid", "show", "ada", "bed"])
        .passes()
        .stdout_has("State: pending");
}

#[test]
fn approving_without_a_claim_is_rejected() {
    let temp = Project::household();

    temp.chores()
        .args(&["approve", "ada", "bed"])
        .fails()
        .stderr_has("no_pending_claim");
}

#[test]
fn undo_withdraws_a_claim() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "dishes"]).passes();

    temp.chores()
        .args(&["undo", "ada", "dishes"])
        .passes()
        .stdout_has("chore_undone");
    temp.chores().args(&["claim", "bo", "dishes"]).passes();
}

#[test]
fn kid_chores_lists_every_assignment() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "bed"]).passes();

    temp.chores()
        .args(&["kid", "chores", "ada"])
        .passes()
        .stdout_has("bed")
        .stdout_has("claimed")
        .stdout_has("dishes")
        .stdout_has("trash");
}

#[test]
fn events_record_actions_in_order() {
    let temp = Project::household();
    temp.chores().args(&["claim", "ada", "bed"]).passes();
    temp.chores().args(&["approve", "ada", "bed"]).passes();

    let run = temp
        .chores()
        .args(&["chore", "events", "bed"])
        .passes()
        .stdout_has("chore_claimed")
        .stdout_has("chore_approved");
    let stdout = run.stdout();
    let claimed = stdout.find("chore_claimed").unwrap();
    let approved = stdout.find("chore_approved").unwrap();
    assert!(claimed < approved);
}

#[test]
fn manual_tick_reports_counts() {
    let temp = Project::household();

    temp.chores()
        .args(&["tick"])
        .passes()
        .stdout_has("Tick:")
        .stdout_has("reset");
}
