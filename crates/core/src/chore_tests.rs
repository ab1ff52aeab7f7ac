// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, h, m, 0).unwrap()
}

fn chore(criteria: CompletionCriteria, kids: &[&str]) -> ChoreDef {
    let mut chore = ChoreDef::new("dishes", "Dishes");
    chore.criteria = criteria;
    chore.assigned_kids = kids.iter().map(|k| KidId::from(*k)).collect();
    chore
}

#[test]
fn valid_independent_chore_passes() {
    assert_eq!(chore(CompletionCriteria::Independent, &["ada"]).validate(), Ok(()));
}

#[parameterized(
    simple = { CompletionCriteria::RotationSimple },
    steal = { CompletionCriteria::RotationSteal },
    smart = { CompletionCriteria::RotationSmart },
)]
fn rotation_with_one_kid_is_rejected(criteria: CompletionCriteria) {
    let mut c = chore(criteria, &["ada"]);
    c.due_date = Some(at(18, 0));
    assert_eq!(
        c.validate(),
        Err(ValidationError::RotationNeedsTwoKids {
            chore: ChoreId::from("dishes"),
            count: 1,
        })
    );
}

#[test]
fn steal_without_due_date_is_rejected() {
    let c = chore(CompletionCriteria::RotationSteal, &["ada", "bo"]);
    assert_eq!(
        c.validate(),
        Err(ValidationError::StealNeedsDueDate(ChoreId::from("dishes")))
    );
}

#[parameterized(
    due_date_once = { ApprovalReset::AtDueDateOnce },
    due_date_multi = { ApprovalReset::AtDueDateMulti },
    upon_completion = { ApprovalReset::UponCompletion },
)]
fn lock_needs_midnight_reset(reset: ApprovalReset) {
    let mut c = chore(CompletionCriteria::Independent, &["ada"]);
    c.overdue_handling = OverdueHandling::MarkMissedAndLock;
    c.approval_reset = reset;
    assert!(matches!(
        c.validate(),
        Err(ValidationError::LockNeedsMidnightReset { .. })
    ));
}

#[test]
fn lock_with_midnight_reset_is_fine() {
    let mut c = chore(CompletionCriteria::Independent, &["ada"]);
    c.overdue_handling = OverdueHandling::MarkMissedAndLock;
    c.approval_reset = ApprovalReset::AtMidnightMulti;
    assert_eq!(c.validate(), Ok(()));
}

#[test]
fn empty_assignment_and_duplicates_are_rejected() {
    let c = chore(CompletionCriteria::Shared, &[]);
    assert!(matches!(c.validate(), Err(ValidationError::NoAssignedKids(_))));

    let c = chore(CompletionCriteria::Shared, &["ada", "ada"]);
    assert!(matches!(c.validate(), Err(ValidationError::DuplicateKid { .. })));
}

#[parameterized(
    negative = { -1.0 },
    nan = { f64::NAN },
    infinite = { f64::INFINITY },
)]
fn bad_points_are_rejected(points: f64) {
    let mut c = chore(CompletionCriteria::Independent, &["ada"]);
    c.points = points;
    assert!(matches!(c.validate(), Err(ValidationError::InvalidPoints { .. })));
}

#[test]
fn turn_holder_must_be_assigned() {
    let mut c = chore(CompletionCriteria::RotationSimple, &["ada", "bo"]);
    c.rotation_current_kid_id = Some(KidId::from("cy"));
    assert!(matches!(
        c.validate(),
        Err(ValidationError::TurnHolderNotAssigned { .. })
    ));
}

#[test]
fn independent_due_dates_fall_back_to_chore_level() {
    let mut c = chore(CompletionCriteria::Independent, &["ada", "bo"]);
    c.due_date = Some(at(18, 0));
    c.kid_due_dates.insert(KidId::from("bo"), at(20, 0));

    assert_eq!(c.due_date_for(&KidId::from("ada")), Some(at(18, 0)));
    assert_eq!(c.due_date_for(&KidId::from("bo")), Some(at(20, 0)));
}

#[test]
fn shared_chores_ignore_per_kid_dates() {
    let mut c = chore(CompletionCriteria::Shared, &["ada", "bo"]);
    c.due_date = Some(at(18, 0));
    c.kid_due_dates.insert(KidId::from("bo"), at(20, 0));
    assert_eq!(c.due_date_for(&KidId::from("bo")), Some(at(18, 0)));
}

#[test]
fn normalize_seeds_and_prunes_kid_due_dates() {
    let mut c = chore(CompletionCriteria::Independent, &["ada", "bo"]);
    c.due_date = Some(at(18, 0));
    c.kid_due_dates.insert(KidId::from("bo"), at(20, 0));
    c.kid_due_dates.insert(KidId::from("gone"), at(9, 0));

    c.normalize();

    assert_eq!(c.kid_due_dates.len(), 2);
    assert_eq!(c.kid_due_dates[&KidId::from("ada")], at(18, 0));
    assert_eq!(c.kid_due_dates[&KidId::from("bo")], at(20, 0));
}

#[test]
fn set_due_date_targets_one_kid_on_independent_chores() {
    let mut c = chore(CompletionCriteria::Independent, &["ada", "bo"]);
    c.set_due_date(None, Some(at(18, 0)));
    c.set_due_date(Some(&KidId::from("ada")), Some(at(7, 30)));

    assert_eq!(c.due_date_for(&KidId::from("ada")), Some(at(7, 30)));
    assert_eq!(c.due_date_for(&KidId::from("bo")), Some(at(18, 0)));
}

#[test]
fn window_and_reminder_are_offsets_before_due() {
    let mut c = chore(CompletionCriteria::SharedFirst, &["ada", "bo"]);
    c.due_date = Some(at(18, 0));
    c.due_window = Some(Duration::from_secs(2 * 3600));
    c.reminder_lead = Some(Duration::from_secs(30 * 60));

    let ada = KidId::from("ada");
    assert_eq!(c.window_start_for(&ada), Some(at(16, 0)));
    assert_eq!(c.reminder_at_for(&ada), Some(at(17, 30)));
    assert!(c.is_past_due(&ada, at(18, 1)));
    assert!(!c.is_past_due(&ada, at(18, 0)));
}

#[test]
fn parses_from_toml_with_defaults() {
    let c: ChoreDef = toml::from_str(
        r#"
        id = "trash"
        name = "Take out trash"
        assigned_kids = ["ada", "bo"]
        criteria = "rotation_simple"
        frequency = "weekly"
        due_window = "2h"
        points = 5.0
        "#,
    )
    .unwrap();

    assert_eq!(c.criteria, CompletionCriteria::RotationSimple);
    assert_eq!(c.frequency, Frequency::Weekly);
    assert_eq!(c.approval_reset, ApprovalReset::AtMidnightOnce);
    assert_eq!(c.pending_claim_action, PendingClaimAction::Clear);
    assert_eq!(c.due_window, Some(Duration::from_secs(7200)));
    assert_eq!(c.reminder_lead, None);
}
