// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tick categorization
//!
//! One timestamped pass over the household sorts every assignment into
//! buckets. Categorizing is pure; the manager processes the buckets in
//! a fixed order (resets, filtered overdue, notifications).

use std::collections::{BTreeMap, BTreeSet};

use chores_core::schedule::approval_boundary_passed;
use chores_core::{ActionKind, ChoreId, ChoreSnapshot, KidId, StoredState};
use chores_storage::Household;
use chrono::{DateTime, FixedOffset, Utc};

/// One (kid, chore) assignment
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pair {
    pub chore_id: ChoreId,
    pub kid_id: KidId,
}

impl Pair {
    pub fn new(chore_id: ChoreId, kid_id: KidId) -> Self {
        Self { chore_id, kid_id }
    }
}

/// A late assignment and what to do about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueEntry {
    pub pair: Pair,
    /// `Overdue`, or `Miss` for lock chores
    pub action: ActionKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanBuckets {
    /// Kids whose approval-reset boundary passed, per chore
    pub reset: BTreeMap<ChoreId, Vec<KidId>>,
    /// Past-due assignments, before excluding this tick's resets
    pub overdue: Vec<OverdueEntry>,
    pub due_window: Vec<Pair>,
    pub reminders: Vec<Pair>,
}

impl ScanBuckets {
    pub fn reset_pairs(&self) -> BTreeSet<Pair> {
        self.reset
            .iter()
            .flat_map(|(chore, kids)| kids.iter().map(|kid| Pair::new(chore.clone(), kid.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.reset.is_empty()
            && self.overdue.is_empty()
            && self.due_window.is_empty()
            && self.reminders.is_empty()
    }
}

/// Sort every assignment into buckets at `now`
///
/// Window and reminder instants fire when they fall in `(last_tick, now]`;
/// the first tick after startup fires none.
pub fn categorize(
    household: &Household,
    now: DateTime<Utc>,
    last_tick: Option<DateTime<Utc>>,
    offset: FixedOffset,
) -> ScanBuckets {
    let mut buckets = ScanBuckets::default();

    for chore_id in household.chores.keys() {
        let Ok(snapshot) = household.snapshot(chore_id, now) else {
            continue;
        };
        let chore = snapshot.chore;
        let handling = chore.overdue_handling;

        for kid in &chore.assigned_kids {
            let Some(status) = snapshot.status(kid) else {
                continue;
            };
            let due = chore.due_date_for(kid);

            if approval_boundary_passed(chore.approval_reset, status.period_start, due, now, offset)
            {
                buckets.reset.entry(chore_id.clone()).or_default().push(kid.clone());
            }

            let late = matches!(status.state, StoredState::Pending | StoredState::Overdue)
                && !status.has_pending_claim()
                && snapshot.past_due(kid)
                && marks_this_kid(&snapshot, kid);
            if late && (handling.marks_overdue() || handling.is_lock()) {
                let action = if handling.is_lock() {
                    ActionKind::Miss
                } else {
                    ActionKind::Overdue
                };
                buckets.overdue.push(OverdueEntry {
                    pair: Pair::new(chore_id.clone(), kid.clone()),
                    action,
                });
            }

            let Some(last) = last_tick else {
                continue;
            };
            let notifiable = status.state == StoredState::Pending
                && !status.has_pending_claim()
                && snapshot.turn_open_to(kid);
            if !notifiable {
                continue;
            }
            let fires = |at: Option<DateTime<Utc>>| at.is_some_and(|at| last < at && at <= now);
            if fires(chore.window_start_for(kid)) {
                buckets
                    .due_window
                    .push(Pair::new(chore_id.clone(), kid.clone()));
            }
            if fires(chore.reminder_at_for(kid)) {
                buckets
                    .reminders
                    .push(Pair::new(chore_id.clone(), kid.clone()));
            }
        }
    }

    buckets
}

/// Rotation chores only hold the turn holder responsible
fn marks_this_kid(snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> bool {
    match snapshot.turn_holder() {
        Some(holder) => holder == kid,
        None => !snapshot.caps.rotation,
    }
}

/// Drop overdue entries for pairs reset earlier in the same tick
///
/// A pair just returned to pending still carries the due date it was
/// late against until the reset reschedules it; marking it again would
/// undo the reset.
pub fn filter_touched(overdue: Vec<OverdueEntry>, touched: &BTreeSet<Pair>) -> Vec<OverdueEntry> {
    overdue
        .into_iter()
        .filter(|entry| {
            let keep = !touched.contains(&entry.pair);
            if !keep {
                tracing::debug!(
                    chore = %entry.pair.chore_id,
                    kid = %entry.pair.kid_id,
                    "skipping overdue check for pair reset this tick"
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
