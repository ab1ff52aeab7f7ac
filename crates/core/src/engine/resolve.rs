// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Display-state resolution
//!
//! The per-kid ladder is evaluated top-down and the first match wins:
//!
//! 1. `approved` - approved within the current period
//! 2. `claimed` - a claim is awaiting review
//! 3. `not_my_turn` - rotation gate closed for this kid
//! 4. `missed` - stored missed, or a lock chore past its due date
//! 5. `overdue` - stored overdue, or past due on a chore that marks overdue
//! 6. `waiting` - claim restriction on and the due window not yet open
//! 7. `due` - inside the due window
//! 8. `pending`

use chrono::{DateTime, Utc};

use super::ChoreSnapshot;
use crate::id::KidId;
use crate::state::{BlockReason, ChoreState, StoredState};

/// Resolve the display state for one kid
pub fn resolve_kid_state(snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> ChoreState {
    let chore = snapshot.chore;
    let Some(status) = snapshot.status(kid).filter(|_| chore.is_assigned(kid)) else {
        return ChoreState::Unknown;
    };

    if status.approved_in_period() {
        return ChoreState::Approved;
    }
    if status.has_pending_claim() {
        return ChoreState::Claimed;
    }
    if !snapshot.turn_open_to(kid) {
        return ChoreState::NotMyTurn;
    }

    let past_due = snapshot.past_due(kid);
    let handling = chore.overdue_handling;
    if status.state == StoredState::Missed || (handling.is_lock() && past_due) {
        return ChoreState::Missed;
    }
    if status.state == StoredState::Overdue || (handling.marks_overdue() && past_due) {
        return ChoreState::Overdue;
    }

    let now = snapshot.now;
    let window_start = chore.window_start_for(kid);
    if chore.claim_restriction && window_start.is_some_and(|start| now < start) {
        return ChoreState::Waiting;
    }
    if let (Some(start), Some(due)) = (window_start, chore.due_date_for(kid)) {
        if start <= now && now <= due {
            return ChoreState::Due;
        }
    }

    ChoreState::Pending
}

/// Aggregate display state across every assigned kid
pub fn resolve_chore_state(snapshot: &ChoreSnapshot<'_>) -> ChoreState {
    let kids = &snapshot.chore.assigned_kids;
    let states: Vec<ChoreState> = kids
        .iter()
        .map(|kid| resolve_kid_state(snapshot, kid))
        .collect();

    let Some(first) = states.first().copied() else {
        return ChoreState::Unknown;
    };
    if states.iter().all(|s| *s == first) {
        return first;
    }

    let any = |wanted: ChoreState| states.contains(&wanted);

    if snapshot.caps.single_claimer {
        if any(ChoreState::Approved) {
            return ChoreState::Approved;
        }
        if any(ChoreState::Claimed) {
            return ChoreState::Claimed;
        }
        // Rotation chores read as whatever the turn holder sees
        return snapshot
            .turn_holder()
            .map(|holder| resolve_kid_state(snapshot, holder))
            .unwrap_or(first);
    }

    if snapshot.caps.reset_all_kids {
        if any(ChoreState::Approved) {
            return ChoreState::ApprovedInPart;
        }
        if any(ChoreState::Claimed) {
            return ChoreState::ClaimedInPart;
        }
        if any(ChoreState::Missed) {
            return ChoreState::Missed;
        }
        if any(ChoreState::Overdue) {
            return ChoreState::Overdue;
        }
        return ChoreState::Pending;
    }

    ChoreState::Independent
}

/// Why the kid is locked out of the chore, if they are
pub fn lock_reason(snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> Option<BlockReason> {
    match resolve_kid_state(snapshot, kid) {
        ChoreState::Missed => Some(BlockReason::Missed),
        ChoreState::Waiting => Some(BlockReason::Waiting),
        ChoreState::NotMyTurn => Some(BlockReason::NotMyTurn),
        _ => None,
    }
}

/// When a waiting kid may claim
pub fn next_claimable_at(snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> Option<DateTime<Utc>> {
    match resolve_kid_state(snapshot, kid) {
        ChoreState::Waiting => snapshot.chore.window_start_for(kid),
        _ => None,
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
