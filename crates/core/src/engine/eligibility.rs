// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim and approval eligibility

use super::resolve::resolve_kid_state;
use super::ChoreSnapshot;
use crate::id::KidId;
use crate::state::{BlockReason, ChoreState, Eligibility, StoredState};

/// May `kid` claim the chore now?
///
/// Locks (missed, waiting, not my turn) are reported before ownership
/// conflicts.
pub fn can_claim(snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> Eligibility {
    let Some(status) = snapshot.status(kid).filter(|_| snapshot.chore.is_assigned(kid)) else {
        return Eligibility::Blocked(BlockReason::NotAssigned);
    };

    match resolve_kid_state(snapshot, kid) {
        ChoreState::Missed => return Eligibility::Blocked(BlockReason::Missed),
        ChoreState::Waiting => return Eligibility::Blocked(BlockReason::Waiting),
        ChoreState::NotMyTurn => return Eligibility::Blocked(BlockReason::NotMyTurn),
        _ => {}
    }

    if status.has_pending_claim() {
        return Eligibility::Blocked(BlockReason::AlreadyClaimed);
    }
    if status.approved_in_period() && !snapshot.chore.allows_multiple_claims() {
        return Eligibility::Blocked(BlockReason::AlreadyApproved);
    }

    if snapshot.caps.single_claimer {
        for other in snapshot.others(kid) {
            if other.has_pending_claim() {
                return Eligibility::Blocked(BlockReason::ClaimedByOther);
            }
            if other.approved_in_period() {
                return Eligibility::Blocked(BlockReason::CompletedByOther);
            }
        }
    }

    Eligibility::Eligible
}

/// May a parent approve `kid` now?
///
/// Same ordering as [`can_claim`] without the waiting and turn gates:
/// a claim already made is approvable even if the turn moved on.
pub fn can_approve(snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> Eligibility {
    let Some(status) = snapshot.status(kid).filter(|_| snapshot.chore.is_assigned(kid)) else {
        return Eligibility::Blocked(BlockReason::NotAssigned);
    };

    if status.approved_in_period() {
        return Eligibility::Blocked(BlockReason::AlreadyApproved);
    }

    if snapshot.caps.single_claimer && snapshot.others(kid).any(|o| o.approved_in_period()) {
        return Eligibility::Blocked(BlockReason::CompletedByOther);
    }

    if status.has_pending_claim() {
        return Eligibility::Eligible;
    }

    let locked_out = snapshot.chore.overdue_handling.is_lock() && snapshot.past_due(kid);
    if status.state == StoredState::Missed || locked_out {
        return Eligibility::Blocked(BlockReason::Missed);
    }
    if status.state == StoredState::Overdue {
        return Eligibility::Eligible;
    }

    Eligibility::Blocked(BlockReason::NoPendingClaim)
}

#[cfg(test)]
#[path = "eligibility_tests.rs"]
mod tests;
