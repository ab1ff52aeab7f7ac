// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition planning
//!
//! `plan` turns an action into per-kid [`TransitionEffect`]s. An action
//! whose transition is not in the table yields no effects; the caller
//! decides whether that is a no-op or a state conflict.

use super::transition::is_valid_transition;
use super::ChoreSnapshot;
use crate::chore::PendingClaimAction;
use crate::effect::{Action, ActionKind, FieldChange, TransitionEffect};
use crate::id::KidId;
use crate::state::{ChoreState, StoredState};
use crate::status::KidChoreStatus;

/// Plan the effects of `action` performed on behalf of `actor`
///
/// Single-claimer bystanders are never touched: claim exclusivity is an
/// eligibility concern, not a storage one.
pub fn plan(snapshot: &ChoreSnapshot<'_>, actor: &KidId, action: &Action) -> Vec<TransitionEffect> {
    if let Action::Reset = action {
        return plan_reset(snapshot, actor);
    }

    let Some(status) = snapshot.status(actor) else {
        return Vec::new();
    };

    let effect = match action {
        Action::Claim { claimant } => TransitionEffect {
            claimed_by: FieldChange::Set(claimant.clone()),
            ..base(status, ActionKind::Claim, StoredState::Claimed, true)
        },
        Action::Approve { completer, points } => TransitionEffect {
            points: *points,
            completed_by: FieldChange::Set(completer.clone()),
            ..base(status, ActionKind::Approve, StoredState::Approved, true)
        },
        Action::Disapprove => TransitionEffect {
            claimed_by: FieldChange::Clear,
            completed_by: FieldChange::Clear,
            ..base(status, ActionKind::Disapprove, fallback_state(snapshot, actor), true)
        },
        Action::Undo => TransitionEffect {
            claimed_by: FieldChange::Clear,
            completed_by: FieldChange::Clear,
            ..base(status, ActionKind::Undo, fallback_state(snapshot, actor), false)
        },
        Action::Overdue => base(status, ActionKind::Overdue, StoredState::Overdue, true),
        Action::Miss => base(status, ActionKind::Miss, StoredState::Missed, true),
        Action::Reset => return Vec::new(),
    };

    if is_valid_transition(effect.previous_state.into(), effect.new_state.into()) {
        vec![effect]
    } else {
        Vec::new()
    }
}

/// Scheduled reset: the actor, or every assigned kid on shared chores
///
/// Kids with nothing to clear are skipped, as are kids holding a claim
/// when the chore holds pending claims across resets.
fn plan_reset(snapshot: &ChoreSnapshot<'_>, actor: &KidId) -> Vec<TransitionEffect> {
    let targets: Vec<&KidId> = if snapshot.caps.reset_all_kids {
        snapshot.chore.assigned_kids.iter().collect()
    } else {
        vec![actor]
    };

    targets
        .into_iter()
        .filter_map(|kid| snapshot.status(kid))
        .filter(|status| status.state != StoredState::Pending)
        .filter(|status| {
            !(status.has_pending_claim()
                && snapshot.chore.pending_claim_action == PendingClaimAction::Hold)
        })
        .filter(|status| is_valid_transition(status.state.into(), ChoreState::Pending))
        .map(|status| TransitionEffect {
            claimed_by: FieldChange::Clear,
            completed_by: FieldChange::Clear,
            ..base(status, ActionKind::Reset, StoredState::Pending, false)
        })
        .collect()
}

/// Where a kid lands when a claim is withdrawn
fn fallback_state(snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> StoredState {
    if snapshot.past_due(kid) && snapshot.chore.overdue_handling.marks_overdue() {
        StoredState::Overdue
    } else {
        StoredState::Pending
    }
}

fn base(
    status: &KidChoreStatus,
    action: ActionKind,
    new_state: StoredState,
    update_stats: bool,
) -> TransitionEffect {
    TransitionEffect {
        kid_id: status.kid_id.clone(),
        action,
        previous_state: status.state,
        new_state,
        update_stats,
        points: 0.0,
        claimed_by: FieldChange::Keep,
        completed_by: FieldChange::Keep,
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
