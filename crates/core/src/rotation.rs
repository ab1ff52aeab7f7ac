// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation resolver
//!
//! Pure turn selection for rotation chores. Smart selection takes its
//! approval history as arguments; fetching it is the caller's job.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chore::ChoreDef;
use crate::criteria::CompletionCriteria;
use crate::effect::FieldChange;
use crate::id::KidId;

/// Lifetime approval history for one kid on one chore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSummary {
    pub approved: u32,
    pub last_approved_at: Option<DateTime<Utc>>,
}

/// Round-robin: the kid after `current`, wrapping around
///
/// An unknown or missing `current` restarts at the first kid.
pub fn next_turn_simple(kids: &[KidId], current: Option<&KidId>) -> Option<KidId> {
    let first = kids.first()?;
    let Some(index) = current.and_then(|c| kids.iter().position(|k| k == c)) else {
        return Some(first.clone());
    };
    kids.get((index + 1) % kids.len()).cloned()
}

/// Fewest approvals wins; ties go to the oldest last approval (never
/// approved counts as oldest), then to list order
pub fn next_turn_smart(
    kids: &[KidId],
    approved_counts: &HashMap<KidId, u32>,
    last_approved_at: &HashMap<KidId, DateTime<Utc>>,
) -> Option<KidId> {
    kids.iter()
        .enumerate()
        .min_by_key(|(index, kid)| {
            (
                approved_counts.get(*kid).copied().unwrap_or(0),
                last_approved_at.get(*kid).copied(),
                *index,
            )
        })
        .map(|(_, kid)| kid.clone())
}

/// Smart selection over a summary map
pub fn next_turn_from_summaries(
    kids: &[KidId],
    summaries: &HashMap<KidId, ApprovalSummary>,
) -> Option<KidId> {
    let counts = summaries
        .iter()
        .map(|(kid, s)| (kid.clone(), s.approved))
        .collect();
    let last = summaries
        .iter()
        .filter_map(|(kid, s)| s.last_approved_at.map(|at| (kid.clone(), at)))
        .collect();
    next_turn_smart(kids, &counts, &last)
}

/// Storage changes required when a chore's completion criteria change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationDelta {
    pub turn: FieldChange<KidId>,
    pub clear_override: bool,
}

impl RotationDelta {
    pub fn is_noop(&self) -> bool {
        self.turn == FieldChange::Keep && !self.clear_override
    }

    pub fn apply(&self, chore: &mut ChoreDef) {
        self.turn.apply(&mut chore.rotation_current_kid_id);
        if self.clear_override {
            chore.rotation_cycle_override = false;
        }
    }
}

/// Entering rotation seeds the turn with the first kid, leaving rotation
/// clears it, and switching rotation styles keeps the current holder.
pub fn criteria_transition(
    old: CompletionCriteria,
    new: CompletionCriteria,
    assigned: &[KidId],
) -> RotationDelta {
    match (old.is_rotation(), new.is_rotation()) {
        (false, true) => RotationDelta {
            turn: assigned
                .first()
                .cloned()
                .map_or(FieldChange::Clear, FieldChange::Set),
            clear_override: true,
        },
        (true, false) => RotationDelta {
            turn: FieldChange::Clear,
            clear_override: true,
        },
        _ => RotationDelta {
            turn: FieldChange::Keep,
            clear_override: false,
        },
    }
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;
