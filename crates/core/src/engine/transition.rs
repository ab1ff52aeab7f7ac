// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The valid-transition table
//!
//! The lifecycle is a cycle with no terminal state. Derived display
//! states (`due`, `waiting`, `not_my_turn`, `independent`, `unknown`) are
//! never stored and have no outgoing transitions.

use crate::state::ChoreState;

/// States reachable from `from` in one step
pub fn allowed_targets(from: ChoreState) -> &'static [ChoreState] {
    use ChoreState::*;
    match from {
        Pending => &[Claimed, Overdue, Missed],
        Claimed => &[Approved, Pending, Overdue],
        Approved => &[Pending],
        Overdue => &[Claimed, Pending, Approved, Missed],
        Missed => &[Pending],
        ClaimedInPart => &[ApprovedInPart, Claimed],
        ApprovedInPart => &[ClaimedInPart, Approved],
        Due | Waiting | NotMyTurn | Independent | Unknown => &[],
    }
}

pub fn is_valid_transition(from: ChoreState, to: ChoreState) -> bool {
    allowed_targets(from).contains(&to)
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
