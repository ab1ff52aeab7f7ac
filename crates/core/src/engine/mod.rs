// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore engine: pure lifecycle computation
//!
//! Everything here reads a [`ChoreSnapshot`] and returns values. Nothing
//! mutates storage; the manager applies the returned plans.
//!
//! - [`transition`] - the valid-transition table
//! - [`plan`] - transition effects for an action
//! - [`resolve`] - the display-state priority ladder and chore aggregate
//! - [`eligibility`] - claim/approve checks with block reasons

pub mod eligibility;
pub mod plan;
pub mod resolve;
pub mod transition;

pub use eligibility::{can_approve, can_claim};
pub use plan::plan;
pub use resolve::{lock_reason, next_claimable_at, resolve_chore_state, resolve_kid_state};
pub use transition::{allowed_targets, is_valid_transition};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::chore::ChoreDef;
use crate::criteria::Capabilities;
use crate::id::KidId;
use crate::status::KidChoreStatus;

/// A read-only view of one chore and its status records at an instant
#[derive(Debug, Clone, Copy)]
pub struct ChoreSnapshot<'a> {
    pub chore: &'a ChoreDef,
    pub statuses: &'a BTreeMap<KidId, KidChoreStatus>,
    pub now: DateTime<Utc>,
    /// Evaluated once per snapshot and passed down
    pub caps: Capabilities,
}

impl<'a> ChoreSnapshot<'a> {
    pub fn new(
        chore: &'a ChoreDef,
        statuses: &'a BTreeMap<KidId, KidChoreStatus>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            chore,
            statuses,
            now,
            caps: chore.capabilities(),
        }
    }

    pub fn status(&self, kid: &KidId) -> Option<&'a KidChoreStatus> {
        self.statuses.get(kid)
    }

    pub fn past_due(&self, kid: &KidId) -> bool {
        self.chore.is_past_due(kid, self.now)
    }

    pub fn turn_holder(&self) -> Option<&'a KidId> {
        if !self.caps.rotation {
            return None;
        }
        self.chore.rotation_current_kid_id.as_ref()
    }

    /// The rotation gate: may this kid act on the chore right now?
    ///
    /// Always open outside rotation. Within rotation it is open to the
    /// turn holder, to everyone while a cycle override is active, and to
    /// everyone once a steal chore is past due.
    pub fn turn_open_to(&self, kid: &KidId) -> bool {
        if !self.caps.rotation || self.chore.rotation_cycle_override {
            return true;
        }
        if self.turn_holder() == Some(kid) {
            return true;
        }
        self.caps.steal_after_due && self.past_due(kid)
    }

    /// Status records of the other assigned kids
    pub fn others<'s>(&'s self, kid: &'s KidId) -> impl Iterator<Item = &'a KidChoreStatus> + 's {
        self.chore
            .assigned_kids
            .iter()
            .filter(move |k| *k != kid)
            .filter_map(move |k| self.statuses.get(k))
    }
}

#[cfg(test)]
pub(crate) mod test_support;
