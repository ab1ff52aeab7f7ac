// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-(kid, chore) status records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::effect::{ActionKind, TransitionEffect};
use crate::id::{ChoreId, KidId};
use crate::state::StoredState;
use crate::stats::PeriodStats;

/// Lifecycle record for one kid on one chore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidChoreStatus {
    pub kid_id: KidId,
    pub chore_id: ChoreId,
    pub state: StoredState,
    /// Claims awaiting a parent decision
    #[serde(default)]
    pub pending_claims: u32,
    #[serde(default)]
    pub claimed_by: Option<String>,
    #[serde(default)]
    pub completed_by: Option<String>,
    #[serde(default)]
    pub last_claimed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_approved: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_disapproved: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_overdue: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_missed: Option<DateTime<Utc>>,
    /// Start of the current approval period
    pub period_start: DateTime<Utc>,
    #[serde(default)]
    pub stats: PeriodStats,
}

impl KidChoreStatus {
    pub fn new(kid_id: KidId, chore_id: ChoreId, now: DateTime<Utc>) -> Self {
        Self {
            kid_id,
            chore_id,
            state: StoredState::Pending,
            pending_claims: 0,
            claimed_by: None,
            completed_by: None,
            last_claimed: None,
            last_approved: None,
            last_disapproved: None,
            last_overdue: None,
            last_missed: None,
            period_start: now,
            stats: PeriodStats::default(),
        }
    }

    pub fn has_pending_claim(&self) -> bool {
        self.pending_claims > 0
    }

    /// Approved since the current period began
    pub fn approved_in_period(&self) -> bool {
        self.state == StoredState::Approved
            && self.last_approved.is_some_and(|at| at >= self.period_start)
    }

    /// Nothing to clear: pending with no claim or ownership left behind
    pub fn is_clean(&self) -> bool {
        self.state == StoredState::Pending
            && self.pending_claims == 0
            && self.claimed_by.is_none()
            && self.completed_by.is_none()
    }

    /// Apply a planned transition
    ///
    /// `day` is the household-local calendar day used for statistics
    /// buckets.
    pub fn apply(&mut self, effect: &TransitionEffect, now: DateTime<Utc>, day: NaiveDate) {
        self.state = effect.new_state;
        self.pending_claims = match effect.action {
            ActionKind::Claim => self.pending_claims.saturating_add(1),
            _ => 0,
        };
        effect.claimed_by.apply(&mut self.claimed_by);
        effect.completed_by.apply(&mut self.completed_by);

        match effect.action {
            ActionKind::Claim => self.last_claimed = Some(now),
            ActionKind::Approve => self.last_approved = Some(now),
            ActionKind::Disapprove => self.last_disapproved = Some(now),
            ActionKind::Overdue => self.last_overdue = Some(now),
            ActionKind::Miss => self.last_missed = Some(now),
            ActionKind::Reset => self.period_start = now,
            ActionKind::Undo => {}
        }

        if effect.update_stats {
            if let Some(kind) = effect.action.stat_kind() {
                self.stats.record(kind, effect.points, day);
            }
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
