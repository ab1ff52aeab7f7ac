// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot fixtures shared by the engine tests

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::ChoreSnapshot;
use crate::chore::ChoreDef;
use crate::criteria::CompletionCriteria;
use crate::id::KidId;
use crate::state::StoredState;
use crate::status::KidChoreStatus;

pub fn kid(id: &str) -> KidId {
    KidId::from(id)
}

pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

pub struct Fixture {
    pub chore: ChoreDef,
    pub statuses: BTreeMap<KidId, KidChoreStatus>,
    pub now: DateTime<Utc>,
}

impl Fixture {
    pub fn new(criteria: CompletionCriteria, kids: &[&str]) -> Self {
        let now = noon();
        let mut chore = ChoreDef::new("dishes", "Dishes");
        chore.criteria = criteria;
        chore.assigned_kids = kids.iter().map(|k| kid(k)).collect();
        if criteria.is_rotation() {
            chore.rotation_current_kid_id = chore.assigned_kids.first().cloned();
        }
        let period_start = now - Duration::hours(12);
        let statuses = chore
            .assigned_kids
            .iter()
            .map(|k| {
                (
                    k.clone(),
                    KidChoreStatus::new(k.clone(), chore.id.clone(), period_start),
                )
            })
            .collect();
        Self {
            chore,
            statuses,
            now,
        }
    }

    pub fn snapshot(&self) -> ChoreSnapshot<'_> {
        ChoreSnapshot::new(&self.chore, &self.statuses, self.now)
    }

    pub fn status_mut(&mut self, id: &str) -> &mut KidChoreStatus {
        self.statuses
            .get_mut(&kid(id))
            .unwrap_or_else(|| panic!("no status for {id}"))
    }

    /// Put a kid in a stored state with consistent bookkeeping
    pub fn set_state(&mut self, id: &str, state: StoredState) -> &mut Self {
        let now = self.now;
        let status = self.status_mut(id);
        status.state = state;
        match state {
            StoredState::Claimed => {
                status.pending_claims = 1;
                status.claimed_by = Some(id.to_string());
            }
            StoredState::Approved => {
                status.pending_claims = 0;
                status.last_approved = Some(now - Duration::minutes(1));
                status.completed_by = Some(id.to_string());
            }
            _ => status.pending_claims = 0,
        }
        self
    }

    /// Due date relative to now, in minutes (negative means past due)
    pub fn due_in(&mut self, minutes: i64) -> &mut Self {
        self.chore.due_date = Some(self.now + Duration::minutes(minutes));
        self
    }

    pub fn turn(&mut self, id: &str) -> &mut Self {
        self.chore.rotation_current_kid_id = Some(kid(id));
        self
    }
}
