// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only views for display
//!
//! Queries take no chore lock: they resolve a snapshot of the household
//! with the pure engine functions.

use chores_adapters::{NotifyAdapter, StatsAdapter};
use chores_core::engine::{
    can_approve, can_claim, lock_reason, next_claimable_at, resolve_chore_state,
    resolve_kid_state,
};
use chores_core::{
    BlockReason, ChoreId, ChoreSnapshot, ChoreState, Clock, CompletionCriteria, Eligibility, Kid,
    KidId, PeriodStats, StoredState,
};
use chores_storage::{ChoreStore, Household, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Manager, ManagerError};

/// One kid's view of one chore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KidChoreView {
    pub kid_id: KidId,
    pub kid_name: String,
    pub chore_id: ChoreId,
    pub chore_name: String,
    pub state: ChoreState,
    pub stored: StoredState,
    pub lock_reason: Option<BlockReason>,
    pub claim: Eligibility,
    pub approve: Eligibility,
    pub due_date: Option<DateTime<Utc>>,
    pub next_claimable_at: Option<DateTime<Utc>>,
    pub turn_holder_name: Option<String>,
    pub pending_claims: u32,
    pub claimed_by: Option<String>,
    pub completed_by: Option<String>,
    pub stats: PeriodStats,
}

/// A chore with its aggregate state and every assigned kid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreView {
    pub id: ChoreId,
    pub name: String,
    pub criteria: CompletionCriteria,
    pub state: ChoreState,
    pub points: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub turn_holder: Option<KidId>,
    pub turn_holder_name: Option<String>,
    pub cycle_open: bool,
    pub kids: Vec<KidChoreView>,
}

fn kid_view(household: &Household, snapshot: &ChoreSnapshot<'_>, kid: &KidId) -> Option<KidChoreView> {
    let status = snapshot.status(kid)?;
    let chore = snapshot.chore;
    Some(KidChoreView {
        kid_id: kid.clone(),
        kid_name: household.kid_name(kid),
        chore_id: chore.id.clone(),
        chore_name: chore.name.clone(),
        state: resolve_kid_state(snapshot, kid),
        stored: status.state,
        lock_reason: lock_reason(snapshot, kid),
        claim: can_claim(snapshot, kid),
        approve: can_approve(snapshot, kid),
        due_date: chore.due_date_for(kid),
        next_claimable_at: next_claimable_at(snapshot, kid),
        turn_holder_name: snapshot.turn_holder().map(|k| household.kid_name(k)),
        pending_claims: status.pending_claims,
        claimed_by: status.claimed_by.clone(),
        completed_by: status.completed_by.clone(),
        stats: status.stats.clone(),
    })
}

fn chore_view(
    household: &Household,
    chore_id: &ChoreId,
    now: DateTime<Utc>,
) -> Result<ChoreView, StorageError> {
    let snapshot = household.snapshot(chore_id, now)?;
    let chore = snapshot.chore;
    let turn_holder = snapshot.turn_holder().cloned();
    Ok(ChoreView {
        id: chore.id.clone(),
        name: chore.name.clone(),
        criteria: chore.criteria,
        state: resolve_chore_state(&snapshot),
        points: chore.points,
        due_date: chore.due_date,
        turn_holder_name: turn_holder.as_ref().map(|k| household.kid_name(k)),
        turn_holder,
        cycle_open: chore.rotation_cycle_override,
        kids: chore
            .assigned_kids
            .iter()
            .filter_map(|kid| kid_view(household, &snapshot, kid))
            .collect(),
    })
}

impl<St, S, N, C> Manager<St, S, N, C>
where
    St: ChoreStore,
    S: StatsAdapter,
    N: NotifyAdapter,
    C: Clock + 'static,
{
    pub fn kids(&self) -> Vec<Kid> {
        self.lock_household().kids.values().cloned().collect()
    }

    pub fn chore(&self, chore_id: &ChoreId) -> Result<ChoreView, ManagerError> {
        let now = self.clock.now();
        Ok(chore_view(&self.lock_household(), chore_id, now)?)
    }

    pub fn list_chores(&self) -> Vec<ChoreView> {
        let now = self.clock.now();
        let household = self.lock_household();
        household
            .chores
            .keys()
            .filter_map(|id| chore_view(&household, id, now).ok())
            .collect()
    }

    /// Every chore assigned to a kid, as that kid sees it
    pub fn kid_chores(&self, kid_id: &KidId) -> Result<Vec<KidChoreView>, ManagerError> {
        let now = self.clock.now();
        let household = self.lock_household();
        if !household.kids.contains_key(kid_id) {
            return Err(StorageError::NotFound {
                kind: "kid",
                id: kid_id.to_string(),
            }
            .into());
        }

        let mut views = Vec::new();
        for (chore_id, chore) in &household.chores {
            if !chore.is_assigned(kid_id) {
                continue;
            }
            let snapshot = household.snapshot(chore_id, now)?;
            views.extend(kid_view(&household, &snapshot, kid_id));
        }
        Ok(views)
    }

    pub fn kid_chore(
        &self,
        kid_id: &KidId,
        chore_id: &ChoreId,
    ) -> Result<KidChoreView, ManagerError> {
        let now = self.clock.now();
        let household = self.lock_household();
        let snapshot = household.snapshot(chore_id, now)?;
        kid_view(&household, &snapshot, kid_id).ok_or_else(|| {
            ManagerError::rejected("view", BlockReason::NotAssigned)
        })
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
