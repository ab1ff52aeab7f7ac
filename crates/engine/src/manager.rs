// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore manager: owns the household and serializes its mutations

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chores_adapters::{NotifyAdapter, StatsAdapter};
use chores_core::rotation::criteria_transition;
use chores_core::schedule::{local_day, offset_from_minutes};
use chores_core::{
    ApprovalSummary, ChoreDef, ChoreId, Clock, Effect, Event, HouseholdManifest, Kid, KidId,
    ValidationError,
};
use chores_storage::{AssignmentChange, ChoreStore, Household};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::apply::{Applied, Context};
use crate::{ChoreLocks, Executor, ManagerError};

/// Collaborators injected into the manager
pub struct ManagerDeps<St, S, N> {
    pub store: St,
    pub stats: S,
    pub notify: N,
}

/// Manager settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Offset of the household's local day from UTC, in minutes
    pub day_offset_minutes: i32,
}

impl ManagerConfig {
    pub fn offset(&self) -> FixedOffset {
        offset_from_minutes(self.day_offset_minutes)
    }
}

/// Counts from applying a household manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSummary {
    pub kids: usize,
    pub chores_created: usize,
    pub chores_updated: usize,
}

/// The stateful orchestrator
///
/// Mutating operations take the chore's async lock, read and write the
/// household under its mutex without awaiting, release both, and only
/// then persist and notify.
pub struct Manager<St, S, N, C> {
    pub(crate) household: Arc<Mutex<Household>>,
    pub(crate) locks: ChoreLocks,
    pub(crate) executor: Executor<St, S, N>,
    pub(crate) stats: S,
    pub(crate) clock: C,
    pub(crate) config: ManagerConfig,
    pub(crate) last_tick: Mutex<Option<DateTime<Utc>>>,
}

impl<St, S, N, C> Manager<St, S, N, C>
where
    St: ChoreStore,
    S: StatsAdapter,
    N: NotifyAdapter,
    C: Clock + 'static,
{
    /// Load the household from the store
    pub fn new(
        deps: ManagerDeps<St, S, N>,
        clock: C,
        config: ManagerConfig,
    ) -> Result<Self, ManagerError> {
        let household = deps.store.load()?;
        tracing::info!(
            kids = household.kids.len(),
            chores = household.chores.len(),
            "loaded household"
        );

        let household = Arc::new(Mutex::new(household));
        let executor = Executor::new(
            Arc::new(deps.store),
            deps.stats.clone(),
            deps.notify,
            Arc::clone(&household),
        );
        Ok(Self {
            household,
            locks: ChoreLocks::new(),
            executor,
            stats: deps.stats,
            clock,
            config,
            last_tick: Mutex::new(None),
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    /// A copy of the current household
    pub fn household(&self) -> Household {
        self.lock_household().clone()
    }

    pub fn resolve_chore_id(&self, id: &str) -> Result<ChoreId, ManagerError> {
        Ok(self.lock_household().resolve_chore_id(id)?)
    }

    pub fn resolve_kid_id(&self, id: &str) -> Result<KidId, ManagerError> {
        Ok(self.lock_household().resolve_kid_id(id)?)
    }

    pub(crate) fn lock_household(&self) -> MutexGuard<'_, Household> {
        self.household.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn context<'a>(
        &self,
        now: DateTime<Utc>,
        actor: &'a str,
        reason: Option<&'a str>,
    ) -> Context<'a> {
        Context {
            now,
            day: local_day(now, self.config.offset()),
            actor,
            reason,
        }
    }

    /// Run the batch's effects; returns the events that were emitted
    pub(crate) async fn finish(&self, applied: Applied) -> Result<Vec<Event>, ManagerError> {
        let events = applied.events.clone();
        self.executor.execute_all(applied.into_effects()).await?;
        Ok(events)
    }

    /// Approval history for a smart rotation chore
    ///
    /// Fetched before any lock is taken. `None` for other chores or when
    /// the stats collaborator is unavailable, which falls back to simple
    /// rotation.
    pub(crate) async fn smart_summaries(
        &self,
        chore_id: &ChoreId,
    ) -> Option<HashMap<KidId, ApprovalSummary>> {
        let kids = self.smart_kids(chore_id)?;
        match self.stats.approval_summaries(chore_id, &kids).await {
            Ok(summaries) => Some(summaries),
            Err(e) => {
                tracing::warn!(chore = %chore_id, error = %e, "approval summaries unavailable");
                None
            }
        }
    }

    fn smart_kids(&self, chore_id: &ChoreId) -> Option<Vec<KidId>> {
        let household = self.lock_household();
        let chore = household.chores.get(chore_id)?;
        chore
            .capabilities()
            .smart_turns
            .then(|| chore.assigned_kids.clone())
    }

    async fn persist(&self) -> Result<(), ManagerError> {
        self.executor.execute_all(vec![Effect::Persist]).await?;
        Ok(())
    }

    /// Register or rename a kid. Returns true when the kid is new.
    pub async fn add_kid(&self, kid: Kid) -> Result<bool, ManagerError> {
        let created = {
            let mut household = self.lock_household();
            household.upsert_kid(kid.clone())
        };
        tracing::info!(kid = %kid.id, created, "kid saved");
        self.persist().await?;
        Ok(created)
    }

    /// Remove a kid and unassign them everywhere
    ///
    /// Refused when any of the kid's chores would no longer be valid
    /// without them, such as a rotation left with one kid.
    pub async fn remove_kid(&self, id: &KidId) -> Result<Vec<ChoreId>, ManagerError> {
        let assigned: Vec<ChoreId> = {
            let household = self.lock_household();
            household
                .chores
                .values()
                .filter(|c| c.is_assigned(id))
                .map(|c| c.id.clone())
                .collect()
        };
        // BTreeMap order keeps acquisition consistent across callers
        let mut guards = Vec::with_capacity(assigned.len());
        for chore_id in &assigned {
            guards.push(self.locks.acquire(chore_id).await);
        }

        let chores = {
            let mut household = self.lock_household();
            for chore in household.chores.values().filter(|c| c.is_assigned(id)) {
                without_kid(chore, id).validate()?;
            }
            household.remove_kid(id)?
        };
        drop(guards);
        tracing::info!(kid = %id, chores = chores.len(), "kid removed");
        self.persist().await?;
        Ok(chores)
    }

    /// Create or update a chore definition
    pub async fn apply_chore(&self, chore: ChoreDef) -> Result<AssignmentChange, ManagerError> {
        let guard = self.locks.acquire(&chore.id).await;
        let now = self.clock.now();
        let id = chore.id.clone();
        let change = {
            let mut household = self.lock_household();
            prepare_chore(&household, chore).map(|c| household.upsert_chore(c, now))?
        };
        drop(guard);

        tracing::info!(
            chore = %id,
            created = change.created,
            added = change.added.len(),
            removed = change.removed.len(),
            "chore saved"
        );
        self.persist().await?;
        Ok(change)
    }

    /// Apply every kid and chore in a manifest, persisting once
    pub async fn apply_manifest(
        &self,
        manifest: HouseholdManifest,
    ) -> Result<ManifestSummary, ManagerError> {
        let mut summary = ManifestSummary {
            kids: manifest.kids.len(),
            ..ManifestSummary::default()
        };
        {
            let mut household = self.lock_household();
            for kid in manifest.kids {
                household.upsert_kid(kid);
            }
        }

        for chore in manifest.chores {
            let _guard = self.locks.acquire(&chore.id).await;
            let now = self.clock.now();
            let change = {
                let mut household = self.lock_household();
                prepare_chore(&household, chore).map(|c| household.upsert_chore(c, now))?
            };
            if change.created {
                summary.chores_created += 1;
            } else {
                summary.chores_updated += 1;
            }
        }

        tracing::info!(
            kids = summary.kids,
            created = summary.chores_created,
            updated = summary.chores_updated,
            "manifest applied"
        );
        self.persist().await?;
        Ok(summary)
    }

    /// Delete a chore and its status records
    pub async fn remove_chore(&self, id: &ChoreId) -> Result<ChoreDef, ManagerError> {
        let guard = self.locks.acquire(id).await;
        let removed = {
            let mut household = self.lock_household();
            household.remove_chore(id)?
        };
        drop(guard);
        self.locks.forget(id);

        tracing::info!(chore = %id, "chore removed");
        self.persist().await?;
        Ok(removed)
    }
}

/// The chore as it would look once `kid` is unassigned
fn without_kid(chore: &ChoreDef, kid: &KidId) -> ChoreDef {
    let mut chore = chore.clone();
    chore.assigned_kids.retain(|k| k != kid);
    chore
}

/// Validate an incoming definition against the household and carry over
/// rotation state from the stored version
///
/// A definition that names no turn holder keeps the stored one. Criteria
/// changes run the rotation transition, and a rotation chore always ends
/// up with an assigned turn holder.
fn prepare_chore(household: &Household, mut chore: ChoreDef) -> Result<ChoreDef, ManagerError> {
    for kid in &chore.assigned_kids {
        if !household.kids.contains_key(kid) {
            return Err(ValidationError::UnknownKid(kid.clone()).into());
        }
    }

    let existing = household.chores.get(&chore.id);
    let explicit_turn = chore.rotation_current_kid_id.is_some();
    if let Some(existing) = existing {
        if !explicit_turn {
            chore.rotation_current_kid_id = existing.rotation_current_kid_id.clone();
            chore.rotation_cycle_override = existing.rotation_cycle_override;
        }
    }

    let old_criteria = existing.map_or(chore.criteria, |e| e.criteria);
    let delta = criteria_transition(old_criteria, chore.criteria, &chore.assigned_kids);
    if !(explicit_turn && chore.criteria.is_rotation()) {
        delta.apply(&mut chore);
    }

    if chore.criteria.is_rotation() {
        let valid = chore
            .rotation_current_kid_id
            .as_ref()
            .is_some_and(|k| chore.is_assigned(k));
        if !valid {
            chore.rotation_current_kid_id = chore.assigned_kids.first().cloned();
        }
    } else {
        chore.rotation_current_kid_id = None;
        chore.rotation_cycle_override = false;
    }

    chore.validate()?;
    Ok(chore)
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
