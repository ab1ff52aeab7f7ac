// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action handlers
//!
//! Each handler prefetches what it needs from collaborators, takes the
//! chore lock, re-checks eligibility against fresh state, applies the
//! engine's plan, releases the lock and then runs the resulting effects.

use std::collections::HashMap;

use chores_adapters::{NotifyAdapter, StatsAdapter};
use chores_core::engine::{can_approve, can_claim, plan};
use chores_core::{
    Action, ApprovalReset, ApprovalSummary, BlockReason, ChoreId, Clock, Eligibility, Event,
    KidId, OverdueHandling, StatKind, StatsRecord, StoredState, TransitionEffect, ValidationError,
};
use chores_storage::{ChoreStore, Household};
use chrono::{DateTime, Utc};

use crate::apply::{
    apply_effects, forced_reset, next_turn, reschedule, set_turn, subject, with_approval,
    Applied,
};
use crate::{Manager, ManagerError};

/// Approver name recorded for auto-approved claims
pub const AUTO_APPROVER: &str = "auto";

fn check(action: &'static str, eligibility: Eligibility) -> Result<(), ManagerError> {
    match eligibility {
        Eligibility::Eligible => Ok(()),
        Eligibility::Blocked(reason) => Err(ManagerError::rejected(action, reason)),
    }
}

fn non_empty(
    action: &'static str,
    effects: Vec<TransitionEffect>,
) -> Result<Vec<TransitionEffect>, ManagerError> {
    if effects.is_empty() {
        return Err(ManagerError::rejected(action, BlockReason::InvalidTransition));
    }
    Ok(effects)
}

fn require_claim(
    action: &'static str,
    household: &Household,
    chore_id: &ChoreId,
    kid_id: &KidId,
) -> Result<(), ManagerError> {
    let chore = household.chore(chore_id)?;
    let status = household
        .status(chore_id, kid_id)
        .filter(|_| chore.is_assigned(kid_id))
        .ok_or(ManagerError::rejected(action, BlockReason::NotAssigned))?;
    if !status.has_pending_claim() {
        return Err(ManagerError::rejected(action, BlockReason::NoPendingClaim));
    }
    Ok(())
}

impl<St, S, N, C> Manager<St, S, N, C>
where
    St: ChoreStore,
    S: StatsAdapter,
    N: NotifyAdapter,
    C: Clock + 'static,
{
    /// A kid claims a chore
    ///
    /// Auto-approve chores are approved inline under the same lock.
    pub async fn claim(
        &self,
        kid_id: &KidId,
        chore_id: &ChoreId,
        actor: &str,
    ) -> Result<Vec<Event>, ManagerError> {
        let summaries = self.smart_summaries(chore_id).await;
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let now = self.clock.now();
            let mut household = self.lock_household();
            let mut applied = self.claim_locked(&mut household, kid_id, chore_id, actor, now)?;
            if household.chore(chore_id)?.auto_approve {
                applied.merge(self.approve_locked(
                    &mut household,
                    kid_id,
                    chore_id,
                    AUTO_APPROVER,
                    None,
                    summaries.as_ref(),
                    now,
                )?);
            }
            applied
        };
        drop(guard);

        tracing::info!(kid = %kid_id, chore = %chore_id, actor, "claimed");
        self.finish(applied).await
    }

    /// A parent approves a kid's claim, or a late chore outright
    pub async fn approve(
        &self,
        kid_id: &KidId,
        chore_id: &ChoreId,
        approver: &str,
        points: Option<f64>,
    ) -> Result<Vec<Event>, ManagerError> {
        // Read before the lock: an approval still flushing its stats record
        // is not counted, so racing smart approvals may pick from stale counts
        let summaries = self.smart_summaries(chore_id).await;
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let now = self.clock.now();
            let mut household = self.lock_household();
            self.approve_locked(
                &mut household,
                kid_id,
                chore_id,
                approver,
                points,
                summaries.as_ref(),
                now,
            )?
        };
        drop(guard);

        tracing::info!(kid = %kid_id, chore = %chore_id, approver, "approved");
        self.finish(applied).await
    }

    /// A parent rejects a pending claim
    pub async fn disapprove(
        &self,
        kid_id: &KidId,
        chore_id: &ChoreId,
        approver: &str,
        reason: Option<&str>,
    ) -> Result<Vec<Event>, ManagerError> {
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let now = self.clock.now();
            let mut household = self.lock_household();
            require_claim("disapprove", &household, chore_id, kid_id)?;
            let effects = {
                let snapshot = household.snapshot(chore_id, now)?;
                non_empty("disapprove", plan(&snapshot, kid_id, &Action::Disapprove))?
            };
            let ctx = self.context(now, approver, reason);
            apply_effects(&mut household, chore_id, &effects, &ctx)
        };
        drop(guard);

        tracing::info!(kid = %kid_id, chore = %chore_id, approver, "disapproved");
        self.finish(applied).await
    }

    /// A kid takes back their own claim
    pub async fn undo_claim(
        &self,
        kid_id: &KidId,
        chore_id: &ChoreId,
    ) -> Result<Vec<Event>, ManagerError> {
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let now = self.clock.now();
            let mut household = self.lock_household();
            require_claim("undo", &household, chore_id, kid_id)?;
            let effects = {
                let snapshot = household.snapshot(chore_id, now)?;
                non_empty("undo", plan(&snapshot, kid_id, &Action::Undo))?
            };
            let actor = household.kid_name(kid_id);
            let ctx = self.context(now, &actor, None);
            apply_effects(&mut household, chore_id, &effects, &ctx)
        };
        drop(guard);

        tracing::info!(kid = %kid_id, chore = %chore_id, "claim undone");
        self.finish(applied).await
    }

    /// Set or clear a due date, for one kid on independent chores
    ///
    /// Overdue kids whose new date is no longer past return to pending.
    /// Missed kids stay locked until the boundary reset.
    pub async fn set_due_date(
        &self,
        chore_id: &ChoreId,
        date: Option<DateTime<Utc>>,
        kid_id: Option<&KidId>,
    ) -> Result<Vec<Event>, ManagerError> {
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let now = self.clock.now();
            let mut household = self.lock_household();
            let mut updated = household.chore(chore_id)?.clone();
            if let Some(kid) = kid_id {
                if !updated.is_assigned(kid) {
                    return Err(ManagerError::rejected("set due date", BlockReason::NotAssigned));
                }
            }
            updated.set_due_date(kid_id, date);
            updated.validate()?;
            *household.chore_mut(chore_id)? = updated;

            let mut applied = Applied::default();
            applied.touch();
            let ctx = self.context(now, "system", None);
            for kid in affected_kids(&household, chore_id, kid_id)? {
                let chore = household.chore(chore_id)?;
                let due_date = chore.due_date_for(&kid);
                let relieved = household.status(chore_id, &kid).is_some_and(|s| {
                    s.state == StoredState::Overdue && !chore.is_past_due(&kid, now)
                });
                if relieved {
                    let effect = forced_reset(&kid, StoredState::Overdue);
                    applied.merge(apply_effects(&mut household, chore_id, &[effect], &ctx));
                }
                applied.push(Event::ChoreDueDateChanged {
                    subject: subject(&household, chore_id, &kid),
                    update_stats: false,
                    due_date,
                });
            }
            applied
        };
        drop(guard);

        tracing::info!(chore = %chore_id, due = ?date, "due date set");
        self.finish(applied).await
    }

    /// Skip the current occurrence and move to the next one
    ///
    /// With `mark_as_missed`, kids who had not finished get a missed
    /// record first. Kids return to pending and rotation chores pass the
    /// turn on.
    pub async fn skip_due_date(
        &self,
        chore_id: &ChoreId,
        kid_id: Option<&KidId>,
        mark_as_missed: bool,
    ) -> Result<Vec<Event>, ManagerError> {
        let summaries = self.smart_summaries(chore_id).await;
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let now = self.clock.now();
            let mut household = self.lock_household();
            self.skip_locked(
                &mut household,
                chore_id,
                kid_id,
                mark_as_missed,
                summaries.as_ref(),
                now,
            )?
        };
        drop(guard);

        tracing::info!(chore = %chore_id, mark_as_missed, "due date skipped");
        self.finish(applied).await
    }

    /// Clear overdue and missed states, everywhere or for one chore/kid
    pub async fn reset_overdue(
        &self,
        chore_id: Option<&ChoreId>,
        kid_id: Option<&KidId>,
    ) -> Result<Vec<Event>, ManagerError> {
        let chore_ids: Vec<ChoreId> = match chore_id {
            Some(id) => {
                self.lock_household().chore(id)?;
                vec![id.clone()]
            }
            None => self.lock_household().chores.keys().cloned().collect(),
        };

        let mut applied = Applied::default();
        for chore_id in &chore_ids {
            let _guard = self.locks.acquire(chore_id).await;
            let now = self.clock.now();
            let batch = {
                let mut household = self.lock_household();
                self.reset_overdue_locked(&mut household, chore_id, kid_id, now)?
            };
            applied.merge(batch);
        }

        tracing::info!(chores = chore_ids.len(), reset = applied.events.len(), "overdue reset");
        self.finish(applied).await
    }

    /// Hand a rotation chore's turn to a specific kid
    pub async fn set_rotation_turn(
        &self,
        chore_id: &ChoreId,
        kid_id: &KidId,
    ) -> Result<Vec<Event>, ManagerError> {
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let mut household = self.lock_household();
            let chore = household.chore(chore_id)?;
            if !chore.criteria.is_rotation() {
                return Err(ManagerError::NotRotation(chore_id.clone()));
            }
            if !chore.is_assigned(kid_id) {
                return Err(ManagerError::rejected("set turn", BlockReason::NotAssigned));
            }
            let mut applied = Applied::default();
            applied.push(set_turn(&mut household, chore_id, kid_id.clone())?);
            applied
        };
        drop(guard);

        tracing::info!(chore = %chore_id, kid = %kid_id, "rotation turn set");
        self.finish(applied).await
    }

    /// Start a rotation over from the first assigned kid
    pub async fn reset_rotation(&self, chore_id: &ChoreId) -> Result<Vec<Event>, ManagerError> {
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let mut household = self.lock_household();
            let chore = household.chore(chore_id)?;
            if !chore.criteria.is_rotation() {
                return Err(ManagerError::NotRotation(chore_id.clone()));
            }
            let mut applied = Applied::default();
            if let Some(first) = chore.assigned_kids.first().cloned() {
                applied.push(set_turn(&mut household, chore_id, first)?);
            }
            applied
        };
        drop(guard);

        tracing::info!(chore = %chore_id, "rotation reset");
        self.finish(applied).await
    }

    /// Let any assigned kid claim until the next approval
    pub async fn open_rotation_cycle(
        &self,
        chore_id: &ChoreId,
    ) -> Result<Vec<Event>, ManagerError> {
        let guard = self.locks.acquire(chore_id).await;
        let applied = {
            let mut household = self.lock_household();
            let chore = household.chore_mut(chore_id)?;
            if !chore.criteria.is_rotation() {
                return Err(ManagerError::NotRotation(chore_id.clone()));
            }
            let mut applied = Applied::default();
            if !chore.rotation_cycle_override {
                chore.rotation_cycle_override = true;
                applied.push(Event::RotationCycleOpened {
                    chore_id: chore_id.clone(),
                    chore_name: chore.name.clone(),
                    update_stats: false,
                });
            }
            applied
        };
        drop(guard);

        tracing::info!(chore = %chore_id, "rotation cycle opened");
        self.finish(applied).await
    }

    fn reset_overdue_locked(
        &self,
        household: &mut Household,
        chore_id: &ChoreId,
        kid_id: Option<&KidId>,
        now: DateTime<Utc>,
    ) -> Result<Applied, ManagerError> {
        let kids: Vec<KidId> = household
            .chore(chore_id)?
            .assigned_kids
            .iter()
            .filter(|k| kid_id.map_or(true, |wanted| *k == wanted))
            .cloned()
            .collect();

        let ctx = self.context(now, "system", None);
        let mut applied = Applied::default();
        for kid in kids {
            let Some(state) = household.status(chore_id, &kid).map(|s| s.state) else {
                continue;
            };
            if !matches!(state, StoredState::Overdue | StoredState::Missed) {
                continue;
            }
            let effect = forced_reset(&kid, state);
            applied.merge(apply_effects(household, chore_id, &[effect], &ctx));

            let chore = household.chore_mut(chore_id)?;
            if chore.is_past_due(&kid, now) {
                reschedule(chore, Some(&kid), now);
            }
        }
        Ok(applied)
    }

    fn claim_locked(
        &self,
        household: &mut Household,
        kid_id: &KidId,
        chore_id: &ChoreId,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<Applied, ManagerError> {
        let effects = {
            let snapshot = household.snapshot(chore_id, now)?;
            check("claim", can_claim(&snapshot, kid_id))?;
            let claimant = actor.to_string();
            non_empty("claim", plan(&snapshot, kid_id, &Action::Claim { claimant }))?
        };
        let ctx = self.context(now, actor, None);
        Ok(apply_effects(household, chore_id, &effects, &ctx))
    }

    #[allow(clippy::too_many_arguments)]
    fn approve_locked(
        &self,
        household: &mut Household,
        kid_id: &KidId,
        chore_id: &ChoreId,
        approver: &str,
        points: Option<f64>,
        summaries: Option<&HashMap<KidId, ApprovalSummary>>,
        now: DateTime<Utc>,
    ) -> Result<Applied, ManagerError> {
        let completer = household.kid_name(kid_id);
        let effects = {
            let snapshot = household.snapshot(chore_id, now)?;
            check("approve", can_approve(&snapshot, kid_id))?;
            let points = points.unwrap_or(snapshot.chore.points);
            if !points.is_finite() || points < 0.0 {
                return Err(ValidationError::InvalidPoints {
                    chore: chore_id.clone(),
                    points,
                }
                .into());
            }
            let action = Action::Approve { completer, points };
            non_empty("approve", plan(&snapshot, kid_id, &action))?
        };
        let previous = effects
            .first()
            .map_or(StoredState::Claimed, |e| e.previous_state);

        let ctx = self.context(now, approver, None);
        let mut applied = apply_effects(household, chore_id, &effects, &ctx);

        let chore = household.chore(chore_id)?.clone();
        if chore.criteria.is_rotation() {
            let counted = summaries.map(|s| with_approval(s, kid_id, now));
            if let Some(next) = next_turn(&chore, Some(kid_id), counted.as_ref()) {
                applied.push(set_turn(household, chore_id, next)?);
            }
        }

        let late_clear = chore.overdue_handling == OverdueHandling::AtDueDateClearImmediateOnLate
            && previous == StoredState::Overdue;
        if !(chore.approval_reset.allows_multiple() || late_clear) {
            return Ok(applied);
        }

        let caps = chore.capabilities();
        let resets = {
            let snapshot = household.snapshot(chore_id, now)?;
            if caps.reset_all_kids
                && !chore
                    .assigned_kids
                    .iter()
                    .all(|k| snapshot.status(k).is_some_and(|s| s.approved_in_period()))
            {
                return Ok(applied);
            }
            plan(&snapshot, kid_id, &Action::Reset)
        };
        let ctx = self.context(now, "system", None);
        applied.merge(apply_effects(household, chore_id, &resets, &ctx));

        let occurrence_done =
            chore.approval_reset == ApprovalReset::UponCompletion || late_clear;
        if occurrence_done {
            let scope = (!caps.reset_all_kids).then_some(kid_id);
            reschedule(household.chore_mut(chore_id)?, scope, now);
        }
        Ok(applied)
    }

    fn skip_locked(
        &self,
        household: &mut Household,
        chore_id: &ChoreId,
        kid_id: Option<&KidId>,
        mark_as_missed: bool,
        summaries: Option<&HashMap<KidId, ApprovalSummary>>,
        now: DateTime<Utc>,
    ) -> Result<Applied, ManagerError> {
        let chore = household.chore(chore_id)?.clone();
        if let Some(kid) = kid_id {
            if !chore.is_assigned(kid) {
                return Err(ManagerError::rejected("skip", BlockReason::NotAssigned));
            }
        }
        let kids = affected_kids(household, chore_id, kid_id)?;
        let ctx = self.context(now, "system", None);
        let mut applied = Applied::default();

        for kid in &kids {
            let due_date = chore.due_date_for(kid);
            let Some(status) = household.status(chore_id, kid).cloned() else {
                continue;
            };

            if mark_as_missed && !status.approved_in_period() {
                let event_subject = subject(household, chore_id, kid);
                if let Some(status) = household.status_mut(chore_id, kid) {
                    status.stats.record(StatKind::Missed, 0.0, ctx.day);
                    status.last_missed = Some(now);
                }
                applied.stats.push(StatsRecord {
                    kid_id: kid.clone(),
                    chore_id: chore_id.clone(),
                    kind: StatKind::Missed,
                    points: 0.0,
                    at: now,
                });
                applied.push(Event::ChoreMissed {
                    subject: event_subject,
                    update_stats: true,
                    due_date,
                });
            }

            if !status.is_clean() {
                let effect = forced_reset(kid, status.state);
                applied.merge(apply_effects(household, chore_id, &[effect], &ctx));
            }
        }

        let per_kid = chore.capabilities().per_kid_due_dates && kid_id.is_some();
        let moved = reschedule(household.chore_mut(chore_id)?, kid_id.filter(|_| per_kid), now);
        if moved {
            let updated = household.chore(chore_id)?.clone();
            for kid in &kids {
                applied.push(Event::ChoreDueDateChanged {
                    subject: subject(household, chore_id, kid),
                    update_stats: false,
                    due_date: updated.due_date_for(kid),
                });
            }
        }

        if chore.criteria.is_rotation() {
            let holder = chore.rotation_current_kid_id.as_ref();
            if let Some(next) = next_turn(&chore, holder, summaries) {
                applied.push(set_turn(household, chore_id, next)?);
            }
        }
        Ok(applied)
    }
}

/// Kids an operation scoped by an optional kid touches
///
/// Only chores with per-kid due dates scope to a single kid; on others a
/// due date belongs to everyone.
fn affected_kids(
    household: &Household,
    chore_id: &ChoreId,
    kid_id: Option<&KidId>,
) -> Result<Vec<KidId>, ManagerError> {
    let chore = household.chore(chore_id)?;
    match kid_id {
        Some(kid) if chore.capabilities().per_kid_due_dates => Ok(vec![kid.clone()]),
        _ => Ok(chore.assigned_kids.clone()),
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
