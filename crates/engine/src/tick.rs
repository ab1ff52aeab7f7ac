// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The scan pipeline
//!
//! One tick: categorize at a single timestamp, apply boundary resets,
//! drop overdue entries for pairs those resets touched, mark what is
//! still late, emit window and reminder notices, persist once, notify.

use std::collections::{BTreeSet, HashMap};

use chores_adapters::{NotifyAdapter, StatsAdapter};
use chores_core::engine::plan;
use chores_core::schedule::approval_boundary_passed;
use chores_core::{
    Action, ActionKind, ApprovalSummary, ChoreId, Clock, Event, KidId, OverdueHandling,
    StoredState,
};
use chores_storage::{ChoreStore, Household, StorageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::apply::{apply_effects, next_turn, reschedule, set_turn, subject, Applied};
use crate::scan::{categorize, filter_touched, OverdueEntry, Pair};
use crate::{Manager, ManagerError};

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub scanned_at: Option<DateTime<Utc>>,
    pub reset: usize,
    pub overdue: usize,
    pub missed: usize,
    pub skipped: usize,
    pub notices: usize,
    pub persisted: bool,
}

/// Outcome of the boundary reset for one chore
#[derive(Default)]
struct ResetOutcome {
    applied: Applied,
    reset: usize,
    missed: usize,
    touched: Vec<KidId>,
}

impl<St, S, N, C> Manager<St, S, N, C>
where
    St: ChoreStore,
    S: StatsAdapter,
    N: NotifyAdapter,
    C: Clock + 'static,
{
    /// Run one pass of the scan pipeline
    pub async fn tick(&self) -> Result<TickReport, ManagerError> {
        let now = self.clock.now();
        let offset = self.config.offset();
        let last = {
            let mut last_tick = self.last_tick.lock().unwrap_or_else(|e| e.into_inner());
            last_tick.replace(now)
        };
        let buckets = {
            let household = self.lock_household();
            categorize(&household, now, last, offset)
        };

        let mut summaries = HashMap::new();
        for chore_id in buckets.reset.keys() {
            if let Some(s) = self.smart_summaries(chore_id).await {
                summaries.insert(chore_id.clone(), s);
            }
        }

        let mut report = TickReport {
            scanned_at: Some(now),
            ..TickReport::default()
        };
        let mut applied = Applied::default();
        let mut touched = BTreeSet::new();

        for (chore_id, kids) in &buckets.reset {
            let _guard = self.locks.acquire(chore_id).await;
            let outcome = {
                let mut household = self.lock_household();
                self.reset_chore(&mut household, chore_id, kids, summaries.get(chore_id), now)
            };
            match outcome {
                Ok(outcome) => {
                    report.reset += outcome.reset;
                    report.missed += outcome.missed;
                    touched.extend(
                        outcome
                            .touched
                            .into_iter()
                            .map(|kid| Pair::new(chore_id.clone(), kid)),
                    );
                    applied.merge(outcome.applied);
                }
                Err(e) => tracing::debug!(chore = %chore_id, error = %e, "boundary reset skipped"),
            }
        }

        for entry in filter_touched(buckets.overdue, &touched) {
            let _guard = self.locks.acquire(&entry.pair.chore_id).await;
            let outcome = {
                let mut household = self.lock_household();
                self.mark_late(&mut household, &entry, now)
            };
            match outcome {
                Ok(Some(batch)) => {
                    match entry.action {
                        ActionKind::Miss => report.missed += 1,
                        _ => report.overdue += 1,
                    }
                    applied.merge(batch);
                }
                Ok(None) => report.skipped += 1,
                Err(e) => tracing::debug!(
                    chore = %entry.pair.chore_id,
                    kid = %entry.pair.kid_id,
                    error = %e,
                    "overdue check skipped"
                ),
            }
        }

        let notices = {
            let household = self.lock_household();
            notices(&household, &buckets.due_window, &buckets.reminders)
        };
        report.notices = notices.len();
        applied.events.extend(notices);

        report.persisted = applied.changed;
        if report.reset + report.overdue + report.missed + report.notices > 0 {
            tracing::info!(
                reset = report.reset,
                overdue = report.overdue,
                missed = report.missed,
                notices = report.notices,
                "tick"
            );
        }
        self.executor.execute_all(applied.into_effects()).await?;
        Ok(report)
    }

    /// Apply the approval-reset boundary to one chore's bucketed kids
    fn reset_chore(
        &self,
        household: &mut Household,
        chore_id: &ChoreId,
        kids: &[KidId],
        summaries: Option<&HashMap<KidId, ApprovalSummary>>,
        now: DateTime<Utc>,
    ) -> Result<ResetOutcome, StorageError> {
        let offset = self.config.offset();
        let chore = household.chore(chore_id)?.clone();
        let caps = chore.capabilities();
        let statuses = household.statuses.get(chore_id).cloned().unwrap_or_default();

        // Re-check in-lock; an action may have run since the scan
        let due_kids: Vec<KidId> = kids
            .iter()
            .filter(|kid| {
                statuses.get(*kid).is_some_and(|s| {
                    approval_boundary_passed(
                        chore.approval_reset,
                        s.period_start,
                        chore.due_date_for(kid),
                        now,
                        offset,
                    )
                })
            })
            .cloned()
            .collect();
        if due_kids.is_empty() {
            return Ok(ResetOutcome::default());
        }

        let late_and_clean = |kid: &KidId| {
            statuses.get(kid).is_some_and(|s| {
                s.is_clean()
                    && chore.is_past_due(kid, now)
                    && (chore.overdue_handling.marks_overdue() || chore.overdue_handling.is_lock())
                    && (!caps.rotation || chore.rotation_current_kid_id.as_ref() == Some(kid))
            })
        };

        let ctx = self.context(now, "system", None);
        let mut outcome = ResetOutcome::default();

        // A lock chore whose due date lapsed unseen still records the miss
        // before the midnight reset clears it
        let lapsed: Vec<KidId> = due_kids
            .iter()
            .filter(|kid| chore.overdue_handling.is_lock() && late_and_clean(*kid))
            .cloned()
            .collect();
        for kid in &lapsed {
            let effects = plan(&household.snapshot(chore_id, now)?, kid, &Action::Miss);
            outcome.missed += effects.len();
            outcome.applied.merge(apply_effects(household, chore_id, &effects, &ctx));
        }

        let keeps_overdue = chore.overdue_handling == OverdueHandling::AtDueDate;
        let effects: Vec<_> = {
            let snapshot = household.snapshot(chore_id, now)?;
            let mut seen = BTreeSet::new();
            due_kids
                .iter()
                .flat_map(|kid| plan(&snapshot, kid, &Action::Reset))
                .filter(|e| due_kids.contains(&e.kid_id))
                .filter(|e| !(keeps_overdue && e.previous_state == StoredState::Overdue))
                .filter(|e| seen.insert(e.kid_id.clone()))
                .collect()
        };

        outcome.reset = effects.len();
        outcome.applied.merge(apply_effects(household, chore_id, &effects, &ctx));
        outcome.applied.touch();

        // Every bucketed kid starts a new period, including those left as they were
        for kid in &due_kids {
            if let Some(status) = household.status_mut(chore_id, kid) {
                status.period_start = now;
            }
        }

        // When the boundary is the due date itself, kids who never started
        // are left for overdue detection against the date they missed
        outcome.touched = due_kids
            .iter()
            .filter(|kid| chore.approval_reset.is_midnight() || !late_and_clean(*kid))
            .cloned()
            .collect();

        let completed = |scope: &[KidId]| {
            let approved = |kid: &KidId| statuses.get(kid).is_some_and(|s| s.approved_in_period());
            if caps.reset_all_kids {
                scope.iter().all(approved)
            } else {
                scope.iter().any(approved)
            }
        };
        let scopes: Vec<Option<KidId>> = if caps.per_kid_due_dates {
            due_kids.iter().cloned().map(Some).collect()
        } else {
            vec![None]
        };
        let chore_mut = household.chore_mut(chore_id)?;
        for scope in scopes {
            let scope_kids = scope
                .clone()
                .map_or_else(|| chore.assigned_kids.clone(), |kid| vec![kid]);
            let due = match &scope {
                Some(kid) => chore.due_date_for(kid),
                None => chore.due_date,
            };
            let passed = due.is_some_and(|due| due <= now);
            if passed || completed(&scope_kids) {
                reschedule(chore_mut, scope.as_ref(), now);
            }
        }

        if caps.rotation {
            let holder = chore.rotation_current_kid_id.as_ref();
            let holder_missed = holder.is_some_and(|h| {
                lapsed.contains(h)
                    || statuses.get(h).is_some_and(|s| s.state == StoredState::Missed)
            });
            if holder_missed {
                let from = holder.cloned();
                if let Some(next) = next_turn(&chore, from.as_ref(), summaries) {
                    outcome.applied.push(set_turn(household, chore_id, next)?);
                }
            }
        }

        Ok(outcome)
    }

    /// Mark one late pair overdue or missed; `None` when nothing applied
    fn mark_late(
        &self,
        household: &mut Household,
        entry: &OverdueEntry,
        now: DateTime<Utc>,
    ) -> Result<Option<Applied>, StorageError> {
        let Pair { chore_id, kid_id } = &entry.pair;
        let effects = {
            let snapshot = household.snapshot(chore_id, now)?;
            let Some(status) = snapshot.status(kid_id) else {
                return Ok(None);
            };
            if entry.action == ActionKind::Overdue && status.state == StoredState::Overdue {
                tracing::debug!(chore = %chore_id, kid = %kid_id, "already overdue");
                return Ok(None);
            }
            if status.has_pending_claim()
                || !matches!(status.state, StoredState::Pending | StoredState::Overdue)
            {
                tracing::debug!(chore = %chore_id, kid = %kid_id, state = %status.state, "no longer late");
                return Ok(None);
            }
            let action = match entry.action {
                ActionKind::Miss => Action::Miss,
                _ => Action::Overdue,
            };
            plan(&snapshot, kid_id, &action)
        };
        if effects.is_empty() {
            return Ok(None);
        }

        let ctx = self.context(now, "system", None);
        Ok(Some(apply_effects(household, chore_id, &effects, &ctx)))
    }
}

/// Read-only due-window and reminder events
fn notices(household: &Household, due_window: &[Pair], reminders: &[Pair]) -> Vec<Event> {
    let due_date = |pair: &Pair| {
        household
            .chores
            .get(&pair.chore_id)
            .and_then(|c| c.due_date_for(&pair.kid_id))
    };
    let window = due_window.iter().filter_map(|pair| {
        Some(Event::ChoreDueWindow {
            subject: subject(household, &pair.chore_id, &pair.kid_id),
            update_stats: false,
            due_date: due_date(pair)?,
        })
    });
    let reminder = reminders.iter().filter_map(|pair| {
        Some(Event::ChoreDueReminder {
            subject: subject(household, &pair.chore_id, &pair.kid_id),
            update_stats: false,
            due_date: due_date(pair)?,
        })
    });
    window.chain(reminder).collect()
}

#[cfg(test)]
#[path = "tick_tests.rs"]
mod tests;
