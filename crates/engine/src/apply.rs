// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Applying planned transitions to the household
//!
//! Everything here runs with the household mutex held and never awaits.
//! The result is a batch of effects for the executor to run afterwards.

use std::collections::HashMap;

use chores_core::schedule::next_due_after;
use chores_core::rotation::{next_turn_from_summaries, next_turn_simple};
use chores_core::{
    ActionKind, ApprovalSummary, ChoreDef, ChoreId, Effect, Event, FieldChange, KidId,
    StatsRecord, StoredState, Subject, TransitionEffect,
};
use chores_storage::{Household, StorageError};
use chrono::{DateTime, NaiveDate, Utc};

/// Who caused a batch of transitions, and when
pub(crate) struct Context<'a> {
    pub now: DateTime<Utc>,
    pub day: NaiveDate,
    pub actor: &'a str,
    pub reason: Option<&'a str>,
}

/// Accumulated outcome of one operation or tick
#[derive(Debug, Default)]
pub(crate) struct Applied {
    pub changed: bool,
    pub stats: Vec<StatsRecord>,
    pub events: Vec<Event>,
}

impl Applied {
    pub fn merge(&mut self, other: Applied) {
        self.changed |= other.changed;
        self.stats.extend(other.stats);
        self.events.extend(other.events);
    }

    /// Record a state change that has no event of its own
    pub fn touch(&mut self) {
        self.changed = true;
    }

    pub fn push(&mut self, event: Event) {
        self.changed = true;
        self.events.push(event);
    }

    /// Persist first, then statistics, then notifications
    pub fn into_effects(self) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(1 + self.stats.len() + self.events.len());
        if self.changed {
            effects.push(Effect::Persist);
        }
        effects.extend(self.stats.into_iter().map(Effect::RecordStats));
        effects.extend(self.events.into_iter().map(Effect::Emit));
        effects
    }
}

pub(crate) fn subject(household: &Household, chore_id: &ChoreId, kid_id: &KidId) -> Subject {
    Subject {
        kid_id: kid_id.clone(),
        kid_name: household.kid_name(kid_id),
        chore_id: chore_id.clone(),
        chore_name: household
            .chores
            .get(chore_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| chore_id.to_string()),
    }
}

/// Apply planned effects to status records, one event per affected kid
pub(crate) fn apply_effects(
    household: &mut Household,
    chore_id: &ChoreId,
    effects: &[TransitionEffect],
    ctx: &Context<'_>,
) -> Applied {
    let mut applied = Applied::default();

    for effect in effects {
        let due = household
            .chores
            .get(chore_id)
            .and_then(|c| c.due_date_for(&effect.kid_id));
        let subject = subject(household, chore_id, &effect.kid_id);
        let Some(status) = household.status_mut(chore_id, &effect.kid_id) else {
            tracing::debug!(chore = %chore_id, kid = %effect.kid_id, "no status record, skipping effect");
            continue;
        };
        status.apply(effect, ctx.now, ctx.day);

        if effect.update_stats {
            if let Some(kind) = effect.action.stat_kind() {
                applied.stats.push(StatsRecord {
                    kid_id: effect.kid_id.clone(),
                    chore_id: chore_id.clone(),
                    kind,
                    points: effect.points,
                    at: ctx.now,
                });
            }
        }
        applied.push(event_for(effect, subject, due, ctx));
    }

    applied
}

fn event_for(
    effect: &TransitionEffect,
    subject: Subject,
    due_date: Option<DateTime<Utc>>,
    ctx: &Context<'_>,
) -> Event {
    let update_stats = effect.update_stats;
    let previous_state = effect.previous_state;
    match effect.action {
        ActionKind::Claim => Event::ChoreClaimed {
            subject,
            update_stats,
            actor: ctx.actor.to_string(),
        },
        ActionKind::Approve => Event::ChoreApproved {
            subject,
            update_stats,
            approver: ctx.actor.to_string(),
            points: effect.points,
            previous_state,
        },
        ActionKind::Disapprove => Event::ChoreDisapproved {
            subject,
            update_stats,
            approver: ctx.actor.to_string(),
            reason: ctx.reason.map(str::to_string),
            previous_state,
        },
        ActionKind::Undo => Event::ChoreUndone {
            subject,
            update_stats,
            previous_state,
        },
        ActionKind::Overdue => Event::ChoreOverdue {
            subject,
            update_stats,
            due_date,
        },
        ActionKind::Miss => Event::ChoreMissed {
            subject,
            update_stats,
            due_date,
        },
        ActionKind::Reset => Event::ChoreReset {
            subject,
            update_stats,
            previous_state,
        },
    }
}

/// An unconditional return to pending that clears ownership
pub(crate) fn forced_reset(kid_id: &KidId, previous: StoredState) -> TransitionEffect {
    TransitionEffect {
        kid_id: kid_id.clone(),
        action: ActionKind::Reset,
        previous_state: previous,
        new_state: StoredState::Pending,
        update_stats: false,
        points: 0.0,
        claimed_by: FieldChange::Clear,
        completed_by: FieldChange::Clear,
    }
}

/// Next turn holder, smart when summaries are available
pub(crate) fn next_turn(
    chore: &ChoreDef,
    from: Option<&KidId>,
    summaries: Option<&HashMap<KidId, ApprovalSummary>>,
) -> Option<KidId> {
    match summaries.filter(|_| chore.capabilities().smart_turns) {
        Some(summaries) => next_turn_from_summaries(&chore.assigned_kids, summaries),
        None => next_turn_simple(&chore.assigned_kids, from),
    }
}

/// Summaries fetched before an approval, with that approval counted
pub(crate) fn with_approval(
    summaries: &HashMap<KidId, ApprovalSummary>,
    kid: &KidId,
    at: DateTime<Utc>,
) -> HashMap<KidId, ApprovalSummary> {
    let mut summaries = summaries.clone();
    let entry = summaries.entry(kid.clone()).or_default();
    entry.approved = entry.approved.saturating_add(1);
    entry.last_approved_at = Some(at);
    summaries
}

/// Hand the turn to `next` and close any open cycle
pub(crate) fn set_turn(
    household: &mut Household,
    chore_id: &ChoreId,
    next: KidId,
) -> Result<Event, StorageError> {
    let next_kid_name = household.kid_name(&next);
    let chore = household.chore_mut(chore_id)?;
    let previous_kid_id = chore.rotation_current_kid_id.replace(next.clone());
    chore.rotation_cycle_override = false;
    Ok(Event::RotationAdvanced {
        chore_id: chore_id.clone(),
        chore_name: chore.name.clone(),
        update_stats: false,
        previous_kid_id,
        next_kid_id: next,
        next_kid_name,
    })
}

/// Move a due date to its next occurrence after `now`
///
/// `kid` scopes the change on chores with per-kid due dates. Non-recurring
/// chores lose the date instead. Returns false when there was no date.
pub(crate) fn reschedule(chore: &mut ChoreDef, kid: Option<&KidId>, now: DateTime<Utc>) -> bool {
    let kid = kid.filter(|_| chore.capabilities().per_kid_due_dates);
    let current = match kid {
        Some(kid) => chore.due_date_for(kid),
        None => chore.due_date,
    };
    let Some(due) = current else {
        return false;
    };

    let next = next_due_after(chore.frequency, due, now);
    match (kid, next) {
        (Some(kid), Some(next)) => {
            chore.kid_due_dates.insert(kid.clone(), next);
        }
        (Some(kid), None) => {
            chore.kid_due_dates.remove(kid);
            chore.due_date = None;
        }
        (None, next) => chore.set_due_date(None, next),
    }
    true
}

#[cfg(test)]
#[path = "apply_tests.rs"]
mod tests;
