// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! When the next tick is needed

use std::time::Duration;

use chores_core::schedule::next_midnight;
use chores_storage::Household;
use chrono::{DateTime, FixedOffset, Utc};

/// The earliest instant something can change: the periodic interval,
/// the next local midnight, or any upcoming due date, window start or
/// reminder
pub fn next_deadline(
    household: &Household,
    now: DateTime<Utc>,
    interval: Duration,
    offset: FixedOffset,
) -> DateTime<Utc> {
    let periodic = chrono::Duration::from_std(interval)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(now);
    let mut next = periodic.min(next_midnight(now, offset));

    for chore in household.chores.values() {
        for kid in &chore.assigned_kids {
            let instants = [
                chore.due_date_for(kid),
                chore.window_start_for(kid),
                chore.reminder_at_for(kid),
            ];
            for at in instants.into_iter().flatten() {
                if at > now && at < next {
                    next = at;
                }
            }
        }
    }
    next
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
