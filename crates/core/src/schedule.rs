// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar math for day boundaries, recurrence and approval resets
//!
//! All instants are UTC. The household's "midnight" is expressed as a
//! fixed UTC offset so boundary checks stay pure and deterministic.

use chrono::{
    DateTime, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};

use crate::chore::{ApprovalReset, Frequency};

/// Upper bound on periods skipped when catching a due date up to now
const MAX_CATCH_UP_PERIODS: u32 = 10_000;

/// Calendar day of `at` in the household's local offset
pub fn local_day(at: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    at.with_timezone(&offset).date_naive()
}

/// Most recent local midnight at or before `at`
pub fn start_of_day(at: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local_midnight = local_day(at, offset).and_time(NaiveTime::MIN);
    let utc = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    Utc.from_utc_datetime(&utc)
}

/// First local midnight strictly after `at`
pub fn next_midnight(at: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    start_of_day(at, offset) + Duration::days(1)
}

/// Advance a due date by one recurrence period
pub fn advance(frequency: Frequency, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match frequency {
        Frequency::None => None,
        Frequency::Daily => from.checked_add_signed(Duration::days(1)),
        Frequency::Weekly => from.checked_add_signed(Duration::weeks(1)),
        Frequency::Biweekly => from.checked_add_signed(Duration::weeks(2)),
        Frequency::Monthly => from.checked_add_months(Months::new(1)),
        Frequency::Custom { days } => from.checked_add_signed(Duration::days(i64::from(days))),
    }
}

/// Next due date strictly after `now`, stepping whole periods from `due`
///
/// Returns `None` for non-recurring chores.
pub fn next_due_after(
    frequency: Frequency,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let mut next = advance(frequency, due)?;
    let mut steps = 1;
    while next <= now && steps < MAX_CATCH_UP_PERIODS {
        next = advance(frequency, next)?;
        steps += 1;
    }
    (next > now).then_some(next)
}

/// Has the approval-reset boundary passed since the kid's period began?
///
/// Midnight policies reset once the period started before today's local
/// midnight. Due-date policies reset once the due date passes, provided
/// the period started before it. `upon_completion` resets at approval
/// time, never on a boundary.
pub fn approval_boundary_passed(
    policy: ApprovalReset,
    period_start: DateTime<Utc>,
    due: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> bool {
    match policy {
        ApprovalReset::AtMidnightOnce | ApprovalReset::AtMidnightMulti => {
            period_start < start_of_day(now, offset)
        }
        ApprovalReset::AtDueDateOnce | ApprovalReset::AtDueDateMulti => {
            due.is_some_and(|due| now >= due && period_start < due)
        }
        ApprovalReset::UponCompletion => false,
    }
}

/// Build an offset from minutes east of UTC, falling back to UTC
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
