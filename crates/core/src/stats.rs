// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-kid, per-chore statistics bucketed by calendar period

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which transition a statistics update counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Claimed,
    Approved,
    Disapproved,
    Overdue,
    Missed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counters {
    pub claimed: u32,
    pub approved: u32,
    pub disapproved: u32,
    pub overdue: u32,
    pub missed: u32,
    pub points: f64,
}

impl Counters {
    fn bump(&mut self, kind: StatKind, points: f64) {
        match kind {
            StatKind::Claimed => self.claimed += 1,
            StatKind::Approved => {
                self.approved += 1;
                self.points += points;
            }
            StatKind::Disapproved => self.disapproved += 1,
            StatKind::Overdue => self.overdue += 1,
            StatKind::Missed => self.missed += 1,
        }
    }
}

/// Counters for one calendar period, identified by `key`
///
/// The key rolls over (e.g. `2026-W07` to `2026-W08`) and the counters
/// restart when a record lands in a new period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub key: String,
    pub counters: Counters,
}

impl PeriodBucket {
    fn record(&mut self, key: String, kind: StatKind, points: f64) {
        if self.key != key {
            self.key = key;
            self.counters = Counters::default();
        }
        self.counters.bump(kind, points);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub daily: PeriodBucket,
    pub weekly: PeriodBucket,
    pub monthly: PeriodBucket,
    pub yearly: PeriodBucket,
    pub all_time: Counters,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_streak_day: Option<NaiveDate>,
}

impl PeriodStats {
    /// Count a transition on the given local day
    pub fn record(&mut self, kind: StatKind, points: f64, day: NaiveDate) {
        let week = day.iso_week();
        self.daily.record(day.format("%Y-%m-%d").to_string(), kind, points);
        self.weekly
            .record(format!("{}-W{:02}", week.year(), week.week()), kind, points);
        self.monthly.record(day.format("%Y-%m").to_string(), kind, points);
        self.yearly.record(day.year().to_string(), kind, points);
        self.all_time.bump(kind, points);

        match kind {
            StatKind::Approved => self.extend_streak(day),
            StatKind::Overdue | StatKind::Missed => {
                self.current_streak = 0;
                self.last_streak_day = None;
            }
            StatKind::Claimed | StatKind::Disapproved => {}
        }
    }

    fn extend_streak(&mut self, day: NaiveDate) {
        match self.last_streak_day {
            Some(last) if last == day => return,
            Some(last) if last.succ_opt() == Some(day) => self.current_streak += 1,
            _ => self.current_streak = 1,
        }
        self.last_streak_day = Some(day);
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }
}
