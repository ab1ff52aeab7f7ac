// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake stats adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{StatsAdapter, StatsError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chores_core::{ApprovalSummary, ChoreId, KidId, StatsRecord};

/// Recorded stats call
#[derive(Debug, Clone, PartialEq)]
pub enum StatsCall {
    Record(StatsRecord),
    Summaries { chore: ChoreId, kids: Vec<KidId> },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<StatsCall>,
    summaries: HashMap<KidId, ApprovalSummary>,
    fail: bool,
}

/// Records calls and answers summary queries from seeded data
#[derive(Clone, Default)]
pub struct FakeStatsAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStatsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_summary(&self, kid: &str, approved: u32, last: Option<DateTime<Utc>>) {
        self.lock().summaries.insert(
            KidId::from(kid),
            ApprovalSummary {
                approved,
                last_approved_at: last,
            },
        );
    }

    /// Make every subsequent call fail
    pub fn set_failing(&self, fail: bool) {
        self.lock().fail = fail;
    }

    pub fn calls(&self) -> Vec<StatsCall> {
        self.lock().calls.clone()
    }

    pub fn records(&self) -> Vec<StatsRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StatsCall::Record(r) => Some(r),
                StatsCall::Summaries { .. } => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StatsAdapter for FakeStatsAdapter {
    async fn record(&self, record: &StatsRecord) -> Result<(), StatsError> {
        let mut state = self.lock();
        state.calls.push(StatsCall::Record(record.clone()));
        if state.fail {
            return Err(StatsError::Unavailable("fake failure".to_string()));
        }
        Ok(())
    }

    async fn approval_summaries(
        &self,
        chore: &ChoreId,
        kids: &[KidId],
    ) -> Result<HashMap<KidId, ApprovalSummary>, StatsError> {
        let mut state = self.lock();
        state.calls.push(StatsCall::Summaries {
            chore: chore.clone(),
            kids: kids.to_vec(),
        });
        if state.fail {
            return Err(StatsError::Unavailable("fake failure".to_string()));
        }
        Ok(kids
            .iter()
            .filter_map(|k| state.summaries.get(k).map(|s| (k.clone(), *s)))
            .collect())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
