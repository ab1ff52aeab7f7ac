// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process stats ledger

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{StatsAdapter, StatsError};
use async_trait::async_trait;
use chores_core::{ApprovalSummary, ChoreId, KidId, StatKind, StatsRecord};

#[derive(Default)]
struct Ledger {
    approvals: HashMap<(ChoreId, KidId), ApprovalSummary>,
    points: HashMap<KidId, f64>,
}

/// Approval history and point totals kept in memory
///
/// Seed it from persisted status records at startup so smart rotation
/// survives restarts.
#[derive(Clone, Default)]
pub struct MemoryStatsAdapter {
    ledger: Arc<Mutex<Ledger>>,
}

impl MemoryStatsAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, chore: ChoreId, kid: KidId, summary: ApprovalSummary) {
        self.lock().approvals.insert((chore, kid), summary);
    }

    pub fn points(&self, kid: &KidId) -> f64 {
        self.lock().points.get(kid).copied().unwrap_or(0.0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StatsAdapter for MemoryStatsAdapter {
    async fn record(&self, record: &StatsRecord) -> Result<(), StatsError> {
        if !record.points.is_finite() {
            return Err(StatsError::Rejected(format!(
                "non-finite points for {}",
                record.kid_id
            )));
        }

        let mut ledger = self.lock();
        if record.kind == StatKind::Approved {
            let summary = ledger
                .approvals
                .entry((record.chore_id.clone(), record.kid_id.clone()))
                .or_default();
            summary.approved += 1;
            summary.last_approved_at = Some(record.at);
            *ledger.points.entry(record.kid_id.clone()).or_insert(0.0) += record.points;
        }
        Ok(())
    }

    async fn approval_summaries(
        &self,
        chore: &ChoreId,
        kids: &[KidId],
    ) -> Result<HashMap<KidId, ApprovalSummary>, StatsError> {
        let ledger = self.lock();
        Ok(kids
            .iter()
            .filter_map(|kid| {
                ledger
                    .approvals
                    .get(&(chore.clone(), kid.clone()))
                    .map(|s| (kid.clone(), *s))
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
