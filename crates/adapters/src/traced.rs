// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use std::collections::HashMap;

use crate::notify::{NotifyAdapter, NotifyError};
use crate::stats::{StatsAdapter, StatsError};
use async_trait::async_trait;
use chores_core::{ApprovalSummary, ChoreId, Event, KidId, StatsRecord};

/// Wrapper that adds tracing to any StatsAdapter
#[derive(Clone)]
pub struct TracedStatsAdapter<S> {
    inner: S,
}

impl<S> TracedStatsAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: StatsAdapter> StatsAdapter for TracedStatsAdapter<S> {
    async fn record(&self, record: &StatsRecord) -> Result<(), StatsError> {
        let span = tracing::info_span!(
            "stats.record",
            kid = %record.kid_id,
            chore = %record.chore_id,
            kind = ?record.kind,
        );
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.record(record).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::debug!(
                points = record.points,
                elapsed_ms = elapsed.as_millis() as u64,
                "recorded"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "record failed"
            ),
        }

        result
    }

    async fn approval_summaries(
        &self,
        chore: &ChoreId,
        kids: &[KidId],
    ) -> Result<HashMap<KidId, ApprovalSummary>, StatsError> {
        let span = tracing::info_span!("stats.summaries", chore = %chore, kids = kids.len());
        let _guard = span.enter();

        let result = self.inner.approval_summaries(chore, kids).await;
        match &result {
            Ok(summaries) => tracing::debug!(known = summaries.len(), "fetched"),
            Err(e) => tracing::warn!(error = %e, "summary fetch failed"),
        }
        result
    }
}

/// Wrapper that adds tracing to any NotifyAdapter
#[derive(Clone)]
pub struct TracedNotifyAdapter<N> {
    inner: N,
}

impl<N> TracedNotifyAdapter<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }
}

#[async_trait]
impl<N: NotifyAdapter> NotifyAdapter for TracedNotifyAdapter<N> {
    async fn notify(&self, event: &Event) -> Result<(), NotifyError> {
        let span = tracing::info_span!("notify", event = event.name(), chore = %event.chore_id());
        let _guard = span.enter();

        let result = self.inner.notify(event).await;
        match &result {
            Ok(()) => tracing::debug!(update_stats = event.update_stats(), "delivered"),
            // Delivery failures never fail the action that emitted the event
            Err(e) => tracing::warn!(error = %e, "delivery failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
