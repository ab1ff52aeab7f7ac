// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use super::{StatsAdapter, StatsError};
use async_trait::async_trait;
use chores_core::{ApprovalSummary, ChoreId, KidId, StatsRecord};

/// Discards records and reports no history
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpStatsAdapter;

impl NoOpStatsAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatsAdapter for NoOpStatsAdapter {
    async fn record(&self, _record: &StatsRecord) -> Result<(), StatsError> {
        Ok(())
    }

    async fn approval_summaries(
        &self,
        _chore: &ChoreId,
        _kids: &[KidId],
    ) -> Result<HashMap<KidId, ApprovalSummary>, StatsError> {
        Ok(HashMap::new())
    }
}
