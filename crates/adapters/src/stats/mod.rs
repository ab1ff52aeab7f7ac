// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Statistics adapters
//!
//! The stats collaborator receives counted transitions and answers the
//! approval-history questions smart rotation asks.

mod memory;
mod noop;

pub use memory::MemoryStatsAdapter;
pub use noop::NoOpStatsAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStatsAdapter, StatsCall};

use std::collections::HashMap;

use async_trait::async_trait;
use chores_core::{ApprovalSummary, ChoreId, KidId, StatsRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats backend unavailable: {0}")]
    Unavailable(String),
    #[error("stats record rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait StatsAdapter: Clone + Send + Sync + 'static {
    /// Record a counted transition (approval, miss, ...)
    async fn record(&self, record: &StatsRecord) -> Result<(), StatsError>;

    /// Lifetime approval history of `kids` on `chore`
    ///
    /// Kids with no history may be absent from the map.
    async fn approval_summaries(
        &self,
        chore: &ChoreId,
        kids: &[KidId],
    ) -> Result<HashMap<KidId, ApprovalSummary>, StatsError>;
}
