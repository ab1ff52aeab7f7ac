// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use std::sync::{Arc, Mutex};

use chores_adapters::{NotifyAdapter, NotifyError, StatsAdapter, StatsError};
use chores_core::Effect;
use chores_storage::{ChoreStore, Household, StorageError};
use thiserror::Error;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("stats error: {0}")]
    Stats(#[from] StatsError),
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
}

/// Executes effects against the store and the collaborators
pub struct Executor<St, S, N> {
    store: Arc<St>,
    stats: S,
    notify: N,
    household: Arc<Mutex<Household>>,
}

impl<St, S, N> Executor<St, S, N>
where
    St: ChoreStore,
    S: StatsAdapter,
    N: NotifyAdapter,
{
    pub fn new(store: Arc<St>, stats: S, notify: N, household: Arc<Mutex<Household>>) -> Self {
        Self {
            store,
            stats,
            notify,
            household,
        }
    }

    /// Execute a single effect with tracing
    pub async fn execute(&self, effect: Effect) -> Result<(), ExecuteError> {
        let op_name = effect.name();
        let span = tracing::info_span!("effect", effect = op_name);
        let _guard = span.enter();

        tracing::debug!(fields = ?effect.fields(), "executing");

        let start = std::time::Instant::now();
        let result = self.execute_inner(effect).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "completed"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "failed"
            ),
        }

        result
    }

    /// Execute effects in order
    ///
    /// A failed persist aborts the batch; stats and notification failures
    /// are logged and the batch carries on.
    pub async fn execute_all(&self, effects: Vec<Effect>) -> Result<(), ExecuteError> {
        for effect in effects {
            match self.execute(effect).await {
                Ok(()) => {}
                Err(e @ ExecuteError::Storage(_)) => return Err(e),
                Err(e) => tracing::warn!(error = %e, "collaborator effect failed, continuing"),
            }
        }
        Ok(())
    }

    async fn execute_inner(&self, effect: Effect) -> Result<(), ExecuteError> {
        match effect {
            Effect::Persist => {
                let snapshot = {
                    let household = self.household.lock().unwrap_or_else(|e| e.into_inner());
                    household.clone()
                };
                self.store.save(&snapshot)?;
                Ok(())
            }

            Effect::RecordStats(record) => {
                self.stats.record(&record).await?;
                Ok(())
            }

            Effect::Emit(event) => {
                self.notify.notify(&event).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
