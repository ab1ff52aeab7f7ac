// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-chore action locks

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chores_core::ChoreId;
use tokio::sync::OwnedMutexGuard;

/// Serializes read-then-write operations on one chore
///
/// Guards are owned so they can be dropped before any persistence or
/// notification work starts.
#[derive(Clone, Default)]
pub struct ChoreLocks {
    inner: Arc<Mutex<HashMap<ChoreId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ChoreLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the chore's lock. No timeout: a stuck lock is a bug.
    pub async fn acquire(&self, chore: &ChoreId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(chore.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry for a deleted chore
    ///
    /// The entry stays while any guard or waiter still holds it, so a
    /// chore re-created under the same id keeps contending on one lock.
    pub fn forget(&self, chore: &ChoreId) {
        let mut locks = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if locks.get(chore).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(chore);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
