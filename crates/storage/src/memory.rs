// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store for tests and ephemeral runs

use std::sync::{Arc, Mutex};

use crate::{ChoreStore, Household, StorageError};

#[derive(Default)]
struct Inner {
    saved: Option<Household>,
    saves: usize,
}

/// Keeps the last saved snapshot and counts saves
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose first load returns `household`
    pub fn with(household: Household) -> Self {
        let store = Self::new();
        store.lock().saved = Some(household);
        store
    }

    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    pub fn last_saved(&self) -> Option<Household> {
        self.lock().saved.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChoreStore for MemoryStore {
    fn load(&self) -> Result<Household, StorageError> {
        Ok(self.lock().saved.clone().unwrap_or_default())
    }

    fn save(&self, household: &Household) -> Result<(), StorageError> {
        let mut inner = self.lock();
        inner.saved = Some(household.clone());
        inner.saves += 1;
        Ok(())
    }
}
