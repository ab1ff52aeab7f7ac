// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chores-storage: the household data model and its persistence backends

mod household;
mod json;
mod memory;

pub use household::{AssignmentChange, Household, StatusMap};
pub use json::JsonStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("not found: {kind}/{id}")]
    NotFound { kind: &'static str, id: String },
    #[error("ambiguous {kind} id '{id}' matches {count} entries")]
    Ambiguous {
        kind: &'static str,
        id: String,
        count: usize,
    },
}

/// Persistence backend for a household snapshot
///
/// The manager owns the live [`Household`]; a store only loads it at
/// startup and saves whole snapshots.
pub trait ChoreStore: Send + Sync + 'static {
    fn load(&self) -> Result<Household, StorageError>;
    fn save(&self, household: &Household) -> Result<(), StorageError>;
}
