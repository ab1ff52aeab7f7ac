// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chores-engine: the chore manager
//!
//! Owns the household, serializes actions per chore, runs the scan
//! pipeline, and hands effects to the store and collaborators.

mod actions;
mod apply;
mod error;
mod executor;
mod locks;
mod manager;
mod query;
pub mod scan;
mod scheduler;
mod tick;

pub use actions::AUTO_APPROVER;
pub use error::ManagerError;
pub use executor::{ExecuteError, Executor};
pub use locks::ChoreLocks;
pub use manager::{Manager, ManagerConfig, ManagerDeps, ManifestSummary};
pub use query::{ChoreView, KidChoreView};
pub use scheduler::next_deadline;
pub use tick::TickReport;

#[cfg(test)]
pub(crate) mod test_support;
