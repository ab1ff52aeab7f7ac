// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Collaborator adapters: statistics and notification delivery

pub mod notify;
pub mod stats;
pub mod traced;

pub use notify::{BusNotifyAdapter, NoOpNotifyAdapter, NotifyAdapter, NotifyError};
pub use stats::{MemoryStatsAdapter, NoOpStatsAdapter, StatsAdapter, StatsError};
pub use traced::{TracedNotifyAdapter, TracedStatsAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use stats::{FakeStatsAdapter, StatsCall};
