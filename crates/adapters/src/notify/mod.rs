// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification adapters
//!
//! The manager hands every emitted event to a notify adapter after the
//! chore lock is released. Delivery policy lives behind the adapter.

mod bus;
mod noop;

pub use bus::BusNotifyAdapter;
pub use noop::NoOpNotifyAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

use async_trait::async_trait;
use chores_core::Event;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel closed")]
    Closed,
    #[error("delivery failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    async fn notify(&self, event: &Event) -> Result<(), NotifyError>;
}
