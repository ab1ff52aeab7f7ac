// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publishes events onto an in-process [`EventBus`]

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;
use chores_core::{Event, EventBus};

#[derive(Clone, Default)]
pub struct BusNotifyAdapter {
    bus: EventBus,
}

impl BusNotifyAdapter {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
}

#[async_trait]
impl NotifyAdapter for BusNotifyAdapter {
    async fn notify(&self, event: &Event) -> Result<(), NotifyError> {
        let delivered = self.bus.publish(event);
        tracing::trace!(event = event.name(), delivered, "published");
        Ok(())
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
