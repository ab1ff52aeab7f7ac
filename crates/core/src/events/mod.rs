// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event routing and the audit log
//!
//! - `EventBus` - fan events out to subscribers by name pattern
//! - `EventLog` - append-only JSONL record of everything published
//! - `EventPattern` - `*`, `chore_*` style name matching

mod bus;
mod log;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use log::{EventLog, EventRecord};
pub use subscription::{EventPattern, SubscriberId, Subscription};

#[cfg(test)]
mod tests;
