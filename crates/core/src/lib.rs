// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chores-core: chore lifecycle types and pure computation
//!
//! This crate provides:
//! - Chore definitions, per-kid status records and period statistics
//! - The chore engine: transition table, effect planning, display-state
//!   resolution and eligibility
//! - The rotation resolver
//! - Schedule math (day boundaries, recurrence, approval boundaries)
//! - Events, the event bus and the audit log

pub mod clock;
pub mod id;

pub mod chore;
pub mod criteria;
pub mod household;
pub mod schedule;
pub mod state;
pub mod stats;
pub mod status;

pub mod effect;
pub mod engine;
pub mod event;
pub mod events;
pub mod rotation;

pub use chore::{
    ApprovalReset, ChoreDef, Frequency, OverdueHandling, PendingClaimAction, ValidationError,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use criteria::{Capabilities, CompletionCriteria};
pub use effect::{Action, ActionKind, Effect, FieldChange, StatsRecord, TransitionEffect};
pub use engine::ChoreSnapshot;
pub use event::{Event, Subject};
pub use events::{EventBus, EventLog, EventPattern, EventRecord, Subscription};
pub use household::{parse_manifest, HouseholdManifest, Kid, ManifestError};
pub use id::{ChoreId, KidId};
pub use rotation::{ApprovalSummary, RotationDelta};
pub use state::{BlockReason, ChoreState, Eligibility, StoredState};
pub use stats::{Counters, PeriodStats, StatKind};
pub use status::KidChoreStatus;
