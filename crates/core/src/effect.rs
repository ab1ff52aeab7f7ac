// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions, transition plans and the side effects the manager executes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::id::{ChoreId, KidId};
use crate::state::StoredState;
use crate::stats::StatKind;

/// A lifecycle action requested against one kid's assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Claim { claimant: String },
    Approve { completer: String, points: f64 },
    Disapprove,
    Undo,
    Reset,
    Overdue,
    Miss,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Claim { .. } => ActionKind::Claim,
            Action::Approve { .. } => ActionKind::Approve,
            Action::Disapprove => ActionKind::Disapprove,
            Action::Undo => ActionKind::Undo,
            Action::Reset => ActionKind::Reset,
            Action::Overdue => ActionKind::Overdue,
            Action::Miss => ActionKind::Miss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Claim,
    Approve,
    Disapprove,
    Undo,
    Reset,
    Overdue,
    Miss,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Approve => "approve",
            Self::Disapprove => "disapprove",
            Self::Undo => "undo",
            Self::Reset => "reset",
            Self::Overdue => "overdue",
            Self::Miss => "miss",
        }
    }

    /// Statistics bucket this action feeds, if any
    pub fn stat_kind(self) -> Option<StatKind> {
        match self {
            Self::Claim => Some(StatKind::Claimed),
            Self::Approve => Some(StatKind::Approved),
            Self::Disapprove => Some(StatKind::Disapproved),
            Self::Overdue => Some(StatKind::Overdue),
            Self::Miss => Some(StatKind::Missed),
            Self::Undo | Self::Reset => None,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation of an optional field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldChange<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T: Clone> FieldChange<T> {
    pub fn apply(&self, field: &mut Option<T>) {
        match self {
            FieldChange::Keep => {}
            FieldChange::Set(value) => *field = Some(value.clone()),
            FieldChange::Clear => *field = None,
        }
    }
}

/// One kid's planned transition, produced by the engine and applied by
/// the manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEffect {
    pub kid_id: KidId,
    pub action: ActionKind,
    pub previous_state: StoredState,
    pub new_state: StoredState,
    pub update_stats: bool,
    pub points: f64,
    pub claimed_by: FieldChange<String>,
    pub completed_by: FieldChange<String>,
}

/// A statistics update handed to the stats collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub kid_id: KidId,
    pub chore_id: ChoreId,
    pub kind: StatKind,
    pub points: f64,
    pub at: DateTime<Utc>,
}

/// Side effects run after the chore lock is released
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write the store to durable storage
    Persist,
    /// Forward a statistics update
    RecordStats(StatsRecord),
    /// Publish an event to listeners
    Emit(Event),
}

impl Effect {
    /// Effect name for tracing spans
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Persist => "persist",
            Effect::RecordStats(_) => "record_stats",
            Effect::Emit(_) => "emit",
        }
    }

    /// Key-value pairs describing this effect for logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Persist => vec![],
            Effect::RecordStats(record) => vec![
                ("kid_id", record.kid_id.to_string()),
                ("chore_id", record.chore_id.to_string()),
                ("kind", format!("{:?}", record.kind)),
            ],
            Effect::Emit(event) => vec![("event", event.name().to_string())],
        }
    }
}
