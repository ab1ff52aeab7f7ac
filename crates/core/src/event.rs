// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events published for collaborators (stats, notifications, audit log)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ChoreId, KidId};
use crate::state::StoredState;

/// The kid and chore an event is about, with display labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub kid_id: KidId,
    pub kid_name: String,
    pub chore_id: ChoreId,
    pub chore_name: String,
}

/// Lifecycle events
///
/// `update_stats` tells statistics and achievement listeners whether to
/// count the transition. Undo and scheduled resets never set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ChoreClaimed {
        subject: Subject,
        update_stats: bool,
        actor: String,
    },
    ChoreApproved {
        subject: Subject,
        update_stats: bool,
        approver: String,
        points: f64,
        previous_state: StoredState,
    },
    ChoreDisapproved {
        subject: Subject,
        update_stats: bool,
        approver: String,
        reason: Option<String>,
        previous_state: StoredState,
    },
    ChoreUndone {
        subject: Subject,
        update_stats: bool,
        previous_state: StoredState,
    },
    ChoreOverdue {
        subject: Subject,
        update_stats: bool,
        due_date: Option<DateTime<Utc>>,
    },
    ChoreMissed {
        subject: Subject,
        update_stats: bool,
        due_date: Option<DateTime<Utc>>,
    },
    ChoreReset {
        subject: Subject,
        update_stats: bool,
        previous_state: StoredState,
    },
    ChoreDueWindow {
        subject: Subject,
        update_stats: bool,
        due_date: DateTime<Utc>,
    },
    ChoreDueReminder {
        subject: Subject,
        update_stats: bool,
        due_date: DateTime<Utc>,
    },
    ChoreDueDateChanged {
        subject: Subject,
        update_stats: bool,
        due_date: Option<DateTime<Utc>>,
    },
    RotationAdvanced {
        chore_id: ChoreId,
        chore_name: String,
        update_stats: bool,
        previous_kid_id: Option<KidId>,
        next_kid_id: KidId,
        next_kid_name: String,
    },
    RotationCycleOpened {
        chore_id: ChoreId,
        chore_name: String,
        update_stats: bool,
    },
}

impl Event {
    /// Event name used for routing and the audit log
    pub fn name(&self) -> &'static str {
        match self {
            Event::ChoreClaimed { .. } => "chore_claimed",
            Event::ChoreApproved { .. } => "chore_approved",
            Event::ChoreDisapproved { .. } => "chore_disapproved",
            Event::ChoreUndone { .. } => "chore_undone",
            Event::ChoreOverdue { .. } => "chore_overdue",
            Event::ChoreMissed { .. } => "chore_missed",
            Event::ChoreReset { .. } => "chore_reset",
            Event::ChoreDueWindow { .. } => "chore_due_window",
            Event::ChoreDueReminder { .. } => "chore_due_reminder",
            Event::ChoreDueDateChanged { .. } => "chore_due_date_changed",
            Event::RotationAdvanced { .. } => "rotation_advanced",
            Event::RotationCycleOpened { .. } => "rotation_cycle_opened",
        }
    }

    pub fn subject(&self) -> Option<&Subject> {
        match self {
            Event::ChoreClaimed { subject, .. }
            | Event::ChoreApproved { subject, .. }
            | Event::ChoreDisapproved { subject, .. }
            | Event::ChoreUndone { subject, .. }
            | Event::ChoreOverdue { subject, .. }
            | Event::ChoreMissed { subject, .. }
            | Event::ChoreReset { subject, .. }
            | Event::ChoreDueWindow { subject, .. }
            | Event::ChoreDueReminder { subject, .. }
            | Event::ChoreDueDateChanged { subject, .. } => Some(subject),
            Event::RotationAdvanced { .. } | Event::RotationCycleOpened { .. } => None,
        }
    }

    pub fn chore_id(&self) -> &ChoreId {
        match self {
            Event::RotationAdvanced { chore_id, .. }
            | Event::RotationCycleOpened { chore_id, .. } => chore_id,
            Event::ChoreClaimed { subject, .. }
            | Event::ChoreApproved { subject, .. }
            | Event::ChoreDisapproved { subject, .. }
            | Event::ChoreUndone { subject, .. }
            | Event::ChoreOverdue { subject, .. }
            | Event::ChoreMissed { subject, .. }
            | Event::ChoreReset { subject, .. }
            | Event::ChoreDueWindow { subject, .. }
            | Event::ChoreDueReminder { subject, .. }
            | Event::ChoreDueDateChanged { subject, .. } => &subject.chore_id,
        }
    }

    pub fn kid_id(&self) -> Option<&KidId> {
        match self {
            Event::RotationAdvanced { next_kid_id, .. } => Some(next_kid_id),
            _ => self.subject().map(|s| &s.kid_id),
        }
    }

    pub fn update_stats(&self) -> bool {
        match self {
            Event::ChoreClaimed { update_stats, .. }
            | Event::ChoreApproved { update_stats, .. }
            | Event::ChoreDisapproved { update_stats, .. }
            | Event::ChoreUndone { update_stats, .. }
            | Event::ChoreOverdue { update_stats, .. }
            | Event::ChoreMissed { update_stats, .. }
            | Event::ChoreReset { update_stats, .. }
            | Event::ChoreDueWindow { update_stats, .. }
            | Event::ChoreDueReminder { update_stats, .. }
            | Event::ChoreDueDateChanged { update_stats, .. }
            | Event::RotationAdvanced { update_stats, .. }
            | Event::RotationCycleOpened { update_stats, .. } => *update_stats,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
