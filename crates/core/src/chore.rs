// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore definitions and the policies that shape their lifecycle

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::criteria::{Capabilities, CompletionCriteria};
use crate::id::{ChoreId, KidId};

/// How often a chore's due date recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    None,
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Custom { days: u32 },
}

impl Frequency {
    pub fn is_recurring(self) -> bool {
        self != Self::None
    }
}

/// When an approved chore returns to pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalReset {
    #[default]
    AtMidnightOnce,
    AtMidnightMulti,
    AtDueDateOnce,
    AtDueDateMulti,
    UponCompletion,
}

impl ApprovalReset {
    pub fn is_midnight(self) -> bool {
        matches!(self, Self::AtMidnightOnce | Self::AtMidnightMulti)
    }

    pub fn is_due_date(self) -> bool {
        matches!(self, Self::AtDueDateOnce | Self::AtDueDateMulti)
    }

    /// Kids may complete the chore more than once per period
    pub fn allows_multiple(self) -> bool {
        matches!(
            self,
            Self::AtMidnightMulti | Self::AtDueDateMulti | Self::UponCompletion
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AtMidnightOnce => "at_midnight_once",
            Self::AtMidnightMulti => "at_midnight_multi",
            Self::AtDueDateOnce => "at_due_date_once",
            Self::AtDueDateMulti => "at_due_date_multi",
            Self::UponCompletion => "upon_completion",
        }
    }
}

/// What happens once a chore's due date passes without approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdueHandling {
    /// Overdue until completed
    #[default]
    AtDueDate,
    /// Never shown or marked overdue
    NeverOverdue,
    /// Overdue until the next approval-reset boundary clears it
    AtDueDateClearAtApprovalReset,
    /// Overdue; a late approval resets the chore immediately
    AtDueDateClearImmediateOnLate,
    /// Locked as missed until the next midnight reset
    MarkMissedAndLock,
}

impl OverdueHandling {
    pub fn is_lock(self) -> bool {
        self == Self::MarkMissedAndLock
    }

    /// Marks (and displays) the chore overdue once the due date passes
    pub fn marks_overdue(self) -> bool {
        !matches!(self, Self::NeverOverdue | Self::MarkMissedAndLock)
    }
}

/// What a scheduled reset does to a kid still holding an unapproved claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingClaimAction {
    /// Leave the claim in place for the parent to review
    Hold,
    /// Drop the claim with the rest of the period
    #[default]
    Clear,
}

/// A chore definition as configured by a parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreDef {
    pub id: ChoreId,
    pub name: String,
    #[serde(default)]
    pub assigned_kids: Vec<KidId>,
    #[serde(default)]
    pub criteria: CompletionCriteria,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub approval_reset: ApprovalReset,
    #[serde(default)]
    pub overdue_handling: OverdueHandling,
    #[serde(default)]
    pub pending_claim_action: PendingClaimAction,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub auto_approve: bool,
    /// Refuse claims before the due window opens
    #[serde(default)]
    pub claim_restriction: bool,
    /// How long before the due date the due window opens
    #[serde(default, with = "humantime_serde")]
    pub due_window: Option<Duration>,
    /// How long before the due date the reminder fires
    #[serde(default, with = "humantime_serde")]
    pub reminder_lead: Option<Duration>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Per-kid due dates for independent chores
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kid_due_dates: BTreeMap<KidId, DateTime<Utc>>,
    #[serde(default)]
    pub rotation_current_kid_id: Option<KidId>,
    /// Lets any assigned kid claim for the current cycle
    #[serde(default)]
    pub rotation_cycle_override: bool,
}

/// Chore configuration errors, rejected before anything reaches the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("chore {0} has an empty name")]
    EmptyName(ChoreId),

    #[error("chore {0} has no assigned kids")]
    NoAssignedKids(ChoreId),

    #[error("chore {chore} assigns {kid} more than once")]
    DuplicateKid { chore: ChoreId, kid: KidId },

    #[error("rotation chore {chore} needs at least 2 kids, has {count}")]
    RotationNeedsTwoKids { chore: ChoreId, count: usize },

    #[error("rotation_steal chore {0} needs a due date")]
    StealNeedsDueDate(ChoreId),

    #[error("chore {chore} uses mark_missed_and_lock, which needs a midnight reset (got {reset})")]
    LockNeedsMidnightReset { chore: ChoreId, reset: &'static str },

    #[error("chore {chore} awards invalid points: {points}")]
    InvalidPoints { chore: ChoreId, points: f64 },

    #[error("chore {0} has a custom frequency of zero days")]
    ZeroCustomInterval(ChoreId),

    #[error("chore {chore} turn holder {kid} is not assigned")]
    TurnHolderNotAssigned { chore: ChoreId, kid: KidId },

    #[error("kid {0} is not registered")]
    UnknownKid(KidId),
}

impl ChoreDef {
    /// A minimal independent chore, used as a builder base
    pub fn new(id: impl Into<ChoreId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            assigned_kids: Vec::new(),
            criteria: CompletionCriteria::default(),
            frequency: Frequency::default(),
            approval_reset: ApprovalReset::default(),
            overdue_handling: OverdueHandling::default(),
            pending_claim_action: PendingClaimAction::default(),
            points: 0.0,
            auto_approve: false,
            claim_restriction: false,
            due_window: None,
            reminder_lead: None,
            due_date: None,
            kid_due_dates: BTreeMap::new(),
            rotation_current_kid_id: None,
            rotation_cycle_override: false,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.criteria.capabilities()
    }

    pub fn is_assigned(&self, kid: &KidId) -> bool {
        self.assigned_kids.contains(kid)
    }

    pub fn allows_multiple_claims(&self) -> bool {
        self.approval_reset.allows_multiple()
    }

    /// The due date that applies to a kid
    pub fn due_date_for(&self, kid: &KidId) -> Option<DateTime<Utc>> {
        if self.capabilities().per_kid_due_dates {
            self.kid_due_dates.get(kid).copied().or(self.due_date)
        } else {
            self.due_date
        }
    }

    /// Instant the kid's due window opens
    pub fn window_start_for(&self, kid: &KidId) -> Option<DateTime<Utc>> {
        offset_before(self.due_date_for(kid)?, self.due_window?)
    }

    /// Instant the kid's due reminder fires
    pub fn reminder_at_for(&self, kid: &KidId) -> Option<DateTime<Utc>> {
        offset_before(self.due_date_for(kid)?, self.reminder_lead?)
    }

    pub fn is_past_due(&self, kid: &KidId, now: DateTime<Utc>) -> bool {
        self.due_date_for(kid).is_some_and(|due| now > due)
    }

    /// Set (or clear) a due date, per kid when the chore tracks them
    pub fn set_due_date(&mut self, kid: Option<&KidId>, date: Option<DateTime<Utc>>) {
        if !self.capabilities().per_kid_due_dates {
            self.due_date = date;
            return;
        }
        match (kid, date) {
            (Some(kid), Some(date)) => {
                self.kid_due_dates.insert(kid.clone(), date);
            }
            (Some(kid), None) => {
                self.kid_due_dates.remove(kid);
            }
            (None, _) => {
                self.due_date = date;
                self.kid_due_dates.clear();
                self.fill_kid_due_dates();
            }
        }
    }

    /// Bring derived fields in line with the assignment list
    ///
    /// Independent chores get a per-kid due date for every assigned kid,
    /// seeded from the chore-level date. Other criteria carry none.
    pub fn normalize(&mut self) {
        if self.capabilities().per_kid_due_dates {
            let assigned: BTreeSet<&KidId> = self.assigned_kids.iter().collect();
            self.kid_due_dates.retain(|kid, _| assigned.contains(kid));
            self.fill_kid_due_dates();
        } else {
            self.kid_due_dates.clear();
        }
    }

    fn fill_kid_due_dates(&mut self) {
        let Some(due) = self.due_date else {
            return;
        };
        for kid in &self.assigned_kids {
            self.kid_due_dates.entry(kid.clone()).or_insert(due);
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName(self.id.clone()));
        }
        if self.assigned_kids.is_empty() {
            return Err(ValidationError::NoAssignedKids(self.id.clone()));
        }

        let mut seen = BTreeSet::new();
        for kid in &self.assigned_kids {
            if !seen.insert(kid) {
                return Err(ValidationError::DuplicateKid {
                    chore: self.id.clone(),
                    kid: kid.clone(),
                });
            }
        }

        let caps = self.capabilities();
        if caps.rotation && self.assigned_kids.len() < 2 {
            return Err(ValidationError::RotationNeedsTwoKids {
                chore: self.id.clone(),
                count: self.assigned_kids.len(),
            });
        }
        if caps.steal_after_due && self.due_date.is_none() {
            return Err(ValidationError::StealNeedsDueDate(self.id.clone()));
        }
        if self.overdue_handling.is_lock() && !self.approval_reset.is_midnight() {
            return Err(ValidationError::LockNeedsMidnightReset {
                chore: self.id.clone(),
                reset: self.approval_reset.as_str(),
            });
        }
        if !self.points.is_finite() || self.points < 0.0 {
            return Err(ValidationError::InvalidPoints {
                chore: self.id.clone(),
                points: self.points,
            });
        }
        if self.frequency == (Frequency::Custom { days: 0 }) {
            return Err(ValidationError::ZeroCustomInterval(self.id.clone()));
        }
        if let Some(kid) = &self.rotation_current_kid_id {
            if caps.rotation && !self.is_assigned(kid) {
                return Err(ValidationError::TurnHolderNotAssigned {
                    chore: self.id.clone(),
                    kid: kid.clone(),
                });
            }
        }
        Ok(())
    }
}

fn offset_before(due: DateTime<Utc>, lead: Duration) -> Option<DateTime<Utc>> {
    let lead = chrono::Duration::from_std(lead).ok()?;
    due.checked_sub_signed(lead)
}

#[cfg(test)]
#[path = "chore_tests.rs"]
mod tests;
