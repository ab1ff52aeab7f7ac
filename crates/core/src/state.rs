// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stored states, resolved display states and block reasons

use serde::{Deserialize, Serialize};
use std::fmt;

/// The persisted lifecycle state of one (kid, chore) assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredState {
    #[default]
    Pending,
    Claimed,
    Approved,
    Overdue,
    Missed,
}

impl StoredState {
    pub fn as_str(self) -> &'static str {
        ChoreState::from(self).as_str()
    }
}

impl fmt::Display for StoredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state as shown to users, derived on demand and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreState {
    Pending,
    Claimed,
    Approved,
    Overdue,
    Missed,
    Due,
    Waiting,
    NotMyTurn,
    ClaimedInPart,
    ApprovedInPart,
    Independent,
    Unknown,
}

impl ChoreState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Approved => "approved",
            Self::Overdue => "overdue",
            Self::Missed => "missed",
            Self::Due => "due",
            Self::Waiting => "waiting",
            Self::NotMyTurn => "not_my_turn",
            Self::ClaimedInPart => "claimed_in_part",
            Self::ApprovedInPart => "approved_in_part",
            Self::Independent => "independent",
            Self::Unknown => "unknown",
        }
    }
}

impl From<StoredState> for ChoreState {
    fn from(state: StoredState) -> Self {
        match state {
            StoredState::Pending => Self::Pending,
            StoredState::Claimed => Self::Claimed,
            StoredState::Approved => Self::Approved,
            StoredState::Overdue => Self::Overdue,
            StoredState::Missed => Self::Missed,
        }
    }
}

impl fmt::Display for ChoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason an action is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Missed,
    Waiting,
    NotMyTurn,
    AlreadyClaimed,
    AlreadyApproved,
    ClaimedByOther,
    CompletedByOther,
    NoPendingClaim,
    NotAssigned,
    InvalidTransition,
}

impl BlockReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missed => "missed",
            Self::Waiting => "waiting",
            Self::NotMyTurn => "not_my_turn",
            Self::AlreadyClaimed => "already_claimed",
            Self::AlreadyApproved => "already_approved",
            Self::ClaimedByOther => "claimed_by_other",
            Self::CompletedByOther => "completed_by_other",
            Self::NoPendingClaim => "no_pending_claim",
            Self::NotAssigned => "not_assigned",
            Self::InvalidTransition => "invalid_transition",
        }
    }

    /// Reasons a kid sees as a lock on the chore rather than a conflict
    pub fn is_lock(self) -> bool {
        matches!(self, Self::Missed | Self::Waiting | Self::NotMyTurn)
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Blocked(BlockReason),
}

impl Eligibility {
    pub fn is_eligible(self) -> bool {
        self == Self::Eligible
    }

    pub fn reason(self) -> Option<BlockReason> {
        match self {
            Self::Eligible => None,
            Self::Blocked(reason) => Some(reason),
        }
    }
}
