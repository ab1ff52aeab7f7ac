// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion criteria and the capability predicates derived from them
//!
//! Call sites never compare criteria values directly. They ask a
//! [`Capabilities`] value, computed once per chore snapshot, so adding a
//! criteria variant only touches [`CompletionCriteria::capabilities`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// How multiple assigned kids interact on one chore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionCriteria {
    /// Every kid completes their own copy
    #[default]
    Independent,
    /// Every kid must complete; the chore is done when all are
    Shared,
    /// First kid to claim owns the chore for the period
    SharedFirst,
    /// One turn-holder at a time, advancing in list order
    RotationSimple,
    /// Like simple rotation, but anyone may claim once the due date passes
    RotationSteal,
    /// Turn goes to the kid with the fewest lifetime approvals
    RotationSmart,
}

/// Behaviour flags derived from [`CompletionCriteria`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Only one kid may hold the claim/approval for a period
    pub single_claimer: bool,
    /// A turn pointer gates who may claim
    pub rotation: bool,
    /// Non-holders may claim after the due date passes
    pub steal_after_due: bool,
    /// Next turn is chosen by approval counts instead of list order
    pub smart_turns: bool,
    /// Scheduled resets cover every assigned kid, not just the actor
    pub reset_all_kids: bool,
    /// Due dates are tracked per kid
    pub per_kid_due_dates: bool,
}

impl CompletionCriteria {
    pub fn capabilities(self) -> Capabilities {
        let rotation = self.is_rotation();
        Capabilities {
            single_claimer: self.is_single_claimer(),
            rotation,
            steal_after_due: self == Self::RotationSteal,
            smart_turns: self == Self::RotationSmart,
            reset_all_kids: self == Self::Shared,
            per_kid_due_dates: self == Self::Independent,
        }
    }

    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            Self::RotationSimple | Self::RotationSteal | Self::RotationSmart
        )
    }

    pub fn is_single_claimer(self) -> bool {
        self == Self::SharedFirst || self.is_rotation()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Independent => "independent",
            Self::Shared => "shared",
            Self::SharedFirst => "shared_first",
            Self::RotationSimple => "rotation_simple",
            Self::RotationSteal => "rotation_steal",
            Self::RotationSmart => "rotation_smart",
        }
    }
}

impl fmt::Display for CompletionCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
