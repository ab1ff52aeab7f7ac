// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the chore manager

use crate::ExecuteError;
use chores_core::{BlockReason, ChoreId, ValidationError};
use chores_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by manager operations
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("cannot {action}: {reason}")]
    Rejected {
        action: &'static str,
        reason: BlockReason,
    },
    #[error("chore {0} is not a rotation chore")]
    NotRotation(ChoreId),
    #[error("invalid chore: {0}")]
    Invalid(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
}

impl ManagerError {
    pub(crate) fn rejected(action: &'static str, reason: BlockReason) -> Self {
        Self::Rejected { action, reason }
    }

    /// Machine-readable reason for a rejected action
    pub fn reason(&self) -> Option<BlockReason> {
        match self {
            Self::Rejected { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
