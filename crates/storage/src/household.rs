// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The household: kids, chore definitions and per-kid status records

use std::collections::BTreeMap;

use chores_core::{ChoreDef, ChoreId, ChoreSnapshot, Kid, KidChoreStatus, KidId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::StorageError;

/// Status records for one chore, keyed by kid
pub type StatusMap = BTreeMap<KidId, KidChoreStatus>;

/// Everything the manager owns, as persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Household {
    #[serde(default)]
    pub kids: BTreeMap<KidId, Kid>,
    #[serde(default)]
    pub chores: BTreeMap<ChoreId, ChoreDef>,
    #[serde(default)]
    pub statuses: BTreeMap<ChoreId, StatusMap>,
}

/// Which status records an upsert created and retired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentChange {
    pub created: bool,
    pub added: Vec<KidId>,
    pub removed: Vec<KidId>,
}

impl Household {
    /// Display name for a kid, falling back to the id
    pub fn kid_name(&self, kid: &KidId) -> String {
        self.kids
            .get(kid)
            .map(|k| k.name.clone())
            .unwrap_or_else(|| kid.to_string())
    }

    /// Look up a chore by exact id or unique prefix
    pub fn resolve_chore_id(&self, id: &str) -> Result<ChoreId, StorageError> {
        resolve_prefix(&self.chores, id, "chore")
    }

    /// Look up a kid by exact id or unique prefix
    pub fn resolve_kid_id(&self, id: &str) -> Result<KidId, StorageError> {
        resolve_prefix(&self.kids, id, "kid")
    }

    pub fn chore(&self, id: &ChoreId) -> Result<&ChoreDef, StorageError> {
        self.chores.get(id).ok_or_else(|| StorageError::NotFound {
            kind: "chore",
            id: id.to_string(),
        })
    }

    pub fn chore_mut(&mut self, id: &ChoreId) -> Result<&mut ChoreDef, StorageError> {
        self.chores.get_mut(id).ok_or_else(|| StorageError::NotFound {
            kind: "chore",
            id: id.to_string(),
        })
    }

    pub fn status(&self, chore: &ChoreId, kid: &KidId) -> Option<&KidChoreStatus> {
        self.statuses.get(chore)?.get(kid)
    }

    pub fn status_mut(&mut self, chore: &ChoreId, kid: &KidId) -> Option<&mut KidChoreStatus> {
        self.statuses.get_mut(chore)?.get_mut(kid)
    }

    /// Read-only engine view of one chore
    pub fn snapshot(
        &self,
        chore: &ChoreId,
        now: DateTime<Utc>,
    ) -> Result<ChoreSnapshot<'_>, StorageError> {
        let def = self.chore(chore)?;
        let statuses = self.statuses.get(chore).ok_or_else(|| StorageError::NotFound {
            kind: "status",
            id: chore.to_string(),
        })?;
        Ok(ChoreSnapshot::new(def, statuses, now))
    }

    pub fn upsert_kid(&mut self, kid: Kid) -> bool {
        self.kids.insert(kid.id.clone(), kid).is_none()
    }

    /// Remove a kid, unassigning them everywhere
    ///
    /// Returns the chores the kid was assigned to. A rotation pointer
    /// that named the kid moves to the first remaining kid.
    pub fn remove_kid(&mut self, id: &KidId) -> Result<Vec<ChoreId>, StorageError> {
        if self.kids.remove(id).is_none() {
            return Err(StorageError::NotFound {
                kind: "kid",
                id: id.to_string(),
            });
        }

        let mut touched = Vec::new();
        for chore in self.chores.values_mut() {
            if !chore.is_assigned(id) {
                continue;
            }
            chore.assigned_kids.retain(|k| k != id);
            if chore.rotation_current_kid_id.as_ref() == Some(id) {
                chore.rotation_current_kid_id = chore.assigned_kids.first().cloned();
            }
            chore.normalize();
            if let Some(statuses) = self.statuses.get_mut(&chore.id) {
                statuses.remove(id);
            }
            touched.push(chore.id.clone());
        }
        Ok(touched)
    }

    /// Insert or replace a chore and bring its status records in line
    /// with the assignment list. New records start their period at `now`.
    pub fn upsert_chore(&mut self, mut chore: ChoreDef, now: DateTime<Utc>) -> AssignmentChange {
        chore.normalize();
        let created = !self.chores.contains_key(&chore.id);
        let statuses = self.statuses.entry(chore.id.clone()).or_default();

        let removed: Vec<KidId> = statuses
            .keys()
            .filter(|kid| !chore.is_assigned(kid))
            .cloned()
            .collect();
        for kid in &removed {
            statuses.remove(kid);
        }

        let mut added = Vec::new();
        for kid in &chore.assigned_kids {
            if !statuses.contains_key(kid) {
                statuses.insert(
                    kid.clone(),
                    KidChoreStatus::new(kid.clone(), chore.id.clone(), now),
                );
                added.push(kid.clone());
            }
        }

        self.chores.insert(chore.id.clone(), chore);
        AssignmentChange {
            created,
            added,
            removed,
        }
    }

    /// Delete a chore and retire its status records
    pub fn remove_chore(&mut self, id: &ChoreId) -> Result<ChoreDef, StorageError> {
        self.statuses.remove(id);
        self.chores.remove(id).ok_or_else(|| StorageError::NotFound {
            kind: "chore",
            id: id.to_string(),
        })
    }
}

fn resolve_prefix<K, V>(map: &BTreeMap<K, V>, id: &str, kind: &'static str) -> Result<K, StorageError>
where
    K: Ord + Clone + AsRef<str> + for<'a> From<&'a str>,
{
    let exact = K::from(id);
    if map.contains_key(&exact) {
        return Ok(exact);
    }

    let matches: Vec<&K> = map.keys().filter(|k| k.as_ref().starts_with(id)).collect();
    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(StorageError::NotFound {
            kind,
            id: id.to_string(),
        }),
        many => Err(StorageError::Ambiguous {
            kind,
            id: id.to_string(),
            count: many.len(),
        }),
    }
}

#[cfg(test)]
#[path = "household_tests.rs"]
mod tests;
