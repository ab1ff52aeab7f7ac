// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manager harness shared by the engine tests

use chores_adapters::{FakeNotifyAdapter, FakeStatsAdapter};
use chores_core::{
    ChoreDef, ChoreId, ChoreState, CompletionCriteria, FakeClock, Kid, KidChoreStatus, KidId,
};
use chores_storage::MemoryStore;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{Manager, ManagerConfig, ManagerDeps};

pub type TestManager = Manager<MemoryStore, FakeStatsAdapter, FakeNotifyAdapter, FakeClock>;

pub fn kid(id: &str) -> KidId {
    KidId::from(id)
}

pub fn chore(id: &str) -> ChoreId {
    ChoreId::from(id)
}

/// Monday 2026-06-01 12:00 UTC
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct Harness {
    pub manager: TestManager,
    pub store: MemoryStore,
    pub stats: FakeStatsAdapter,
    pub notify: FakeNotifyAdapter,
    pub clock: FakeClock,
}

impl Harness {
    /// A manager at noon with the given kids registered
    pub async fn new(kids: &[&str]) -> Self {
        let store = MemoryStore::new();
        let stats = FakeStatsAdapter::new();
        let notify = FakeNotifyAdapter::new();
        let clock = FakeClock::at(noon());
        let manager = Manager::new(
            ManagerDeps {
                store: store.clone(),
                stats: stats.clone(),
                notify: notify.clone(),
            },
            clock.clone(),
            ManagerConfig::default(),
        )
        .unwrap();

        for id in kids {
            manager
                .add_kid(Kid::new(*id, display_name(id)))
                .await
                .unwrap();
        }
        notify.clear();

        Self {
            manager,
            store,
            stats,
            notify,
            clock,
        }
    }

    /// Apply a chore named after its id, customized by `f`
    pub async fn chore(
        &self,
        id: &str,
        criteria: CompletionCriteria,
        kids: &[&str],
        f: impl FnOnce(&mut ChoreDef),
    ) -> ChoreId {
        let mut def = ChoreDef::new(id, display_name(id));
        def.criteria = criteria;
        def.assigned_kids = kids.iter().map(|k| kid(k)).collect();
        def.points = 10.0;
        f(&mut def);
        self.manager.apply_chore(def).await.unwrap();
        self.notify.clear();
        chore(id)
    }

    pub fn status(&self, chore_id: &ChoreId, kid_id: &str) -> KidChoreStatus {
        self.manager
            .household()
            .status(chore_id, &kid(kid_id))
            .cloned()
            .unwrap_or_else(|| panic!("no status for {kid_id}"))
    }

    /// Resolved display state
    pub fn state(&self, chore_id: &ChoreId, kid_id: &str) -> ChoreState {
        self.manager.kid_chore(&kid(kid_id), chore_id).unwrap().state
    }

    pub fn turn(&self, chore_id: &ChoreId) -> Option<KidId> {
        self.manager.household().chores[chore_id]
            .rotation_current_kid_id
            .clone()
    }

    pub fn due(&self, chore_id: &ChoreId) -> Option<DateTime<Utc>> {
        self.manager.household().chores[chore_id].due_date
    }

    pub fn advance(&self, by: Duration) {
        self.clock.set(self.clock_now() + by);
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        use chores_core::Clock;
        self.clock.now()
    }

    /// Event names emitted since the last call
    pub fn take_events(&self) -> Vec<&'static str> {
        let names = self.notify.names();
        self.notify.clear();
        names
    }
}
