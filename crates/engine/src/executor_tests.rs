// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chores_adapters::{FakeNotifyAdapter, FakeStatsAdapter};
use chores_core::{ChoreId, Event, KidId, StatKind, StatsRecord, StoredState, Subject};
use chores_storage::MemoryStore;
use chrono::Utc;

struct Harness {
    store: MemoryStore,
    stats: FakeStatsAdapter,
    notify: FakeNotifyAdapter,
    executor: Executor<MemoryStore, FakeStatsAdapter, FakeNotifyAdapter>,
}

fn harness() -> Harness {
    let store = MemoryStore::new();
    let stats = FakeStatsAdapter::new();
    let notify = FakeNotifyAdapter::new();
    let executor = Executor::new(
        Arc::new(store.clone()),
        stats.clone(),
        notify.clone(),
        Arc::new(Mutex::new(Household::default())),
    );
    Harness {
        store,
        stats,
        notify,
        executor,
    }
}

fn reset_event() -> Event {
    Event::ChoreReset {
        subject: Subject {
            kid_id: KidId::from("ada"),
            kid_name: "Ada".to_string(),
            chore_id: ChoreId::from("dishes"),
            chore_name: "Dishes".to_string(),
        },
        update_stats: false,
        previous_state: StoredState::Approved,
    }
}

fn approved_record() -> StatsRecord {
    StatsRecord {
        kid_id: KidId::from("ada"),
        chore_id: ChoreId::from("dishes"),
        kind: StatKind::Approved,
        points: 5.0,
        at: Utc::now(),
    }
}

#[tokio::test]
async fn persist_saves_a_snapshot() {
    let h = harness();
    h.executor.execute(Effect::Persist).await.unwrap();
    assert_eq!(h.store.save_count(), 1);
}

#[tokio::test]
async fn effects_reach_their_collaborators() {
    let h = harness();
    h.executor
        .execute_all(vec![
            Effect::Persist,
            Effect::RecordStats(approved_record()),
            Effect::Emit(reset_event()),
        ])
        .await
        .unwrap();

    assert_eq!(h.store.save_count(), 1);
    assert_eq!(h.stats.records().len(), 1);
    assert_eq!(h.notify.names(), vec!["chore_reset"]);
}

#[tokio::test]
async fn stats_failure_does_not_stop_the_batch() {
    let h = harness();
    h.stats.set_failing(true);

    h.executor
        .execute_all(vec![
            Effect::RecordStats(approved_record()),
            Effect::Emit(reset_event()),
        ])
        .await
        .unwrap();

    assert_eq!(h.notify.names(), vec!["chore_reset"]);
}

#[tokio::test]
async fn single_failure_is_reported() {
    let h = harness();
    h.stats.set_failing(true);
    let result = h.executor.execute(Effect::RecordStats(approved_record())).await;
    assert!(matches!(result, Err(ExecuteError::Stats(_))));
}
