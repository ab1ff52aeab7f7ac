// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus and log working together, plus event builders for the submodule tests

use super::*;
use crate::event::{Event, Subject};
use crate::id::{ChoreId, KidId};
use crate::state::StoredState;
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn subject(kid: &str, chore: &str) -> Subject {
    Subject {
        kid_id: KidId::from(kid),
        kid_name: kid.to_uppercase(),
        chore_id: ChoreId::from(chore),
        chore_name: chore.to_string(),
    }
}

pub(crate) fn claimed(kid: &str, chore: &str) -> Event {
    Event::ChoreClaimed {
        subject: subject(kid, chore),
        update_stats: true,
        actor: kid.to_string(),
    }
}

pub(crate) fn approved(kid: &str, chore: &str) -> Event {
    Event::ChoreApproved {
        subject: subject(kid, chore),
        update_stats: true,
        approver: "parent".to_string(),
        points: 5.0,
        previous_state: StoredState::Claimed,
    }
}

pub(crate) fn rotation_advanced(chore: &str, next: &str) -> Event {
    Event::RotationAdvanced {
        chore_id: ChoreId::from(chore),
        chore_name: chore.to_string(),
        update_stats: false,
        previous_kid_id: None,
        next_kid_id: KidId::from(next),
        next_kid_name: next.to_uppercase(),
    }
}

#[tokio::test]
async fn global_handler_feeds_the_log() {
    let tmp = TempDir::new().unwrap();
    let mut log = EventLog::open(tmp.path().join("events.jsonl")).unwrap();
    let bus = EventBus::new();
    let mut global = bus.set_global_handler();

    let rotation = Subscription::new("rotation", vec![EventPattern::new("rotation_*")], "turns");
    let mut rotation_rx = bus.subscribe(rotation);

    bus.publish(&claimed("ada", "trash"));
    bus.publish(&approved("ada", "trash"));
    bus.publish(&rotation_advanced("trash", "bo"));

    let now = Utc.with_ymd_and_hms(2026, 4, 1, 18, 0, 0).unwrap();
    while let Ok(event) = global.try_recv() {
        log.append(event, now).unwrap();
    }

    assert_eq!(log.current_sequence(), 3);
    assert!(rotation_rx.try_recv().is_ok());
    assert!(rotation_rx.try_recv().is_err());

    let names: Vec<String> = log.read_all().unwrap().into_iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["chore_claimed", "chore_approved", "rotation_advanced"]);
}
