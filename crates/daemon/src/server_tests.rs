// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::lifecycle;
use crate::paths::Paths;
use chores_core::{BlockReason, ChoreDef, ChoreState, CompletionCriteria, Kid};
use tempfile::TempDir;

async fn daemon() -> (TempDir, DaemonState) {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Paths::for_state_dir(&dir.path().join("state"));
    paths.socket_path = dir.path().join("d.sock");
    let daemon = lifecycle::startup(&paths).await.unwrap();
    (dir, daemon)
}

async fn household(daemon: &mut DaemonState, criteria: CompletionCriteria) {
    for (id, name) in [("ada", "Ada"), ("bo", "Bo")] {
        let response = handle_request(daemon, Request::AddKid { kid: Kid::new(id, name) }).await;
        assert_eq!(response, Response::KidAdded { created: true });
    }
    let mut chore = ChoreDef::new("dishes", "Dishes");
    chore.assigned_kids = vec!["ada".into(), "bo".into()];
    chore.criteria = criteria;
    chore.points = 5.0;
    let response = handle_request(daemon, Request::ApplyChore { chore: Box::new(chore) }).await;
    assert!(matches!(response, Response::ChoreApplied { created: true, .. }));
}

fn claim(kid: &str) -> Request {
    Request::Claim {
        kid: kid.to_string(),
        chore: "dish".to_string(),
        actor: None,
    }
}

#[tokio::test]
async fn ping_and_hello() {
    let (_dir, mut daemon) = daemon().await;
    assert_eq!(handle_request(&mut daemon, Request::Ping).await, Response::Pong);
    assert_eq!(
        handle_request(
            &mut daemon,
            Request::Hello {
                version: "0.0.0".to_string()
            }
        )
        .await,
        Response::Hello {
            version: PROTOCOL_VERSION.to_string()
        }
    );
}

#[tokio::test]
async fn actions_answer_with_their_events() {
    let (_dir, mut daemon) = daemon().await;
    household(&mut daemon, CompletionCriteria::Independent).await;

    let Response::Events { events } = handle_request(&mut daemon, claim("ad")).await else {
        panic!("expected events");
    };
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "chore_claimed");

    let response = handle_request(
        &mut daemon,
        Request::Approve {
            kid: "ada".to_string(),
            chore: "dishes".to_string(),
            approver: "mom".to_string(),
            points: None,
        },
    )
    .await;
    assert!(matches!(response, Response::Events { .. }));

    let response = handle_request(
        &mut daemon,
        Request::Query {
            query: Query::KidChore {
                kid: "ada".to_string(),
                chore: "dishes".to_string(),
            },
        },
    )
    .await;
    let Response::KidChore { chore } = response else {
        panic!("expected kid chore, got {:?}", response);
    };
    assert_eq!(chore.state, ChoreState::Approved);
    assert_eq!(chore.stats.all_time.points, 5.0);
}

#[tokio::test]
async fn blocked_actions_are_rejected_with_a_reason() {
    let (_dir, mut daemon) = daemon().await;
    household(&mut daemon, CompletionCriteria::SharedFirst).await;

    handle_request(&mut daemon, claim("ada")).await;
    let response = handle_request(&mut daemon, claim("bo")).await;

    match response {
        Response::Rejected { action, reason, .. } => {
            assert_eq!(action, "claim");
            assert_eq!(reason, BlockReason::ClaimedByOther);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_ids_are_errors() {
    let (_dir, mut daemon) = daemon().await;
    household(&mut daemon, CompletionCriteria::Independent).await;

    let response = handle_request(&mut daemon, claim("zed")).await;
    assert!(matches!(response, Response::Error { .. }), "{:?}", response);
}

#[tokio::test]
async fn rotation_requests_need_a_rotation_chore() {
    let (_dir, mut daemon) = daemon().await;
    household(&mut daemon, CompletionCriteria::Independent).await;

    let response = handle_request(
        &mut daemon,
        Request::ResetRotation {
            chore: "dishes".to_string(),
        },
    )
    .await;
    let Response::Error { message } = response else {
        panic!("expected error");
    };
    assert!(message.contains("not a rotation chore"), "{}", message);
}

#[tokio::test]
async fn emitted_events_land_in_the_audit_log() {
    let (_dir, mut daemon) = daemon().await;
    household(&mut daemon, CompletionCriteria::Independent).await;
    handle_request(&mut daemon, claim("ada")).await;
    handle_request(&mut daemon, claim("bo")).await;

    let response = handle_request(
        &mut daemon,
        Request::Query {
            query: Query::Events {
                chore: Some("dishes".to_string()),
                limit: 1,
            },
        },
    )
    .await;
    let Response::EventLog { records } = response else {
        panic!("expected event log");
    };
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sequence, 2);
    assert_eq!(records[0].name, "chore_claimed");
}

#[tokio::test]
async fn status_counts_the_household() {
    let (_dir, mut daemon) = daemon().await;
    household(&mut daemon, CompletionCriteria::Independent).await;
    let response = handle_request(&mut daemon, Request::Tick).await;
    assert!(matches!(response, Response::Tick { .. }));

    match handle_request(&mut daemon, Request::Status).await {
        Response::Status {
            kids,
            chores,
            last_tick,
            ..
        } => {
            assert_eq!((kids, chores), (2, 1));
            assert!(last_tick.is_some());
        }
        other => panic!("expected status, got {:?}", other),
    }
}

#[tokio::test]
async fn removing_a_kid_lists_their_chores() {
    let (_dir, mut daemon) = daemon().await;
    household(&mut daemon, CompletionCriteria::Independent).await;

    let response = handle_request(
        &mut daemon,
        Request::RemoveKid {
            kid: "bo".to_string(),
        },
    )
    .await;
    assert_eq!(
        response,
        Response::KidRemoved {
            chores: vec!["dishes".to_string()]
        }
    );
}

#[tokio::test]
async fn shutdown_sets_the_flag() {
    let (_dir, mut daemon) = daemon().await;
    assert_eq!(
        handle_request(&mut daemon, Request::Shutdown).await,
        Response::ShuttingDown
    );
    assert!(daemon.shutdown_requested);
}

#[tokio::test]
async fn connection_round_trip() {
    let (_dir, mut daemon) = daemon().await;
    let (mut client, server) = UnixStream::pair().unwrap();

    protocol::write_request(&mut client, &Request::Ping, DEFAULT_TIMEOUT)
        .await
        .unwrap();
    handle_connection(&mut daemon, server).await.unwrap();

    let response = protocol::read_response(&mut client, DEFAULT_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(response, Response::Pong);
}

#[tokio::test]
async fn client_hanging_up_is_not_an_error() {
    let (_dir, mut daemon) = daemon().await;
    let (client, server) = UnixStream::pair().unwrap();
    drop(client);

    assert!(handle_connection(&mut daemon, server).await.is_ok());
}
