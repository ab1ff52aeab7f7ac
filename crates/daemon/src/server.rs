// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and request dispatch

use chores_core::Event;
use chores_engine::ManagerError;
use thiserror::Error;
use tokio::net::UnixStream;
use tracing::{debug, error};

use crate::lifecycle::DaemonState;
use crate::protocol::{self, Query, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
    #[error("request read timeout")]
    Timeout,
}

/// Serve one request on a freshly accepted connection
pub async fn handle_connection(
    daemon: &mut DaemonState,
    stream: UnixStream,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!(?request, "received request");
    let response = handle_request(daemon, request).await;
    debug!(?response, "sending response");

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    Ok(())
}

async fn handle_request(daemon: &mut DaemonState, request: Request) -> Response {
    let response = match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }

        Request::Status => {
            let household = daemon.manager.household();
            Response::Status {
                uptime_secs: daemon.start_time.elapsed().as_secs(),
                kids: household.kids.len(),
                chores: household.chores.len(),
                last_tick: daemon.last_tick.as_ref().and_then(|t| t.scanned_at),
                version: env!("CARGO_PKG_VERSION").to_string(),
            }
        }

        Request::Tick => match daemon.tick().await {
            Ok(report) => Response::Tick { report },
            Err(e) => error_response(e),
        },

        Request::Query { query } => handle_query(daemon, query),

        Request::AddKid { kid } => match daemon.manager.add_kid(kid).await {
            Ok(created) => Response::KidAdded { created },
            Err(e) => error_response(e),
        },

        Request::RemoveKid { kid } => {
            let result = async {
                let kid = daemon.manager.resolve_kid_id(&kid)?;
                daemon.manager.remove_kid(&kid).await
            }
            .await;
            match result {
                Ok(chores) => Response::KidRemoved {
                    chores: chores.iter().map(|c| c.to_string()).collect(),
                },
                Err(e) => error_response(e),
            }
        }

        Request::ApplyChore { chore } => {
            let mut chore = *chore;
            daemon.config.apply_chore_defaults(&mut chore);
            match daemon.manager.apply_chore(chore).await {
                Ok(change) => Response::ChoreApplied {
                    created: change.created,
                    added: change.added.iter().map(|k| k.to_string()).collect(),
                    removed: change.removed.iter().map(|k| k.to_string()).collect(),
                },
                Err(e) => error_response(e),
            }
        }

        Request::ApplyManifest { mut manifest } => {
            daemon.config.apply_defaults(&mut manifest);
            match daemon.manager.apply_manifest(manifest).await {
                Ok(summary) => Response::Manifest { summary },
                Err(e) => error_response(e),
            }
        }

        Request::RemoveChore { chore } => {
            let result = async {
                let chore = daemon.manager.resolve_chore_id(&chore)?;
                daemon.manager.remove_chore(&chore).await
            }
            .await;
            match result {
                Ok(_) => Response::Ok,
                Err(e) => error_response(e),
            }
        }

        action => match run_action(daemon, action).await {
            Ok(events) => Response::Events { events },
            Err(e) => error_response(e),
        },
    };

    daemon.record_events();
    response
}

/// Kid and chore actions; every one answers with the events it emitted
async fn run_action(daemon: &DaemonState, request: Request) -> Result<Vec<Event>, ManagerError> {
    let m = &daemon.manager;
    match request {
        Request::Claim { kid, chore, actor } => {
            let kid = m.resolve_kid_id(&kid)?;
            let chore = m.resolve_chore_id(&chore)?;
            let actor = actor.unwrap_or_else(|| kid.to_string());
            m.claim(&kid, &chore, &actor).await
        }
        Request::Approve {
            kid,
            chore,
            approver,
            points,
        } => {
            let kid = m.resolve_kid_id(&kid)?;
            let chore = m.resolve_chore_id(&chore)?;
            m.approve(&kid, &chore, &approver, points).await
        }
        Request::Disapprove {
            kid,
            chore,
            approver,
            reason,
        } => {
            let kid = m.resolve_kid_id(&kid)?;
            let chore = m.resolve_chore_id(&chore)?;
            m.disapprove(&kid, &chore, &approver, reason.as_deref())
                .await
        }
        Request::Undo { kid, chore } => {
            let kid = m.resolve_kid_id(&kid)?;
            let chore = m.resolve_chore_id(&chore)?;
            m.undo_claim(&kid, &chore).await
        }
        Request::SetDueDate { chore, due, kid } => {
            let chore = m.resolve_chore_id(&chore)?;
            let kid = kid.map(|k| m.resolve_kid_id(&k)).transpose()?;
            m.set_due_date(&chore, due, kid.as_ref()).await
        }
        Request::SkipDueDate {
            chore,
            kid,
            mark_missed,
        } => {
            let chore = m.resolve_chore_id(&chore)?;
            let kid = kid.map(|k| m.resolve_kid_id(&k)).transpose()?;
            m.skip_due_date(&chore, kid.as_ref(), mark_missed).await
        }
        Request::ResetOverdue { chore, kid } => {
            let chore = chore.map(|c| m.resolve_chore_id(&c)).transpose()?;
            let kid = kid.map(|k| m.resolve_kid_id(&k)).transpose()?;
            m.reset_overdue(chore.as_ref(), kid.as_ref()).await
        }
        Request::SetRotationTurn { chore, kid } => {
            let chore = m.resolve_chore_id(&chore)?;
            let kid = m.resolve_kid_id(&kid)?;
            m.set_rotation_turn(&chore, &kid).await
        }
        Request::ResetRotation { chore } => {
            let chore = m.resolve_chore_id(&chore)?;
            m.reset_rotation(&chore).await
        }
        Request::OpenRotationCycle { chore } => {
            let chore = m.resolve_chore_id(&chore)?;
            m.open_rotation_cycle(&chore).await
        }
        other => {
            error!(request = ?other, "not an action");
            Ok(Vec::new())
        }
    }
}

/// Read-only requests
fn handle_query(daemon: &DaemonState, query: Query) -> Response {
    let m = &daemon.manager;
    let result = match query {
        Query::ListKids => Ok(Response::Kids { kids: m.kids() }),
        Query::ListChores => Ok(Response::Chores {
            chores: m.list_chores(),
        }),
        Query::GetChore { chore } => m
            .resolve_chore_id(&chore)
            .and_then(|id| m.chore(&id))
            .map(|chore| Response::Chore {
                chore: Box::new(chore),
            }),
        Query::KidChores { kid } => m
            .resolve_kid_id(&kid)
            .and_then(|id| m.kid_chores(&id))
            .map(|chores| Response::KidChores { chores }),
        Query::KidChore { kid, chore } => m
            .resolve_kid_id(&kid)
            .and_then(|kid| Ok((kid, m.resolve_chore_id(&chore)?)))
            .and_then(|(kid, chore)| m.kid_chore(&kid, &chore))
            .map(|chore| Response::KidChore {
                chore: Box::new(chore),
            }),
        Query::Events { chore, limit } => return query_events(daemon, chore, limit),
    };
    result.unwrap_or_else(error_response)
}

fn query_events(daemon: &DaemonState, chore: Option<String>, limit: usize) -> Response {
    let Some(log) = &daemon.event_log else {
        return Response::Error {
            message: "event log is disabled".to_string(),
        };
    };
    let records = match chore {
        Some(chore) => match daemon.manager.resolve_chore_id(&chore) {
            Ok(id) => log.for_chore(&id).map(|mut records| {
                let skip = records.len().saturating_sub(limit);
                records.drain(..skip);
                records
            }),
            Err(e) => return error_response(e),
        },
        None => log.tail(limit),
    };
    match records {
        Ok(records) => Response::EventLog { records },
        Err(e) => Response::Error {
            message: format!("failed to read event log: {}", e),
        },
    }
}

fn error_response(error: ManagerError) -> Response {
    match &error {
        ManagerError::Rejected { action, reason } => Response::Rejected {
            action: action.to_string(),
            reason: *reason,
            message: error.to_string(),
        },
        _ => Response::Error {
            message: error.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
