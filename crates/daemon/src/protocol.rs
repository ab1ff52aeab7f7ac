// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between `chores` and `choresd`
//!
//! Every message is a 4-byte big-endian length followed by that many bytes
//! of JSON. One request and one response per connection.

use std::time::Duration;

use chores_core::{BlockReason, ChoreDef, EventRecord, HouseholdManifest, Kid};
use chores_engine::{ChoreView, KidChoreView, ManifestSummary, TickReport};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Bumped when request or response shapes change incompatibly
pub const PROTOCOL_VERSION: &str = "1";

/// Read and write deadline for a single message
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Refuse anything larger than this
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Kid and chore ids are sent as typed; the daemon resolves prefixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Ping,
    Hello {
        version: String,
    },
    Status,
    Shutdown,
    /// Run the scan pipeline now
    Tick,

    Claim {
        kid: String,
        chore: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        actor: Option<String>,
    },
    Approve {
        kid: String,
        chore: String,
        approver: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        points: Option<f64>,
    },
    Disapprove {
        kid: String,
        chore: String,
        approver: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Undo {
        kid: String,
        chore: String,
    },
    SetDueDate {
        chore: String,
        due: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kid: Option<String>,
    },
    SkipDueDate {
        chore: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kid: Option<String>,
        mark_missed: bool,
    },
    ResetOverdue {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chore: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kid: Option<String>,
    },
    SetRotationTurn {
        chore: String,
        kid: String,
    },
    ResetRotation {
        chore: String,
    },
    OpenRotationCycle {
        chore: String,
    },

    AddKid {
        kid: Kid,
    },
    RemoveKid {
        kid: String,
    },
    ApplyChore {
        chore: Box<ChoreDef>,
    },
    ApplyManifest {
        manifest: HouseholdManifest,
    },
    RemoveChore {
        chore: String,
    },

    Query {
        query: Query,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    ListKids,
    ListChores,
    GetChore {
        chore: String,
    },
    KidChores {
        kid: String,
    },
    KidChore {
        kid: String,
        chore: String,
    },
    /// Recent audit-log records, optionally for one chore
    Events {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chore: Option<String>,
        limit: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Pong,
    Hello {
        version: String,
    },
    ShuttingDown,
    Status {
        uptime_secs: u64,
        kids: usize,
        chores: usize,
        last_tick: Option<DateTime<Utc>>,
        version: String,
    },
    /// An action succeeded; these are the events it emitted
    Events {
        events: Vec<chores_core::Event>,
    },
    /// An action was refused by the eligibility gates
    Rejected {
        action: String,
        reason: BlockReason,
        message: String,
    },
    Error {
        message: String,
    },
    Kids {
        kids: Vec<Kid>,
    },
    Chores {
        chores: Vec<ChoreView>,
    },
    Chore {
        chore: Box<ChoreView>,
    },
    KidChores {
        chores: Vec<KidChoreView>,
    },
    KidChore {
        chore: Box<KidChoreView>,
    },
    KidAdded {
        created: bool,
    },
    KidRemoved {
        chores: Vec<String>,
    },
    ChoreApplied {
        created: bool,
        added: Vec<String>,
        removed: Vec<String>,
    },
    Manifest {
        summary: ManifestSummary,
    },
    Tick {
        report: TickReport,
    },
    EventLog {
        records: Vec<EventRecord>,
    },
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message too large: {0} bytes")]
    MessageTooLarge(usize),
    #[error("timed out")]
    Timeout,
    #[error("connection closed")]
    ConnectionClosed,
}

/// Serialize to raw JSON (no length prefix)
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write one length-prefixed frame
pub async fn write_message<W>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if data.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(data.len()));
    }
    let len = u32::try_from(data.len()).map_err(|_| ProtocolError::MessageTooLarge(data.len()))?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame
///
/// EOF before the length prefix is [`ProtocolError::ConnectionClosed`].
pub async fn read_message<R>(reader: &mut R) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; 4];
    match reader.read_exact(&mut prefix).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(prefix) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(len));
    }
    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer).await?;
    Ok(buffer)
}

async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, ProtocolError>
where
    F: std::future::Future<Output = Result<T, ProtocolError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| ProtocolError::Timeout)?
}

pub async fn read_request<R>(reader: &mut R, timeout: Duration) -> Result<Request, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let bytes = with_timeout(timeout, read_message(reader)).await?;
    decode(&bytes)
}

pub async fn write_request<W>(
    writer: &mut W,
    request: &Request,
    timeout: Duration,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode(request)?;
    with_timeout(timeout, write_message(writer, &bytes)).await
}

pub async fn read_response<R>(reader: &mut R, timeout: Duration) -> Result<Response, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let bytes = with_timeout(timeout, read_message(reader)).await?;
    decode(&bytes)
}

pub async fn write_response<W>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode(response)?;
    with_timeout(timeout, write_message(writer, &bytes)).await
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
