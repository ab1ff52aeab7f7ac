// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore definitions, due dates and the audit log

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chores_core::{parse_manifest, KidId};
use chores_daemon::{Query, Request, Response};
use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::run_action;
use crate::client::{ClientError, DaemonClient};
use crate::output::{self, ChoreDetail, ChoreRow, OutputFormat, RecordRow};

#[derive(Subcommand)]
pub enum ChoreCommand {
    /// Create or update kids and chores from a TOML manifest
    Apply { file: PathBuf },
    /// List chores with their aggregate state
    List,
    /// Show one chore and every assigned kid
    Show { chore: String },
    /// Delete a chore
    Remove { chore: String },
    /// Set or clear a due date
    Due {
        chore: String,
        /// RFC 3339 instant or a duration from now ("2h", "3days")
        when: Option<String>,
        #[arg(long, conflicts_with = "when")]
        clear: bool,
        /// Only this kid's due date (independent chores)
        #[arg(long)]
        kid: Option<String>,
    },
    /// Move the due date to the next occurrence
    Skip {
        chore: String,
        #[arg(long)]
        kid: Option<String>,
        /// Record the skipped occurrence as missed
        #[arg(long)]
        mark_missed: bool,
    },
    /// Return overdue kids to pending
    ResetOverdue {
        /// Limit to one chore
        chore: Option<String>,
        #[arg(long)]
        kid: Option<String>,
    },
    /// Recent audit-log entries
    Events {
        chore: Option<String>,
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },
}

pub async fn handle(
    client: &DaemonClient,
    command: ChoreCommand,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ChoreCommand::Apply { file } => apply(client, &file).await?,
        ChoreCommand::List => match client.query(Query::ListChores).await? {
            Response::Chores { chores } => {
                let rows: Vec<ChoreRow<'_>> = chores.iter().map(ChoreRow).collect();
                output::print_list(&rows, format, "No chores");
            }
            _ => bail!(ClientError::UnexpectedResponse),
        },
        ChoreCommand::Show { chore } => match client.query(Query::GetChore { chore }).await? {
            Response::Chore { chore } => output::print(&ChoreDetail(&chore), format),
            _ => bail!(ClientError::UnexpectedResponse),
        },
        ChoreCommand::Remove { chore } => {
            client
                .request(Request::RemoveChore {
                    chore: chore.clone(),
                })
                .await?;
            println!("Chore removed: {}", chore);
        }
        ChoreCommand::Due {
            chore,
            when,
            clear,
            kid,
        } => {
            let due = match (when, clear) {
                (Some(when), _) => Some(parse_when(&when, Utc::now())?),
                (None, true) => None,
                (None, false) => bail!("give a due date or --clear"),
            };
            let done = match due {
                Some(due) => format!("Due date for {} set to {}", chore, due.to_rfc3339()),
                None => format!("Due date for {} cleared", chore),
            };
            run_action(client, Request::SetDueDate { chore, due, kid }, format, &done).await?;
        }
        ChoreCommand::Skip {
            chore,
            kid,
            mark_missed,
        } => {
            let done = format!("Skipped {}", chore);
            let request = Request::SkipDueDate {
                chore,
                kid,
                mark_missed,
            };
            run_action(client, request, format, &done).await?;
        }
        ChoreCommand::ResetOverdue { chore, kid } => {
            run_action(
                client,
                Request::ResetOverdue { chore, kid },
                format,
                "Overdue chores reset",
            )
            .await?;
        }
        ChoreCommand::Events { chore, limit } => {
            match client.query(Query::Events { chore, limit }).await? {
                Response::EventLog { records } => {
                    let rows: Vec<RecordRow<'_>> = records.iter().map(RecordRow).collect();
                    output::print_list(&rows, format, "No events");
                }
                _ => bail!(ClientError::UnexpectedResponse),
            }
        }
    }
    Ok(())
}

async fn apply(client: &DaemonClient, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let known: Vec<KidId> = match client.query(Query::ListKids).await? {
        Response::Kids { kids } => kids.into_iter().map(|k| k.id).collect(),
        _ => bail!(ClientError::UnexpectedResponse),
    };
    let manifest = parse_manifest(&content, &known)
        .with_context(|| format!("in {}", file.display()))?;

    match client.request(Request::ApplyManifest { manifest }).await? {
        Response::Manifest { summary } => {
            println!(
                "Applied {}: {} kids, {} chores created, {} updated",
                file.display(),
                summary.kids,
                summary.chores_created,
                summary.chores_updated
            );
            Ok(())
        }
        _ => bail!(ClientError::UnexpectedResponse),
    }
}

/// An RFC 3339 instant, or a duration from `now`
pub fn parse_when(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    let relative = input.trim().trim_start_matches('+');
    let duration = humantime::parse_duration(relative)
        .with_context(|| format!("not a date or duration: {}", input))?;
    let duration = chrono::Duration::from_std(duration)
        .with_context(|| format!("duration out of range: {}", input))?;
    now.checked_add_signed(duration)
        .with_context(|| format!("date out of range: {}", input))
}

#[cfg(test)]
#[path = "chore_tests.rs"]
mod tests;
