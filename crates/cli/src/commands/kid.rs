// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kid management and per-kid views

use anyhow::{bail, Result};
use clap::Subcommand;
use chores_core::Kid;
use chores_daemon::{Query, Request, Response};

use crate::client::{ClientError, DaemonClient};
use crate::output::{self, KidChoreDetail, KidChoreRow, KidRow, OutputFormat};

#[derive(Subcommand)]
pub enum KidCommand {
    /// Add a kid, or rename an existing one
    Add {
        id: String,
        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
    },
    /// Remove a kid and unassign them from every chore
    Remove { kid: String },
    /// List kids
    List,
    /// A kid's chores and their states
    Chores { kid: String },
    /// One kid's detail for one chore
    Show { kid: String, chore: String },
}

pub async fn handle(client: &DaemonClient, command: KidCommand, format: OutputFormat) -> Result<()> {
    match command {
        KidCommand::Add { id, name } => {
            let name = name.unwrap_or_else(|| id.clone());
            let response = client
                .request(Request::AddKid {
                    kid: Kid::new(id.as_str(), name),
                })
                .await?;
            match response {
                Response::KidAdded { created: true } => println!("Kid added: {}", id),
                Response::KidAdded { created: false } => println!("Kid updated: {}", id),
                _ => bail!(ClientError::UnexpectedResponse),
            }
        }
        KidCommand::Remove { kid } => {
            let response = client.request(Request::RemoveKid { kid: kid.clone() }).await?;
            match response {
                Response::KidRemoved { chores } => {
                    println!("Kid removed: {}", kid);
                    if !chores.is_empty() {
                        println!("  Unassigned from: {}", chores.join(", "));
                    }
                }
                _ => bail!(ClientError::UnexpectedResponse),
            }
        }
        KidCommand::List => match client.query(Query::ListKids).await? {
            Response::Kids { kids } => {
                let rows: Vec<KidRow<'_>> = kids.iter().map(KidRow).collect();
                output::print_list(&rows, format, "No kids");
            }
            _ => bail!(ClientError::UnexpectedResponse),
        },
        KidCommand::Chores { kid } => match client.query(Query::KidChores { kid }).await? {
            Response::KidChores { chores } => {
                let rows: Vec<KidChoreRow<'_>> = chores.iter().map(KidChoreRow).collect();
                output::print_list(&rows, format, "No chores");
            }
            _ => bail!(ClientError::UnexpectedResponse),
        },
        KidCommand::Show { kid, chore } => match client.query(Query::KidChore { kid, chore }).await? {
            Response::KidChore { chore } => output::print(&KidChoreDetail(&chore), format),
            _ => bail!(ClientError::UnexpectedResponse),
        },
    }
    Ok(())
}
