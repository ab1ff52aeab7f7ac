// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Claim, approve, disapprove and undo

use anyhow::Result;
use clap::Args;
use chores_daemon::Request;

use super::run_action;
use crate::client::DaemonClient;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ClaimArgs {
    /// Kid id (or unique prefix)
    pub kid: String,
    /// Chore id (or unique prefix)
    pub chore: String,
    /// Who made the claim, if not the kid
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(Args)]
pub struct ApproveArgs {
    pub kid: String,
    pub chore: String,
    /// Approving parent
    #[arg(long = "by", default_value = "parent")]
    pub approver: String,
    /// Award these points instead of the chore's
    #[arg(long)]
    pub points: Option<f64>,
}

#[derive(Args)]
pub struct DisapproveArgs {
    pub kid: String,
    pub chore: String,
    #[arg(long = "by", default_value = "parent")]
    pub approver: String,
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args)]
pub struct UndoArgs {
    pub kid: String,
    pub chore: String,
}

pub async fn claim(client: &DaemonClient, args: ClaimArgs, format: OutputFormat) -> Result<()> {
    let done = format!("Claimed {} for {}", args.chore, args.kid);
    let request = Request::Claim {
        kid: args.kid,
        chore: args.chore,
        actor: args.actor,
    };
    run_action(client, request, format, &done).await
}

pub async fn approve(client: &DaemonClient, args: ApproveArgs, format: OutputFormat) -> Result<()> {
    let done = format!("Approved {} for {}", args.chore, args.kid);
    let request = Request::Approve {
        kid: args.kid,
        chore: args.chore,
        approver: args.approver,
        points: args.points,
    };
    run_action(client, request, format, &done).await
}

pub async fn disapprove(
    client: &DaemonClient,
    args: DisapproveArgs,
    format: OutputFormat,
) -> Result<()> {
    let done = format!("Disapproved {} for {}", args.chore, args.kid);
    let request = Request::Disapprove {
        kid: args.kid,
        chore: args.chore,
        approver: args.approver,
        reason: args.reason,
    };
    run_action(client, request, format, &done).await
}

pub async fn undo(client: &DaemonClient, args: UndoArgs, format: OutputFormat) -> Result<()> {
    let done = format!("Undid claim on {} for {}", args.chore, args.kid);
    let request = Request::Undo {
        kid: args.kid,
        chore: args.chore,
    };
    run_action(client, request, format, &done).await
}
