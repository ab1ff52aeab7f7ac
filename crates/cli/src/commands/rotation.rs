// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rotation turn management

use anyhow::Result;
use clap::Subcommand;
use chores_daemon::Request;

use super::run_action;
use crate::client::DaemonClient;
use crate::output::OutputFormat;

#[derive(Subcommand)]
pub enum RotationCommand {
    /// Hand the turn to a kid
    Turn { chore: String, kid: String },
    /// Give the turn back to the first assigned kid
    Reset { chore: String },
    /// Let any assigned kid claim until the next approval
    Open { chore: String },
}

pub async fn handle(
    client: &DaemonClient,
    command: RotationCommand,
    format: OutputFormat,
) -> Result<()> {
    let (request, done) = match command {
        RotationCommand::Turn { chore, kid } => {
            let done = format!("Turn for {} set to {}", chore, kid);
            (Request::SetRotationTurn { chore, kid }, done)
        }
        RotationCommand::Reset { chore } => {
            let done = format!("Rotation reset for {}", chore);
            (Request::ResetRotation { chore }, done)
        }
        RotationCommand::Open { chore } => {
            let done = format!("Rotation cycle opened for {}", chore);
            (Request::OpenRotationCycle { chore }, done)
        }
    };
    run_action(client, request, format, &done).await
}
