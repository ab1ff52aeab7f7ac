// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod action;
pub mod chore;
pub mod daemon;
pub mod kid;
pub mod rotation;

use anyhow::Result;

use crate::client::DaemonClient;
use crate::output::{self, EventRow, OutputFormat};
use chores_daemon::Request;

/// Send an action and print the events it emitted
pub(crate) async fn run_action(
    client: &DaemonClient,
    request: Request,
    format: OutputFormat,
    done: &str,
) -> Result<()> {
    let events = client.action(request).await?;
    match format {
        OutputFormat::Text => {
            println!("{}", done);
            for event in &events {
                println!("  {}", EventRow(event));
            }
        }
        OutputFormat::Json => {
            let rows: Vec<EventRow<'_>> = events.iter().map(EventRow).collect();
            output::print_list(&rows, format, "");
        }
    }
    Ok(())
}
