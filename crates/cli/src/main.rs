// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! chores - household chore tracking CLI

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod client;
mod commands;
mod completions;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{action, chore, daemon, kid, rotation};
use chores_daemon::{Paths, Request, Response};

use crate::client::{ClientError, DaemonClient};
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "chores", version, about = "Household chores with claims, approvals and rotations")]
struct Cli {
    /// State directory (defaults to $XDG_STATE_HOME/chores)
    #[arg(long, global = true, env = "CHORES_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Claim a chore for a kid
    Claim(action::ClaimArgs),
    /// Approve a claimed chore
    Approve(action::ApproveArgs),
    /// Send a claimed chore back to pending
    Disapprove(action::DisapproveArgs),
    /// Withdraw a kid's own claim
    Undo(action::UndoArgs),
    /// Run the scan now instead of waiting for the timer
    Tick,
    /// Kid management
    #[command(subcommand)]
    Kid(kid::KidCommand),
    /// Chore definitions and due dates
    #[command(subcommand)]
    Chore(chore::ChoreCommand),
    /// Rotation turns and cycles
    #[command(subcommand)]
    Rotation(rotation::RotationCommand),
    /// Daemon management
    #[command(subcommand)]
    Daemon(daemon::DaemonCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();
    let format = cli.output;

    // Commands that don't talk to the daemon
    let command = match cli.command {
        Commands::Completions(args) => {
            completions::generate_completions::<Cli>(args.shell);
            return Ok(());
        }
        command => command,
    };

    let paths = resolve_paths(cli.state_dir)?;

    if let Commands::Daemon(command) = command {
        return daemon::handle(command, &paths, format).await;
    }

    let client = DaemonClient::connect_or_start(&paths).await?;

    match command {
        Commands::Claim(args) => action::claim(&client, args, format).await?,
        Commands::Approve(args) => action::approve(&client, args, format).await?,
        Commands::Disapprove(args) => action::disapprove(&client, args, format).await?,
        Commands::Undo(args) => action::undo(&client, args, format).await?,
        Commands::Tick => match client.request(Request::Tick).await? {
            Response::Tick { report } => match format {
                OutputFormat::Text => println!(
                    "Tick: {} reset, {} overdue, {} missed, {} skipped, {} notices",
                    report.reset, report.overdue, report.missed, report.skipped, report.notices
                ),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            },
            _ => anyhow::bail!(ClientError::UnexpectedResponse),
        },
        Commands::Kid(command) => kid::handle(&client, command, format).await?,
        Commands::Chore(command) => chore::handle(&client, command, format).await?,
        Commands::Rotation(command) => rotation::handle(&client, command, format).await?,
        Commands::Daemon(_) | Commands::Completions(_) => unreachable!(),
    }

    Ok(())
}

/// The daemon and the CLI must agree on the exact path; it names the socket
fn resolve_paths(state_dir: Option<PathBuf>) -> Result<Paths, ClientError> {
    let dir = match state_dir {
        Some(dir) => dir,
        None => Paths::from_env()
            .ok_or(ClientError::NoStateDir)?
            .state_dir,
    };
    std::fs::create_dir_all(&dir)?;
    let dir = dir.canonicalize()?;
    Ok(Paths::for_state_dir(&dir))
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("CHORES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
