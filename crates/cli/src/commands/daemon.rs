// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon management: start, stop, status, logs

use std::time::Duration;

use anyhow::{bail, Result};
use chores_daemon::{Paths, Request, Response};
use clap::Subcommand;

use crate::client::{self, ClientError, DaemonClient};
use crate::output::OutputFormat;

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon
    Start {
        /// Run in the foreground instead of detaching
        #[arg(long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop,
    /// Show whether the daemon is running and what it holds
    Status,
    /// Print the daemon log
    Logs {
        /// Number of trailing lines
        #[arg(long, short = 'n', default_value = "50")]
        lines: usize,
    },
}

pub async fn handle(command: DaemonCommand, paths: &Paths, format: OutputFormat) -> Result<()> {
    match command {
        DaemonCommand::Start { foreground } => start(paths, foreground).await,
        DaemonCommand::Stop => {
            if client::daemon_stop(paths).await? {
                println!("Daemon stopped");
            } else {
                println!("Daemon not running");
            }
            Ok(())
        }
        DaemonCommand::Status => status(paths, format).await,
        DaemonCommand::Logs { lines } => logs(paths, lines),
    }
}

async fn start(paths: &Paths, foreground: bool) -> Result<()> {
    if DaemonClient::connect(paths).is_ok() {
        println!("Daemon already running");
        return Ok(());
    }

    if foreground {
        let status = std::process::Command::new(client::daemon_binary())
            .arg(&paths.state_dir)
            .status()?;
        if !status.success() {
            bail!(ClientError::DaemonStartFailed(format!("exited with {}", status)));
        }
        return Ok(());
    }

    DaemonClient::connect_or_start(paths).await?;
    println!("Daemon started");
    Ok(())
}

async fn status(paths: &Paths, format: OutputFormat) -> Result<()> {
    let client = match DaemonClient::connect(paths) {
        Ok(client) => client,
        Err(ClientError::DaemonNotRunning) => {
            not_running(format);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let response = match client.send(Request::Status).await {
        Ok(response) => response,
        // A socket with nobody behind it
        Err(ClientError::Io(_)) => {
            not_running(format);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let Response::Status {
        uptime_secs,
        kids,
        chores,
        last_tick,
        version,
    } = response
    else {
        bail!(ClientError::UnexpectedResponse);
    };

    match format {
        OutputFormat::Text => {
            println!("Status: running");
            println!(
                "Uptime: {}",
                humantime::format_duration(Duration::from_secs(uptime_secs))
            );
            println!("Version: {}", version);
            println!("Kids: {}", kids);
            println!("Chores: {}", chores);
            match last_tick {
                Some(at) => println!("Last tick: {}", at.format("%Y-%m-%d %H:%M:%S")),
                None => println!("Last tick: never"),
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "status": "running",
                "uptime_secs": uptime_secs,
                "version": version,
                "kids": kids,
                "chores": chores,
                "last_tick": last_tick,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

fn not_running(format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("Daemon not running"),
        OutputFormat::Json => println!(r#"{{ "status": "not_running" }}"#),
    }
}

fn logs(paths: &Paths, lines: usize) -> Result<()> {
    let content = match std::fs::read_to_string(&paths.log_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            println!("No log at {}", paths.log_path.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    for line in tail_lines(&content, lines) {
        println!("{}", line);
    }
    Ok(())
}

/// The last `n` lines of `content`
pub fn tail_lines(content: &str, n: usize) -> Vec<&str> {
    let all: Vec<&str> = content.lines().collect();
    let skip = all.len().saturating_sub(n);
    all[skip..].to_vec()
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
