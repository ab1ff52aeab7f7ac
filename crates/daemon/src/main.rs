// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chores daemon (choresd)
//!
//! Owns the household, runs the scan on a timer and serves the CLI.

use std::path::PathBuf;
use std::time::Duration;

use chores_daemon::lifecycle::{self, LifecycleError};
use chores_daemon::{server, Paths};
use chrono::Utc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // choresd [STATE_DIR]
    let paths = match std::env::args().nth(1) {
        Some(dir) => Paths::for_state_dir(&PathBuf::from(dir)),
        None => Paths::from_env().ok_or(LifecycleError::NoStateDir)?,
    };

    // Marker goes in before tracing so the CLI can find this attempt
    write_startup_marker(&paths)?;
    let log_guard = setup_logging(&paths)?;

    info!("starting choresd in {}", paths.state_dir.display());

    let mut daemon = match lifecycle::startup(&paths).await {
        Ok(d) => d,
        Err(e) => {
            // Tracing is non-blocking and may not flush before exit
            write_startup_error(&paths, &e);
            error!("failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!("daemon ready, listening on {}", paths.socket_path.display());
    println!("READY");

    // Catch up on anything that came due while the daemon was down
    if let Err(e) = daemon.tick().await {
        error!("startup tick failed: {}", e);
    }

    loop {
        let until_tick = (daemon.next_tick_at() - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        tokio::select! {
            result = daemon.listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        if let Err(e) = server::handle_connection(&mut daemon, stream).await {
                            error!("error handling connection: {}", e);
                        }
                    }
                    Err(e) => error!("error accepting connection: {}", e),
                }
            }

            _ = tokio::time::sleep(until_tick) => {
                match daemon.tick().await {
                    Ok(report) => tracing::debug!(?report, "tick"),
                    Err(e) => error!("tick failed: {}", e),
                }
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                daemon.shutdown().await?;
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                daemon.shutdown().await?;
                break;
            }
        }

        if daemon.shutdown_requested {
            info!("shutdown requested via IPC");
            daemon.shutdown().await?;
            break;
        }
    }

    info!("daemon stopped");
    Ok(())
}

/// Written to the log before anything else.
/// Full format: "--- choresd: starting (pid: 12345)"
pub const STARTUP_MARKER_PREFIX: &str = "--- choresd: starting (pid: ";

fn write_startup_marker(paths: &Paths) -> Result<(), LifecycleError> {
    use std::io::Write;

    std::fs::create_dir_all(&paths.state_dir)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;
    Ok(())
}

fn write_startup_error(paths: &Paths, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    paths: &Paths,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file_appender = tracing_appender::rolling::never(
        &paths.state_dir,
        paths
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
