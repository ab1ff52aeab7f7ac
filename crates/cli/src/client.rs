// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use chores_core::{BlockReason, Event};
use chores_daemon::protocol::{self, ProtocolError};
use chores_daemon::{Paths, Query, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for one request/response exchange
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("CHORES_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start
pub fn timeout_connect() -> Duration {
    parse_duration_ms("CHORES_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for process to exit
pub fn timeout_exit() -> Duration {
    parse_duration_ms("CHORES_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

/// Polling interval for retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("CHORES_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("Connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An action was refused; the message names the reason
    #[error("{message}")]
    Rejected {
        reason: BlockReason,
        message: String,
    },

    #[error("{0}")]
    Daemon(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to the daemon, starting it if needed
    pub async fn connect_or_start(paths: &Paths) -> Result<Self, ClientError> {
        // A daemon from another build speaks another protocol; replace it
        if let Ok(daemon_version) = std::fs::read_to_string(&paths.version_path) {
            if daemon_version.trim() != env!("CARGO_PKG_VERSION") {
                tracing::debug!(daemon_version = daemon_version.trim(), "restarting stale daemon");
                let _ = daemon_stop(paths).await;
            }
        }

        match Self::connect(paths) {
            Ok(client) => Ok(client),
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background(paths)?;
                Self::connect_with_retry(paths, timeout_connect(), child).await
            }
            Err(e) => Err(wrap_with_startup_error(e, paths)),
        }
    }

    /// Connect to a running daemon (no auto-start)
    pub fn connect(paths: &Paths) -> Result<Self, ClientError> {
        if !paths.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self {
            socket_path: paths.socket_path.clone(),
        })
    }

    /// Poll for the socket, watching for the child to exit early
    pub async fn connect_with_retry(
        paths: &Paths,
        timeout: Duration,
        mut child: std::process::Child,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if let Ok(Some(status)) = child.try_wait() {
                // Startup failed; the log may need a moment to show why
                let poll_start = Instant::now();
                while poll_start.elapsed() < timeout_exit() {
                    if let Some(err) = read_startup_error(paths) {
                        return Err(ClientError::DaemonStartFailed(err));
                    }
                    tokio::time::sleep(poll_interval()).await;
                }
                return Err(ClientError::DaemonStartFailed(format!(
                    "exited with {}",
                    status
                )));
            }

            match Self::connect(paths) {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => tokio::time::sleep(poll_interval()).await,
                Err(e) => return Err(wrap_with_startup_error(e, paths)),
            }
        }

        Err(wrap_with_startup_error(
            ClientError::DaemonStartTimeout,
            paths,
        ))
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        protocol::write_request(&mut writer, &request, timeout_ipc()).await?;
        Ok(protocol::read_response(&mut reader, timeout_ipc()).await?)
    }

    /// Run a kid or chore action; returns the events it emitted
    pub async fn action(&self, request: Request) -> Result<Vec<Event>, ClientError> {
        match self.send(request).await? {
            Response::Events { events } => Ok(events),
            other => Err(unexpected(other)),
        }
    }

    /// Send a request that answers with a specific response
    pub async fn request(&self, request: Request) -> Result<Response, ClientError> {
        match self.send(request).await? {
            Response::Rejected {
                reason, message, ..
            } => Err(ClientError::Rejected { reason, message }),
            Response::Error { message } => Err(ClientError::Daemon(message)),
            response => Ok(response),
        }
    }

    pub async fn query(&self, query: Query) -> Result<Response, ClientError> {
        self.request(Request::Query { query }).await
    }

    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(Request::Shutdown).await? {
            Response::Ok | Response::ShuttingDown => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: Response) -> ClientError {
    match response {
        Response::Rejected {
            reason, message, ..
        } => ClientError::Rejected { reason, message },
        Response::Error { message } => ClientError::Daemon(message),
        _ => ClientError::UnexpectedResponse,
    }
}

/// Start the daemon in the background, returning the child process handle
pub fn start_daemon_background(paths: &Paths) -> Result<std::process::Child, ClientError> {
    let choresd = daemon_binary();
    tracing::debug!(binary = %choresd.display(), "starting daemon");

    Command::new(&choresd)
        .arg(&paths.state_dir)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map_err(|e| ClientError::DaemonStartFailed(e.to_string()))
}

/// Stop the daemon (graceful first, then forceful)
///
/// Returns false if it wasn't running.
pub async fn daemon_stop(paths: &Paths) -> Result<bool, ClientError> {
    let client = match DaemonClient::connect(paths) {
        Ok(c) => c,
        Err(ClientError::DaemonNotRunning) => {
            cleanup_stale_pid(paths);
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let shutdown_result = client.shutdown().await;

    if let Some(pid) = read_daemon_pid(paths) {
        if shutdown_result.is_ok() {
            wait_for_exit(pid, timeout_exit()).await;
        }
        if process_exists(pid) {
            force_kill_daemon(pid);
            wait_for_exit(pid, timeout_exit()).await;
        }
    }

    cleanup_stale_pid(paths);
    // A killed daemon leaves its socket behind
    if paths.socket_path.exists() {
        let _ = std::fs::remove_file(&paths.socket_path);
    }
    Ok(true)
}

async fn wait_for_exit(pid: u32, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if !process_exists(pid) {
            return true;
        }
        tokio::time::sleep(poll_interval()).await;
    }
    false
}

/// Find the choresd binary
pub fn daemon_binary() -> PathBuf {
    // Explicit override (used by specs to pin the binary under test)
    if let Ok(path) = std::env::var("CHORES_DAEMON_BINARY") {
        return PathBuf::from(path);
    }

    // Running from cargo during development
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let dev_path = PathBuf::from(manifest_dir)
            .parent()
            .and_then(|p| p.parent())
            .map(|p| p.join("target/debug/choresd"));
        if let Some(path) = dev_path.filter(|p| p.exists()) {
            return path;
        }
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(sibling) = exe.parent().map(|dir| dir.join("choresd")) {
            if sibling.exists() {
                return sibling;
            }
        }
    }

    PathBuf::from("choresd")
}

/// Remove an orphaned pid file; the daemon normally removes its own
fn cleanup_stale_pid(paths: &Paths) {
    if paths.lock_path.exists() {
        let _ = std::fs::remove_file(&paths.lock_path);
    }
}

pub fn read_daemon_pid(paths: &Paths) -> Option<u32> {
    std::fs::read_to_string(&paths.lock_path)
        .ok()
        .and_then(|content| content.trim().parse::<u32>().ok())
}

/// `kill -0`: does the process exist?
pub fn process_exists(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn force_kill_daemon(pid: u32) -> bool {
    Command::new("kill")
        .args(["-9", &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Written by choresd before anything else.
/// Full format: "--- choresd: starting (pid: 12345)"
const STARTUP_MARKER_PREFIX: &str = "--- choresd: starting (pid: ";

/// Errors logged since the last startup marker, if any
pub fn read_startup_error(paths: &Paths) -> Option<String> {
    let content = std::fs::read_to_string(&paths.log_path).ok()?;
    startup_error_in(&content)
}

fn startup_error_in(log: &str) -> Option<String> {
    let start_pos = log.rfind(STARTUP_MARKER_PREFIX)?;
    let errors: Vec<&str> = log[start_pos..]
        .lines()
        .filter(|line| line.contains(" ERROR ") || line.contains("Failed to start"))
        .collect();
    if errors.is_empty() {
        return None;
    }

    // Lines look like "timestamp LEVEL target: message"
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|line| line.split_once(": ").map(|(_, msg)| msg))
        .collect();
    if messages.is_empty() {
        Some(errors.join("\n"))
    } else {
        Some(messages.join("\n"))
    }
}

/// Prefer the daemon's own startup error over a generic one
fn wrap_with_startup_error(err: ClientError, paths: &Paths) -> ClientError {
    if matches!(err, ClientError::DaemonStartFailed(_)) {
        return err;
    }
    match read_startup_error(paths) {
        Some(startup_error) => ClientError::DaemonStartFailed(startup_error),
        None => err,
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
