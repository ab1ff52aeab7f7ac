// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where the daemon keeps its files
//!
//! Shared by `choresd` and the CLI so both agree on the socket, pid and
//! log locations for a state directory.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// File layout for one household's daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    /// Lock file holding the daemon's pid
    pub lock_path: PathBuf,
    pub version_path: PathBuf,
    pub log_path: PathBuf,
    pub config_path: PathBuf,
    /// Household snapshot
    pub store_path: PathBuf,
    pub event_log_path: PathBuf,
}

impl Paths {
    /// Layout under the default state directory
    pub fn from_env() -> Option<Self> {
        default_state_dir().map(|dir| Self::for_state_dir(&dir))
    }

    pub fn for_state_dir(state_dir: &Path) -> Self {
        let hash = state_hash(state_dir);
        Self {
            state_dir: state_dir.to_path_buf(),
            socket_path: socket_dir().join(format!("{}.sock", hash)),
            lock_path: state_dir.join("choresd.pid"),
            version_path: state_dir.join("choresd.version"),
            log_path: state_dir.join("choresd.log"),
            config_path: state_dir.join("choresd.toml"),
            store_path: state_dir.join("household.json"),
            event_log_path: state_dir.join("events.jsonl"),
        }
    }
}

/// `$XDG_STATE_HOME/chores`, else `~/.local/state/chores`
pub fn default_state_dir() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join("chores"));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".local/state/chores"))
}

/// Sockets live under a short directory to stay within SUN_LEN (104 bytes
/// on macOS). `CHORES_SOCKET_DIR` overrides it.
pub fn socket_dir() -> PathBuf {
    match std::env::var("CHORES_SOCKET_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => PathBuf::from("/tmp/chores"),
    }
}

/// First 16 hex chars of the state directory's SHA-256
///
/// Hashes the path as given; the CLI hands `choresd` the same string.
fn state_hash(state_dir: &Path) -> String {
    let digest = Sha256::digest(state_dir.to_string_lossy().as_bytes());
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
