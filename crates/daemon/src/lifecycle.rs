// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: startup, the scan timer, shutdown

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::Instant;

use chores_adapters::{
    BusNotifyAdapter, MemoryStatsAdapter, TracedNotifyAdapter, TracedStatsAdapter,
};
use chores_core::events::EventReceiver;
use chores_core::{ApprovalSummary, Clock, EventBus, EventLog, SystemClock};
use chores_engine::{next_deadline, Manager, ManagerDeps, ManagerError, TickReport};
use chores_storage::{ChoreStore, Household, JsonStore, StorageError};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::{info, warn};

use crate::config::{ConfigError, DaemonConfig};
use crate::paths::Paths;

/// The manager with the daemon's concrete collaborators
pub type DaemonManager = Manager<
    JsonStore,
    TracedStatsAdapter<MemoryStatsAdapter>,
    TracedNotifyAdapter<BusNotifyAdapter>,
    SystemClock,
>;

/// Daemon state during operation
pub struct DaemonState {
    pub paths: Paths,
    pub config: DaemonConfig,
    // NOTE(lifetime): holds the exclusive lock until drop
    #[allow(dead_code)]
    lock_file: File,
    pub listener: UnixListener,
    pub manager: DaemonManager,
    /// `None` when the config turns the audit log off
    pub event_log: Option<EventLog>,
    /// Everything the bus published since the last drain
    events: Option<EventReceiver>,
    pub start_time: Instant,
    pub last_tick: Option<TickReport>,
    pub shutdown_requested: bool,
}

impl DaemonState {
    /// Run the scan pipeline once
    pub async fn tick(&mut self) -> Result<TickReport, ManagerError> {
        let result = self.manager.tick().await;
        self.record_events();
        let report = result?;
        self.last_tick = Some(report.clone());
        Ok(report)
    }

    /// Append published events to the audit log
    pub fn record_events(&mut self) {
        let (Some(events), Some(log)) = (self.events.as_mut(), self.event_log.as_mut()) else {
            return;
        };
        while let Ok(event) = events.try_recv() {
            let name = event.name();
            if let Err(e) = log.append(event, Utc::now()) {
                warn!(event = name, error = %e, "failed to append to event log");
            }
        }
    }

    /// When the loop should next wake for a tick
    pub fn next_tick_at(&self) -> DateTime<Utc> {
        let config = self.manager.config();
        next_deadline(
            &self.manager.household(),
            self.manager.clock().now(),
            self.config.scan_interval,
            config.offset(),
        )
    }

    /// Shutdown the daemon gracefully
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("shutting down daemon");
        self.record_events();

        for path in [
            &self.paths.socket_path,
            &self.paths.lock_path,
            &self.paths.version_path,
        ] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "failed to remove file");
                }
            }
        }

        info!("daemon shutdown complete");
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("failed to bind socket at {0}: {1}")]
    BindFailed(std::path::PathBuf, std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub async fn startup(paths: &Paths) -> Result<DaemonState, LifecycleError> {
    match startup_inner(paths).await {
        Ok(state) => Ok(state),
        // The files belong to the daemon holding the lock
        Err(e @ LifecycleError::LockFailed(_)) => Err(e),
        Err(e) => {
            cleanup_on_failure(paths);
            Err(e)
        }
    }
}

async fn startup_inner(paths: &Paths) -> Result<DaemonState, LifecycleError> {
    std::fs::create_dir_all(&paths.state_dir)?;
    if let Some(parent) = paths.socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Lock first so a second daemon fails before touching anything.
    // Truncate only once the lock is ours; the pid belongs to the holder.
    let mut lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&paths.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    std::fs::write(&paths.version_path, env!("CARGO_PKG_VERSION"))?;

    let config = DaemonConfig::load(&paths.config_path)?;
    let store = JsonStore::open(&paths.store_path)?;

    let stats = MemoryStatsAdapter::new();
    seed_stats(&stats, &store.load()?);

    let bus = EventBus::new();
    let (event_log, events) = if config.event_log {
        let log = EventLog::open(&paths.event_log_path)?;
        (Some(log), Some(bus.set_global_handler()))
    } else {
        (None, None)
    };

    let manager = Manager::new(
        ManagerDeps {
            store,
            stats: TracedStatsAdapter::new(stats.clone()),
            notify: TracedNotifyAdapter::new(BusNotifyAdapter::new(bus)),
        },
        SystemClock,
        config.manager_config(),
    )?;

    // Bind last: clients only see a socket once everything above worked
    if paths.socket_path.exists() {
        std::fs::remove_file(&paths.socket_path)?;
    }
    let listener = UnixListener::bind(&paths.socket_path)
        .map_err(|e| LifecycleError::BindFailed(paths.socket_path.clone(), e))?;

    info!(
        state_dir = %paths.state_dir.display(),
        scan_interval = ?config.scan_interval,
        "daemon started"
    );

    Ok(DaemonState {
        paths: paths.clone(),
        config,
        lock_file,
        listener,
        manager,
        event_log,
        events,
        start_time: Instant::now(),
        last_tick: None,
        shutdown_requested: false,
    })
}

/// Smart rotation needs approval history from before this process
fn seed_stats(stats: &MemoryStatsAdapter, household: &Household) {
    for (chore_id, statuses) in &household.statuses {
        for (kid_id, status) in statuses {
            let approved = status.stats.all_time.approved;
            if approved == 0 && status.last_approved.is_none() {
                continue;
            }
            stats.seed(
                chore_id.clone(),
                kid_id.clone(),
                ApprovalSummary {
                    approved,
                    last_approved_at: status.last_approved,
                },
            );
        }
    }
}

fn cleanup_on_failure(paths: &Paths) {
    for path in [&paths.socket_path, &paths.version_path, &paths.lock_path] {
        if path.exists() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
