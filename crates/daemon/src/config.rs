// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `choresd.toml`
//!
//! ```toml
//! scan_interval = "1m"
//! day_offset_minutes = -300
//! default_reminder_lead = "30m"
//! event_log = true
//! ```

use std::path::Path;
use std::time::Duration;

use chores_core::{ChoreDef, HouseholdManifest};
use chores_engine::ManagerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest UTC offset a household can sit at, in minutes
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonConfig {
    /// Upper bound between scans; due dates and midnight wake the loop
    /// sooner
    #[serde(with = "humantime_serde")]
    pub scan_interval: Duration,
    pub day_offset_minutes: i32,
    /// Reminder lead for applied chores that don't set their own
    #[serde(with = "humantime_serde")]
    pub default_reminder_lead: Option<Duration>,
    /// Append every event to `events.jsonl`
    pub event_log: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(60),
            day_offset_minutes: 0,
            default_reminder_lead: None,
            event_log: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("scan_interval must be positive")]
    ZeroInterval,
    #[error("day_offset_minutes {0} is outside -840..=840")]
    Offset(i32),
}

impl DaemonConfig {
    /// Load from `path`; a missing file is the default config
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.day_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::Offset(self.day_offset_minutes));
        }
        Ok(())
    }

    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            day_offset_minutes: self.day_offset_minutes,
        }
    }

    /// Fill in household-wide defaults the manifest's chores left unset
    pub fn apply_defaults(&self, manifest: &mut HouseholdManifest) {
        for chore in &mut manifest.chores {
            self.apply_chore_defaults(chore);
        }
    }

    pub fn apply_chore_defaults(&self, chore: &mut ChoreDef) {
        if let Some(lead) = self.default_reminder_lead {
            chore.reminder_lead.get_or_insert(lead);
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
