// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only event log

use super::subscription::EventPattern;
use crate::event::Event;
use crate::id::ChoreId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// A logged event with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonic, starting at 1
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub name: String,
    pub event: Event,
}

/// One JSON record per line
pub struct EventLog {
    path: PathBuf,
    sequence: u64,
}

impl EventLog {
    /// Open or create a log, resuming the sequence after the last record
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let sequence = if path.exists() {
            let file = File::open(&path)?;
            BufReader::new(file)
                .lines()
                .map_while(Result::ok)
                .filter(|l| !l.trim().is_empty())
                .count() as u64
        } else {
            0
        };

        Ok(Self { path, sequence })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, event: Event, at: DateTime<Utc>) -> std::io::Result<EventRecord> {
        let record = EventRecord {
            sequence: self.sequence + 1,
            recorded_at: at,
            name: event.name().to_string(),
            event,
        };

        let json = serde_json::to_string(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{json}")?;

        self.sequence = record.sequence;
        Ok(record)
    }

    pub fn read_all(&self) -> std::io::Result<Vec<EventRecord>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: EventRecord = serde_json::from_str(&line)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn query(&self, pattern: &EventPattern) -> std::io::Result<Vec<EventRecord>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| pattern.matches(&r.name))
            .collect())
    }

    pub fn for_chore(&self, chore: &ChoreId) -> std::io::Result<Vec<EventRecord>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.event.chore_id() == chore)
            .collect())
    }

    /// The last `limit` records, oldest first
    pub fn tail(&self, limit: usize) -> std::io::Result<Vec<EventRecord>> {
        let mut all = self.read_all()?;
        let skip = all.len().saturating_sub(limit);
        Ok(all.split_off(skip))
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
