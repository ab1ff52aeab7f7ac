// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands
//!
//! Row types wrap the daemon's views so text and JSON share one path.

use std::fmt;

use chores_core::{Event, EventRecord, Kid};
use chores_engine::{ChoreView, KidChoreView};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a list of items; text mode prints `empty` for no items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat, empty: &str) {
    match format {
        OutputFormat::Text if items.is_empty() => println!("{}", empty),
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

fn when(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct KidRow<'a>(pub &'a Kid);

impl fmt::Display for KidRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {}", self.0.id.to_string(), self.0.name)
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct EventRow<'a>(pub &'a Event);

impl fmt::Display for EventRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let event = self.0;
        write!(f, "{:<24} {}", event.name(), event.chore_id())?;
        if let Some(kid) = event.kid_id() {
            write!(f, " {}", kid)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct RecordRow<'a>(pub &'a EventRecord);

impl fmt::Display for RecordRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6} {} {}",
            self.0.sequence,
            self.0.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            EventRow(&self.0.event)
        )
    }
}

/// One line per chore in a kid's list
#[derive(Serialize)]
#[serde(transparent)]
pub struct KidChoreRow<'a>(pub &'a KidChoreView);

impl fmt::Display for KidChoreRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        write!(
            f,
            "{:<16} {:<12} due {}",
            view.chore_id.to_string(),
            view.state.to_string(),
            when(view.due_date)
        )?;
        if let Some(reason) = view.lock_reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}

/// Full detail for one kid on one chore
#[derive(Serialize)]
#[serde(transparent)]
pub struct KidChoreDetail<'a>(pub &'a KidChoreView);

impl fmt::Display for KidChoreDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "{} / {}", view.kid_name, view.chore_name)?;
        writeln!(f, "  State: {}", view.state)?;
        if let Some(reason) = view.lock_reason {
            writeln!(f, "  Locked: {}", reason)?;
        }
        writeln!(f, "  Due: {}", when(view.due_date))?;
        if let Some(at) = view.next_claimable_at {
            writeln!(f, "  Claimable from: {}", when(Some(at)))?;
        }
        if let Some(holder) = &view.turn_holder_name {
            writeln!(f, "  Turn: {}", holder)?;
        }
        if let Some(by) = &view.claimed_by {
            writeln!(f, "  Claimed by: {}", by)?;
        }
        if let Some(by) = &view.completed_by {
            writeln!(f, "  Completed by: {}", by)?;
        }
        let all_time = &view.stats.all_time;
        write!(
            f,
            "  Approved: {} ({} points), streak {}",
            all_time.approved, all_time.points, view.stats.current_streak
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct ChoreRow<'a>(pub &'a ChoreView);

impl fmt::Display for ChoreRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        write!(
            f,
            "{:<16} {:<20} {:<16} {:<16} due {}",
            view.id.to_string(),
            view.name,
            view.criteria.to_string(),
            view.state.to_string(),
            when(view.due_date)
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct ChoreDetail<'a>(pub &'a ChoreView);

impl fmt::Display for ChoreDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "Chore: {} ({})", view.name, view.id)?;
        writeln!(f, "  Criteria: {}", view.criteria)?;
        writeln!(f, "  State: {}", view.state)?;
        writeln!(f, "  Points: {}", view.points)?;
        writeln!(f, "  Due: {}", when(view.due_date))?;
        if let Some(holder) = &view.turn_holder_name {
            let open = if view.cycle_open { " (cycle open)" } else { "" };
            writeln!(f, "  Turn: {}{}", holder, open)?;
        }
        write!(f, "  Kids:")?;
        for kid in &view.kids {
            write!(f, "\n    {:<16} {}", kid.kid_name, kid.state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
