// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event name patterns and subscriptions

use crate::event::Event;
use crate::id::ChoreId;

/// Pattern for matching event names
///
/// - `*` matches every event
/// - `chore_*` matches names starting with `chore_`
/// - anything else must match exactly
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventPattern(String);

impl EventPattern {
    pub fn new(pattern: &str) -> Self {
        Self(pattern.trim().to_string())
    }

    pub fn matches(&self, event_name: &str) -> bool {
        match self.0.as_str() {
            "" => false,
            "*" => true,
            pattern => match pattern.strip_suffix('*') {
                Some(prefix) => event_name.starts_with(prefix),
                None => pattern == event_name,
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Subscriber handle for unsubscribing
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub String);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subscription to event name patterns, optionally narrowed to one chore
#[derive(Clone, Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub patterns: Vec<EventPattern>,
    pub chore: Option<ChoreId>,
    pub description: String,
}

impl Subscription {
    pub fn new(
        id: impl Into<String>,
        patterns: Vec<EventPattern>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: SubscriberId(id.into()),
            patterns,
            chore: None,
            description: description.into(),
        }
    }

    pub fn for_chore(mut self, chore: impl Into<ChoreId>) -> Self {
        self.chore = Some(chore.into());
        self
    }

    pub fn matches_name(&self, event_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(event_name))
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(chore) = &self.chore {
            if event.chore_id() != chore {
                return false;
            }
        }
        self.matches_name(event.name())
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
