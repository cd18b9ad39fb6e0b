// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Veilpay

//! In-memory activity log.
//!
//! A bounded, newest-first record of orchestration events consumed by the
//! presentation layer. Rebuilt fresh each session; the durable audit
//! trail is the ledger itself.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Number of entries retained; older entries are discarded.
const CAPACITY: usize = 50;

/// Component that produced an activity entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityScope {
    Wallet,
    Funding,
    Payout,
    Balance,
}

/// One activity record.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub scope: ActivityScope,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only bounded log, newest first.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry at the head, discarding the oldest past capacity.
    pub fn append(&self, scope: ActivityScope, message: impl Into<String>) {
        let entry = ActivityEntry {
            scope,
            message: message.into(),
            timestamp: Utc::now(),
        };

        let mut entries = self.entries.lock().expect("activity log poisoned");
        entries.push_front(entry);
        entries.truncate(CAPACITY);
    }

    /// Snapshot of the log, newest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .expect("activity log poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entries_come_first() {
        let log = ActivityLog::new();
        log.append(ActivityScope::Funding, "first");
        log.append(ActivityScope::Payout, "second");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "second");
        assert_eq!(entries[1].message, "first");
    }

    #[test]
    fn log_is_bounded_to_capacity() {
        let log = ActivityLog::new();
        for i in 0..(CAPACITY + 10) {
            log.append(ActivityScope::Wallet, format!("entry {i}"));
        }

        let entries = log.entries();
        assert_eq!(entries.len(), CAPACITY);
        // Newest survives, oldest ten were dropped.
        assert_eq!(entries[0].message, format!("entry {}", CAPACITY + 9));
        assert_eq!(entries[CAPACITY - 1].message, "entry 10");
    }
}
