//! In-memory ledger of successful plans
//!
//! Newest entries sit at the front. Nothing is ever edited or removed, and
//! everything is lost when the process exits.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// One successful planning call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Display key. `created_at` can collide under rapid submits, this cannot.
    pub id: Uuid,
    pub request: String,
    pub trip_plan: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(request: impl Into<String>, trip_plan: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            request: request.into(),
            trip_plan: trip_plan.into(),
            created_at: Utc::now(),
        }
    }
}

/// Shared handle to the ledger; clones see the same entries
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Arc<Mutex<VecDeque<HistoryEntry>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a plan at the front of the ledger and return the stored entry
    pub fn prepend(&self, request: impl Into<String>, trip_plan: impl Into<String>) -> HistoryEntry {
        let entry = HistoryEntry::new(request, trip_plan);
        self.lock().push_front(entry.clone());
        tracing::debug!(id = %entry.id, total = self.len(), "History entry recorded");
        entry
    }

    /// All entries, most recent first
    #[cfg(test)]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().iter().cloned().collect()
    }

    /// The first `limit` entries, most recent first
    #[cfg(test)]
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.lock().iter().take(limit).cloned().collect()
    }

    pub fn latest(&self) -> Option<HistoryEntry> {
        self.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// "Request N: ..." lines for the bounded view, N counting up from the oldest entry
    pub fn numbered(&self, limit: usize) -> Vec<String> {
        // Count and view from one guard; prepends land from spawned tasks
        let entries = self.lock();
        let total = entries.len();
        entries
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, e)| format!("Request {}: {}", total - i, e.request))
            .collect()
    }
}
