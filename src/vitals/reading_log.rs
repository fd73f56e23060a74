//! Reading log: audit trail of every observed metric.
//!
//! Entries are kept newest-first.  The log is observational only: nothing
//! in evaluation or the alert state machine reads it, so clearing it never
//! changes emergency detection.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::thresholds::{Metric, MetricObservation, MetricStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub metric: Metric,
    pub value: String,
    pub status: MetricStatus,
    pub at: DateTime<Utc>,
}

/// In-memory reading log with an optional entry cap.
#[derive(Debug, Default)]
pub struct ReadingLog {
    entries: VecDeque<LogEntry>,
    /// Oldest entries are evicted beyond this many.  `None` = unbounded.
    max_entries: Option<usize>,
}

impl ReadingLog {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    pub fn record(
        &mut self,
        metric: Metric,
        value: impl Into<String>,
        status: MetricStatus,
        at: DateTime<Utc>,
    ) {
        self.entries.push_front(LogEntry {
            metric,
            value: value.into(),
            status,
            at,
        });
        if let Some(cap) = self.max_entries {
            self.entries.truncate(cap);
        }
    }

    /// Record every observation of one reading with a shared timestamp.
    pub fn record_all(&mut self, observations: &[MetricObservation], at: DateTime<Utc>) {
        for o in observations {
            self.record(o.metric, o.formatted.clone(), o.status, at);
        }
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
