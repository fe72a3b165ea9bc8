//! Message log — the user-facing log panel, newest line first.

use std::collections::VecDeque;

use relaydash_domain::time::{self, Timestamp};

/// Number of lines kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// One line of the log panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: Timestamp,
    pub text: String,
}

impl LogEntry {
    /// Wall-clock time of the entry (`HH:MM:SS`).
    #[must_use]
    pub fn clock(&self) -> String {
        time::clock(self.at)
    }
}

/// Bounded ring buffer of [`LogEntry`]s.
///
/// Pushing past capacity drops the oldest entry. Storage grows with the
/// entries, not with the capacity.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MessageLog {
    /// Create an empty log keeping at most `capacity` entries (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append a line stamped with the current time.
    pub fn push(&mut self, text: impl Into<String>) {
        self.push_at(time::now(), text);
    }

    /// Append a line with an explicit timestamp.
    pub fn push_at(&mut self, at: Timestamp, text: impl Into<String>) {
        self.entries.push_front(LogEntry {
            at,
            text: text.into(),
        });
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
