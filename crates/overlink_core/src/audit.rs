//! Bounded, timestamped audit trail

use crate::clock::Clock;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of retained audit entries
pub const DEFAULT_AUDIT_CAPACITY: usize = 100;

/// In-memory audit trail.
///
/// Entries are formatted as `[<RFC 3339 timestamp>] <message>`. Once the
/// capacity is reached the oldest entry is dropped for every new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl AuditLog {
    /// Create an empty log holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_AUDIT_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    /// Append a message stamped with the clock's current time
    pub fn record(&mut self, clock: &dyn Clock, message: impl AsRef<str>) {
        let stamp = clock.now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let entry = format!("[{}] {}", stamp, message.as_ref());
        log::debug!("audit: {}", entry);
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// All retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The newest `count` entries, oldest first
    pub fn recent(&self, count: usize) -> Vec<String> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Change the capacity, dropping the oldest entries if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[test]
    fn test_entry_format() {
        let clock = FixedClock::epoch();
        let mut log = AuditLog::default();
        log.record(&clock, "Validation hook added: texture_validator");

        assert_eq!(
            log.last(),
            Some("[1970-01-01T00:00:00.000Z] Validation hook added: texture_validator")
        );
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let clock = FixedClock::epoch();
        let mut log = AuditLog::new(100);
        for i in 0..105 {
            log.record(&clock, format!("entry {}", i));
        }

        assert_eq!(log.len(), 100);
        assert!(log.entries().next().unwrap().ends_with("entry 5"));
        assert!(log.last().unwrap().ends_with("entry 104"));
    }

    #[test]
    fn test_recent() {
        let clock = FixedClock::epoch();
        let mut log = AuditLog::new(10);
        for i in 0..3 {
            log.record(&clock, format!("entry {}", i));
        }

        let recent = log.recent(5);
        assert_eq!(recent.len(), 3);
        let recent = log.recent(2);
        assert!(recent[0].ends_with("entry 1"));
        assert!(recent[1].ends_with("entry 2"));
    }
}
