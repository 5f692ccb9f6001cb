//! Log entries shown in the manager's log view.
//!
//! Entries come from two places: lines the hub writes to stdout/stderr
//! (tagged [`LogLevel::Hub`]) and status messages produced by the manager
//! itself. Retention is bounded by a ring buffer.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Default number of entries retained before the oldest are evicted.
pub const DEFAULT_LOG_CAPACITY: usize = 5000;

/// Severity tag of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
    /// A line of output captured from the hub process.
    Hub,
}

impl LogLevel {
    /// All levels in the order the filter menu lists them.
    pub const ALL: [Self; 5] = [Self::Info, Self::Warn, Self::Error, Self::Debug, Self::Hub];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
            Self::Hub => "HUB",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the log view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Capture time (local clock).
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }

    pub fn hub(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Hub, message)
    }

    /// Render as `[HH:MM:SS] [LEVEL] message`.
    pub fn render(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.level,
            self.message
        )
    }
}

/// Ring buffer of log entries, removing the oldest once at capacity.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogBuffer {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
        }
    }

    /// Add an entry, returning the evicted entry when the buffer was full.
    pub fn push(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_evicts_oldest_at_capacity() {
        let mut buffer = LogBuffer::new(2);
        assert!(buffer.push(LogEntry::info("one")).is_none());
        assert!(buffer.push(LogEntry::info("two")).is_none());

        let evicted = buffer.push(LogEntry::info("three")).unwrap();
        assert_eq!(evicted.message, "one");

        let messages: Vec<_> = buffer.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn zero_capacity_keeps_latest_entry() {
        let mut buffer = LogBuffer::new(0);
        buffer.push(LogEntry::info("a"));
        buffer.push(LogEntry::info("b"));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.iter().next().unwrap().message, "b");
    }

    #[test]
    fn render_uses_bracketed_format() {
        let entry = LogEntry::hub("listening on 3000");
        let line = entry.render();
        assert!(line.ends_with("[HUB] listening on 3000"));
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[9..10], "]");
    }
}
