//! Log view model: bounded entry buffer plus the filter controls.

use std::fmt;

use mcphub_core::{DEFAULT_LOG_CAPACITY, LogBuffer, LogEntry, LogLevel};

/// Level filter shown in the log toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelFilter {
    #[default]
    All,
    Only(LogLevel),
}

impl LevelFilter {
    /// Filter choices in toolbar order.
    pub const CHOICES: [Self; 6] = [
        Self::All,
        Self::Only(LogLevel::Info),
        Self::Only(LogLevel::Warn),
        Self::Only(LogLevel::Error),
        Self::Only(LogLevel::Debug),
        Self::Only(LogLevel::Hub),
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Only(level) => level.as_str(),
        }
    }

    /// Next choice, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::CHOICES
            .iter()
            .position(|choice| *choice == self)
            .unwrap_or(0);
        Self::CHOICES[(index + 1) % Self::CHOICES.len()]
    }

    fn admits(self, level: LogLevel) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == level,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Entries plus filter state. Filtering never drops entries; it only
/// changes what [`LogView::visible`] yields.
#[derive(Debug, Clone)]
pub struct LogView {
    buffer: LogBuffer,
    filter: LevelFilter,
    show_debug: bool,
}

impl Default for LogView {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogView {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: LogBuffer::new(capacity),
            filter: LevelFilter::All,
            show_debug: false,
        }
    }

    /// Append an entry, evicting the oldest at capacity.
    pub fn push(&mut self, entry: LogEntry) {
        self.buffer.push(entry);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub const fn filter(&self) -> LevelFilter {
        self.filter
    }

    pub const fn set_filter(&mut self, filter: LevelFilter) {
        self.filter = filter;
    }

    pub fn cycle_filter(&mut self) -> LevelFilter {
        self.filter = self.filter.next();
        self.filter
    }

    pub const fn show_debug(&self) -> bool {
        self.show_debug
    }

    /// Flip the "show DEBUG" toggle. Returns the new value.
    pub const fn toggle_debug(&mut self) -> bool {
        self.show_debug = !self.show_debug;
        self.show_debug
    }

    fn is_visible(&self, entry: &LogEntry) -> bool {
        if entry.level == LogLevel::Debug && !self.show_debug {
            return false;
        }
        self.filter.admits(entry.level)
    }

    /// Entries passing the current filter, oldest first.
    pub fn visible(&self) -> impl DoubleEndedIterator<Item = &LogEntry> {
        self.buffer.iter().filter(|entry| self.is_visible(entry))
    }

    /// Rendered lines passing the current filter.
    pub fn visible_lines(&self) -> Vec<String> {
        self.visible().map(LogEntry::render).collect()
    }

    /// Total retained entries, visible or not.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_all_levels() -> LogView {
        let mut view = LogView::new(100);
        for level in LogLevel::ALL {
            view.push(LogEntry::new(level, format!("{level} line")));
        }
        view
    }

    fn visible_levels(view: &LogView) -> Vec<LogLevel> {
        view.visible().map(|entry| entry.level).collect()
    }

    #[test]
    fn debug_is_hidden_until_toggled() {
        let mut view = view_with_all_levels();
        assert!(!visible_levels(&view).contains(&LogLevel::Debug));
        assert_eq!(view.len(), 5);

        assert!(view.toggle_debug());
        assert!(visible_levels(&view).contains(&LogLevel::Debug));
    }

    #[test]
    fn level_filter_shows_one_level() {
        let mut view = view_with_all_levels();
        view.set_filter(LevelFilter::Only(LogLevel::Hub));
        assert_eq!(visible_levels(&view), [LogLevel::Hub]);

        // DEBUG filter still needs the toggle.
        view.set_filter(LevelFilter::Only(LogLevel::Debug));
        assert!(visible_levels(&view).is_empty());
        view.toggle_debug();
        assert_eq!(visible_levels(&view), [LogLevel::Debug]);
    }

    #[test]
    fn filter_cycles_through_every_choice() {
        let mut filter = LevelFilter::All;
        let mut labels = Vec::new();
        for _ in 0..LevelFilter::CHOICES.len() {
            labels.push(filter.label());
            filter = filter.next();
        }
        assert_eq!(labels, ["ALL", "INFO", "WARN", "ERROR", "DEBUG", "HUB"]);
        assert_eq!(filter, LevelFilter::All);
    }

    #[test]
    fn clear_drops_everything() {
        let mut view = view_with_all_levels();
        view.clear();
        assert!(view.is_empty());
        assert!(view.visible_lines().is_empty());
    }

    #[test]
    fn retention_is_bounded() {
        let mut view = LogView::new(3);
        for i in 0..5 {
            view.push(LogEntry::hub(format!("line {i}")));
        }
        let messages: Vec<&str> = view.visible().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn lines_use_bracketed_format() {
        let mut view = LogView::new(10);
        view.push(LogEntry::warn("Config file not found: /x"));
        let line = &view.visible_lines()[0];
        assert!(line.ends_with("] [WARN] Config file not found: /x"));
        assert!(line.starts_with('['));
    }
}
