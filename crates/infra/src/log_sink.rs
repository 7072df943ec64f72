//! Diagnostics collected during a dispatch.
//!
//! The dispatcher records what happened per target (unresolved connector,
//! failed commit, delivered commit) and flushes the sink once when the fan-out
//! is over, so a hosting application sees one batch per change.

use std::sync::{Arc, Mutex};

use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Debug, message)
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
}

pub trait LogSink: Send + Sync {
    fn record(&self, entry: LogEntry);

    /// Push buffered entries out. With `immediate == false` a sink may keep
    /// buffering until it decides to emit.
    fn flush(&self, immediate: bool);
}

impl<S> LogSink for Arc<S>
where
    S: LogSink + ?Sized,
{
    fn record(&self, entry: LogEntry) {
        (**self).record(entry)
    }

    fn flush(&self, immediate: bool) {
        (**self).flush(immediate)
    }
}

/// Buffers entries and emits them as `tracing` events on flush.
///
/// A deferred flush only emits once `capacity` entries are pending.
#[derive(Debug)]
pub struct TracingLogSink {
    capacity: usize,
    pending: Mutex<Vec<LogEntry>>,
}

impl Default for TracingLogSink {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl TracingLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn emit(entry: &LogEntry) {
        match entry.level {
            LogLevel::Debug => tracing::debug!(target: "commitfeed", "{}", entry.message),
            LogLevel::Info => tracing::info!(target: "commitfeed", "{}", entry.message),
            LogLevel::Warn => tracing::warn!(target: "commitfeed", "{}", entry.message),
            LogLevel::Error => tracing::error!(target: "commitfeed", "{}", entry.message),
        }
    }
}

impl LogSink for TracingLogSink {
    fn record(&self, entry: LogEntry) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(entry);
        }
    }

    fn flush(&self, immediate: bool) {
        let drained = match self.pending.lock() {
            Ok(mut pending) if immediate || pending.len() >= self.capacity => std::mem::take(&mut *pending),
            _ => return,
        };
        for entry in &drained {
            Self::emit(entry);
        }
    }
}

/// Keeps every entry and counts flushes; for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    entries: Mutex<Vec<LogEntry>>,
    flushes: Mutex<Vec<bool>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn entries_at(&self, level: LogLevel) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| entry.level == level)
            .collect()
    }

    /// `immediate` flag of every flush so far, in order.
    pub fn flushes(&self) -> Vec<bool> {
        self.flushes.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes().len()
    }
}

impl LogSink for MemoryLogSink {
    fn record(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    fn flush(&self, immediate: bool) {
        if let Ok(mut flushes) = self.flushes.lock() {
            flushes.push(immediate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_flush_drains_tracing_sink() {
        let sink = TracingLogSink::with_capacity(10);
        sink.record(LogEntry::info("delivered"));
        sink.record(LogEntry::warn("target main unresolved"));
        assert_eq!(sink.pending(), 2);

        sink.flush(true);
        assert_eq!(sink.pending(), 0);
    }

    #[test]
    fn deferred_flush_waits_for_capacity() {
        let sink = TracingLogSink::with_capacity(2);
        sink.record(LogEntry::debug("one"));
        sink.flush(false);
        assert_eq!(sink.pending(), 1);

        sink.record(LogEntry::debug("two"));
        sink.flush(false);
        assert_eq!(sink.pending(), 0);
    }

    #[test]
    fn memory_sink_keeps_entries_and_flushes() {
        let sink = Arc::new(MemoryLogSink::new());
        let shared: Arc<dyn LogSink> = sink.clone();

        shared.record(LogEntry::error("boom"));
        shared.record(LogEntry::info("ok"));
        shared.flush(true);

        assert_eq!(sink.entries().len(), 2);
        assert_eq!(sink.entries_at(LogLevel::Error)[0].message, "boom");
        assert_eq!(sink.flushes(), vec![true]);
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Warn);
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"warn\"");
    }
}
