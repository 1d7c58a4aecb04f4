//! Combat log - player-facing battle messages
//!
//! Entries are kept in order for the caller, optionally forwarded to an
//! external [`LogSink`], and mirrored to `tracing`.

use serde::{Deserialize, Serialize};

/// Message severity, used by the caller to colour/filter lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Good,
    Warn,
    Danger,
    System,
}

/// A single combat log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// External consumer of combat log lines (UI, file, network...)
pub trait LogSink {
    fn log(&mut self, entry: &LogEntry);
}

/// Ordered combat log
#[derive(Default)]
pub struct CombatLog {
    entries: Vec<LogEntry>,
    sink: Option<Box<dyn LogSink>>,
}

impl std::fmt::Debug for CombatLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatLog")
            .field("entries", &self.entries.len())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl CombatLog {
    /// Create a new empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every entry to `sink` as well
    pub fn with_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Record a message
    pub fn log(&mut self, message: impl Into<String>, severity: Severity) {
        self.push(LogEntry {
            message: message.into(),
            severity,
            meta: None,
        });
    }

    /// Record a message with structured metadata
    pub fn log_with_meta(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        meta: serde_json::Value,
    ) {
        self.push(LogEntry {
            message: message.into(),
            severity,
            meta: Some(meta),
        });
    }

    fn push(&mut self, entry: LogEntry) {
        match entry.severity {
            Severity::Warn | Severity::Danger => {
                tracing::warn!(severity = ?entry.severity, "{}", entry.message)
            }
            _ => tracing::debug!(severity = ?entry.severity, "{}", entry.message),
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.log(&entry);
        }
        self.entries.push(entry);
    }

    /// All entries in order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Count entries whose message contains `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        self.entries.iter().filter(|e| e.message.contains(needle)).count()
    }

    /// Remove and return all entries
    pub fn drain(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
