//! In-memory capture transport

use crate::core::{LogEntry, Result, Transport};
use parking_lot::Mutex;
use std::sync::Arc;

/// Captures every (entry, formatted line) pair it receives
///
/// Clones share the same buffer, so a clone can be handed to a logger while
/// the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    captured: Arc<Mutex<Vec<(LogEntry, String)>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured pairs, in arrival order
    pub fn captured(&self) -> Vec<(LogEntry, String)> {
        self.captured.lock().clone()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.captured
            .lock()
            .iter()
            .map(|(entry, _)| entry.clone())
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.captured
            .lock()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.captured.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.lock().is_empty()
    }

    pub fn clear(&self) {
        self.captured.lock().clear();
    }
}

impl Transport for MemoryTransport {
    fn send(&self, entry: &LogEntry, formatted: &str) -> Result<()> {
        self.captured
            .lock()
            .push((entry.clone(), formatted.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
