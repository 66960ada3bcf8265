//! Log entry structure

use super::log_level::LogLevel;
use super::log_meta::LogMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log record, built once per accepted log call.
///
/// Entries are handed to formatters and transports by shared reference and are
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<LogMeta>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
            context: None,
            meta: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_meta(mut self, meta: LogMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Context label, if set and non-empty
    pub fn context_label(&self) -> Option<&str> {
        self.context.as_deref().filter(|c| !c.is_empty())
    }

    /// Metadata, if set and non-empty
    pub fn non_empty_meta(&self) -> Option<&LogMeta> {
        self.meta.as_ref().filter(|m| !m.is_empty())
    }
}
