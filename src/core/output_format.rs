//! Output modes and the formatters behind them
//!
//! - Pretty: single human-readable line, optionally colorized
//! - Json: single-line JSON object for log collectors
//!
//! Formatters are pure: the same entry and config always produce the same text.

use super::log_entry::LogEntry;
use super::log_meta::LogMeta;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output mode of a logger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Human-readable text format (default outside production)
    ///
    /// Example: `INFO  2025-01-08T10:30:45.123Z [Auth] Request processed {"id":7}`
    #[default]
    Pretty,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"info","message":"Request processed","timestamp":"2025-01-08T10:30:45.123Z"}`
    Json,
}

impl OutputMode {
    /// Format a log entry according to this mode
    pub fn format(&self, entry: &LogEntry, config: &FormatterConfig) -> String {
        match self {
            OutputMode::Pretty => format_pretty(entry, config),
            OutputMode::Json => format_json(entry, config),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Pretty => "pretty",
            OutputMode::Json => "json",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(OutputMode::Pretty),
            "json" => Ok(OutputMode::Json),
            _ => Err(format!("Invalid output mode: '{}' (expected 'pretty' or 'json')", s)),
        }
    }
}

/// Formatting options shared by a logger and its children
///
/// # Examples
///
/// ```
/// use transport_logger::core::{FormatterConfig, TimestampFormat};
///
/// let config = FormatterConfig::new()
///     .with_timestamp_format(TimestampFormat::Iso8601Micros)
///     .with_colors(false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatterConfig {
    /// Timestamp format for both modes
    pub timestamp_format: TimestampFormat,
    /// Whether pretty output carries ANSI color sequences
    pub colors: bool,
}

impl FormatterConfig {
    /// Create a new formatter configuration with default values (no colors)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }
}

/// Format an entry as a single human-readable line
///
/// Layout: `<LEVEL padded to 5> <timestamp>[ [context]] <message>[ <meta json>]`.
/// Control characters in the message and context are escaped so that one
/// entry always stays on one line.
pub fn format_pretty(entry: &LogEntry, config: &FormatterConfig) -> String {
    let level_str = format!("{:5}", entry.level.to_str());
    let level_str = if config.colors {
        colorize_level(entry, level_str)
    } else {
        level_str
    };

    let mut output = format!(
        "{} {}",
        level_str,
        config.timestamp_format.format(&entry.timestamp)
    );

    if let Some(context) = entry.context_label() {
        output.push_str(" [");
        output.push_str(&escape_control(context));
        output.push(']');
    }

    output.push(' ');
    output.push_str(&escape_control(&entry.message));

    if let Some(meta) = entry.non_empty_meta() {
        output.push(' ');
        output.push_str(&meta_json(meta));
    }

    output
}

/// Format an entry as a single-line JSON object
///
/// `context` and `meta` keys are omitted entirely when absent or empty.
pub fn format_json(entry: &LogEntry, config: &FormatterConfig) -> String {
    let line = JsonLine {
        level: entry.level.as_str(),
        message: &entry.message,
        timestamp: config.timestamp_format.format(&entry.timestamp),
        context: entry.context_label(),
        meta: entry.non_empty_meta(),
    };

    serde_json::to_string(&line).unwrap_or_default()
}

#[derive(Serialize)]
struct JsonLine<'a> {
    level: &'static str,
    message: &'a str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a LogMeta>,
}

fn meta_json(meta: &LogMeta) -> String {
    serde_json::to_string(meta).unwrap_or_default()
}

#[cfg(feature = "console")]
fn colorize_level(entry: &LogEntry, level_str: String) -> String {
    use colored::Colorize;

    let colored = level_str.color(entry.level.color_code());
    match entry.level.background_code() {
        Some(background) => colored.on_color(background).to_string(),
        None => colored.to_string(),
    }
}

#[cfg(not(feature = "console"))]
fn colorize_level(_entry: &LogEntry, level_str: String) -> String {
    level_str
}

/// Escape newlines, carriage returns and tabs to prevent log injection
fn escape_control(text: &str) -> String {
    if !text.contains(['\n', '\r', '\t']) {
        return text.to_string();
    }
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
