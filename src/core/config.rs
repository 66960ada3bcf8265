//! Logger configuration
//!
//! - `Environment`: process-level defaults, detected once at startup
//! - `LoggerConfig`: typed, all-optional configuration handed to the factory
//! - `LoggerSettings`: string-typed settings from JSON or environment variables,
//!   validated into a `LoggerConfig`

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    output_format::OutputMode,
    timestamp::{Clock, TimestampFormat},
    transport::{FaultCallback, Transport},
};
use serde::Deserialize;
use std::fmt;
use std::io::IsTerminal;
use std::sync::Arc;

/// Variable whose value `production` switches the default mode to JSON
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Process-level defaults the factory falls back on
///
/// Resolve this once (usually with [`Environment::detect`]) and pass it to
/// the factory; the logger itself never reads the process environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Environment {
    production: bool,
    colors: bool,
}

impl Environment {
    /// Read `APP_ENV`, `NO_COLOR` and the stdout terminal status
    pub fn detect() -> Self {
        let production = std::env::var(APP_ENV_VAR)
            .map(|value| value.trim().eq_ignore_ascii_case("production"))
            .unwrap_or(false);
        let colors = std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();

        Self { production, colors }
    }

    /// Production environment: JSON output, no colors
    pub const fn production() -> Self {
        Self {
            production: true,
            colors: false,
        }
    }

    /// Development environment: pretty output, no colors
    pub const fn development() -> Self {
        Self {
            production: false,
            colors: false,
        }
    }

    #[must_use]
    pub const fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub const fn is_production(&self) -> bool {
        self.production
    }

    pub const fn colors_supported(&self) -> bool {
        self.colors
    }

    /// Mode used when the configuration leaves it unset
    pub const fn default_mode(&self) -> OutputMode {
        if self.production {
            OutputMode::Json
        } else {
            OutputMode::Pretty
        }
    }
}

/// Typed logger configuration; every field is optional
///
/// | field | default |
/// |---|---|
/// | `level` | `Info` |
/// | `mode` | [`Environment::default_mode`] |
/// | `transports` | one `ConsoleTransport` |
/// | `colors` | [`Environment::colors_supported`] |
/// | `on_fault` | one line on stderr |
#[derive(Default)]
pub struct LoggerConfig {
    pub level: Option<LogLevel>,
    pub mode: Option<OutputMode>,
    pub context: Option<String>,
    /// `Some(vec![])` is legal and discards every entry
    pub transports: Option<Vec<Box<dyn Transport>>>,
    pub colors: Option<bool>,
    pub timestamp_format: Option<TimestampFormat>,
    pub on_fault: Option<FaultCallback>,
    pub clock: Option<Arc<dyn Clock>>,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("level", &self.level)
            .field("mode", &self.mode)
            .field("context", &self.context)
            .field(
                "transports",
                &self
                    .transports
                    .as_ref()
                    .map(|t| t.iter().map(|t| t.name().to_string()).collect::<Vec<_>>()),
            )
            .field("colors", &self.colors)
            .field("timestamp_format", &self.timestamp_format)
            .field("on_fault", &self.on_fault.is_some())
            .field("clock", &self.clock.is_some())
            .finish()
    }
}

/// Unvalidated settings, as found in config files or environment variables
///
/// # Example
///
/// ```
/// use transport_logger::core::LoggerSettings;
///
/// let config = LoggerSettings::from_json(r#"{"level": "debug", "mode": "json"}"#)
///     .and_then(LoggerSettings::into_config)
///     .unwrap();
/// assert!(config.level.is_some());
///
/// let bad = LoggerSettings::from_json(r#"{"level": "verbose"}"#)
///     .and_then(LoggerSettings::into_config);
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerSettings {
    pub level: Option<String>,
    pub mode: Option<String>,
    pub context: Option<String>,
    pub colors: Option<bool>,
    /// `millis` (default) or `micros`
    pub timestamp: Option<String>,
}

impl LoggerSettings {
    /// Variable names read by [`LoggerSettings::from_env`]
    pub const LEVEL_VAR: &'static str = "LOG_LEVEL";
    pub const MODE_VAR: &'static str = "LOG_MODE";
    pub const CONTEXT_VAR: &'static str = "LOG_CONTEXT";
    pub const COLORS_VAR: &'static str = "LOG_COLORS";
    pub const TIMESTAMP_VAR: &'static str = "LOG_TIMESTAMP";

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from `LOG_LEVEL`, `LOG_MODE`, `LOG_CONTEXT`, `LOG_COLORS`
    /// and `LOG_TIMESTAMP`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let colors = match lookup(Self::COLORS_VAR) {
            Some(raw) => Some(parse_bool(&raw).ok_or_else(|| {
                LoggerError::config(
                    Self::COLORS_VAR,
                    format!("expected a boolean, got '{}'", raw),
                )
            })?),
            None => None,
        };

        Ok(Self {
            level: lookup(Self::LEVEL_VAR),
            mode: lookup(Self::MODE_VAR),
            context: lookup(Self::CONTEXT_VAR),
            colors,
            timestamp: lookup(Self::TIMESTAMP_VAR),
        })
    }

    /// Validate into a typed configuration
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for an unrecognized level, mode or timestamp.
    pub fn into_config(self) -> Result<LoggerConfig> {
        let level = self
            .level
            .map(|raw| raw.parse::<LogLevel>())
            .transpose()
            .map_err(|e| LoggerError::config("level", e))?;

        let mode = self
            .mode
            .map(|raw| raw.parse::<OutputMode>())
            .transpose()
            .map_err(|e| LoggerError::config("mode", e))?;

        let timestamp_format = self
            .timestamp
            .map(|raw| parse_timestamp_format(&raw))
            .transpose()?;

        Ok(LoggerConfig {
            level,
            mode,
            context: self.context,
            colors: self.colors,
            timestamp_format,
            ..LoggerConfig::default()
        })
    }
}

impl TryFrom<LoggerSettings> for LoggerConfig {
    type Error = LoggerError;

    fn try_from(settings: LoggerSettings) -> Result<Self> {
        settings.into_config()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_timestamp_format(raw: &str) -> Result<TimestampFormat> {
    match raw.trim().to_lowercase().as_str() {
        "millis" | "iso8601" => Ok(TimestampFormat::Iso8601),
        "micros" | "iso8601micros" => Ok(TimestampFormat::Iso8601Micros),
        _ => Err(LoggerError::config(
            "timestamp",
            format!("expected 'millis' or 'micros', got '{}'", raw),
        )),
    }
}
