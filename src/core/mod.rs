//! Core logger types and traits

#[cfg(feature = "async-transports")]
pub mod async_transport;
pub mod config;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod log_meta;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod timestamp;
pub mod transport;

#[cfg(feature = "async-transports")]
pub use async_transport::{AsyncTransport, SpawnedTransport};
pub use config::{Environment, LoggerConfig, LoggerSettings, APP_ENV_VAR};
pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use log_meta::{FieldValue, LogMeta};
pub use logger::{create_logger, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::{format_json, format_pretty, FormatterConfig, OutputMode};
pub use timestamp::{Clock, FixedClock, MonotonicClock, SystemClock, TimestampFormat};
pub use transport::{report_to_stderr, FaultCallback, FaultKind, FnTransport, Transport, TransportFault};
