//! # Transport Logger
//!
//! A lightweight, pluggable structured logger.
//!
//! ## Features
//!
//! - **Leveled Filtering**: six ordered severities, threshold adjustable at runtime
//! - **Two Output Modes**: human-readable pretty lines or single-line JSON
//! - **Pluggable Transports**: console, file, in-memory, closures and async sinks
//! - **Fault Isolation**: a failing transport never breaks the caller or its siblings
//! - **Child Loggers**: derive independent loggers carrying a context label
//!
//! ## Example
//!
//! ```
//! use transport_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Debug)
//!     .mode(OutputMode::Json)
//!     .build();
//!
//! let auth = logger.with_context("AuthService");
//! auth.warn_with_meta("Suspicious login attempt", LogMeta::new().with_field("ip", "192.168.1.1"));
//! ```

pub mod core;
pub mod macros;
pub mod transports;

pub mod prelude {
    #[cfg(feature = "async-transports")]
    pub use crate::core::{AsyncTransport, SpawnedTransport};
    pub use crate::core::{
        create_logger, format_json, format_pretty, Clock, Environment, FaultCallback, FaultKind, FieldValue, FixedClock,
        FnTransport, FormatterConfig, LogEntry, LogLevel, LogMeta, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, LoggerSettings, OutputMode, Result,
        TimestampFormat, Transport, TransportFault,
    };
    pub use crate::transports::{ConsoleTransport, FileTransport, MemoryTransport};
}

#[cfg(feature = "async-transports")]
pub use crate::core::{AsyncTransport, SpawnedTransport};
pub use crate::core::{
    create_logger, format_json, format_pretty, Clock, Environment, FaultCallback, FaultKind, FieldValue, FixedClock,
    FnTransport, FormatterConfig, LogEntry, LogLevel, LogMeta, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, LoggerSettings, OutputMode, Result,
    TimestampFormat, Transport, TransportFault,
};
pub use transports::{ConsoleTransport, FileTransport, MemoryTransport};
