//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Metadata can be
//! attached with a leading `meta = ...;` clause.
//!
//! # Examples
//!
//! ```
//! use transport_logger::prelude::*;
//! use transport_logger::{info, meta};
//!
//! let logger = Logger::builder().no_transports().build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With metadata
//! info!(logger, meta = meta! { "port" => port, "tls" => true }; "Listener ready");
//! ```

/// Build a [`LogMeta`](crate::LogMeta) from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use transport_logger::meta;
///
/// let meta = meta! { "user_id" => 123, "action" => "login" };
/// assert_eq!(meta.len(), 2);
/// ```
#[macro_export]
macro_rules! meta {
    () => {
        $crate::LogMeta::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::LogMeta::new()$(.with_field($key, $value))+
    };
}

/// Log a message with automatic formatting.
///
/// The level is checked first: a filtered call neither formats its arguments
/// nor evaluates the `meta` expression.
///
/// # Examples
///
/// ```
/// # use transport_logger::prelude::*;
/// # let logger = Logger::builder().no_transports().build();
/// use transport_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, meta = $meta:expr; $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+), Some($meta));
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+), None);
        }
    }};
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use transport_logger::prelude::*;
/// # let logger = Logger::builder().min_level(LogLevel::Trace).no_transports().build();
/// use transport_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use transport_logger::prelude::*;
/// # let logger = Logger::builder().no_transports().build();
/// use transport_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{FieldValue, LogLevel, Logger, OutputMode};
    use crate::transports::MemoryTransport;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn capture() -> (Logger, MemoryTransport) {
        let memory = MemoryTransport::new();
        let logger = Logger::builder()
            .min_level(LogLevel::Trace)
            .mode(OutputMode::Json)
            .transport(memory.clone())
            .build();
        (logger, memory)
    }

    #[test]
    fn test_log_macro() {
        let (logger, memory) = capture();
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);

        let messages: Vec<String> = memory.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["Test message", "Formatted: 42"]);
    }

    #[test]
    fn test_leveled_macros() {
        let (logger, memory) = capture();
        trace!(logger, "Value: {}", 10);
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");

        let levels: Vec<LogLevel> = memory.entries().into_iter().map(|e| e.level).collect();
        assert_eq!(levels, LogLevel::ALL.to_vec());
    }

    #[test]
    fn test_meta_clause() {
        let (logger, memory) = capture();
        warn!(logger, meta = meta! { "attempt" => 3 }; "Retrying {}", "upload");

        let entry = &memory.entries()[0];
        assert_eq!(entry.message, "Retrying upload");
        assert_eq!(
            entry.meta.as_ref().and_then(|m| m.get("attempt")),
            Some(&FieldValue::Int(3))
        );
    }

    #[test]
    fn test_filtered_macro_skips_formatting() {
        struct Counted<'a>(&'a AtomicUsize);
        impl fmt::Display for Counted<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                f.write_str("counted")
            }
        }

        let renders = AtomicUsize::new(0);
        let meta_built = AtomicUsize::new(0);
        let memory = MemoryTransport::new();
        let logger = Logger::builder()
            .min_level(LogLevel::Error)
            .transport(memory.clone())
            .build();

        debug!(logger, "value {}", Counted(&renders));
        info!(
            logger,
            meta = {
                meta_built.fetch_add(1, Ordering::SeqCst);
                meta! { "k" => 1 }
            };
            "value {}",
            Counted(&renders)
        );
        assert_eq!(renders.load(Ordering::SeqCst), 0);
        assert_eq!(meta_built.load(Ordering::SeqCst), 0);
        assert!(memory.is_empty());

        error!(logger, "value {}", Counted(&renders));
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(memory.entries()[0].message, "value counted");
    }

    #[test]
    fn test_macro_accepts_shared_logger() {
        let memory = MemoryTransport::new();
        let logger = std::sync::Arc::new(Logger::builder().transport(memory.clone()).build());
        warn!(logger, "through {}", "arc");
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_empty_meta_macro() {
        assert!(meta! {}.is_empty());
    }
}
