//! Main logger implementation

use super::{
    config::{Environment, LoggerConfig},
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    log_meta::LogMeta,
    metrics::LoggerMetrics,
    output_format::{FormatterConfig, OutputMode},
    timestamp::{Clock, MonotonicClock, SystemClock, TimestampFormat},
    transport::{flush_isolated, report_to_stderr, send_isolated, FaultCallback, Transport, TransportFault},
};
use crate::transports::ConsoleTransport;
use parking_lot::{ReentrantMutex, RwLock};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Transports plus everything shared between a logger and its children
struct Pipeline {
    transports: Vec<Box<dyn Transport>>,
    /// Serializes fan-out across threads; re-entrant so a transport that logs
    /// through the same logger on the same thread does not deadlock.
    dispatch_lock: ReentrantMutex<()>,
    metrics: LoggerMetrics,
    on_fault: FaultCallback,
}

impl Pipeline {
    /// Hand one entry to every transport, in registration order
    ///
    /// **Per-Transport Isolation**: each call is wrapped separately, so an
    /// error or a panic in one transport is reported and the remaining
    /// transports still receive the entry.
    fn dispatch(&self, entry: &LogEntry, formatted: &str) {
        let _guard = self.dispatch_lock.lock();
        self.metrics.record_dispatched();

        let mut faults = 0;
        for (idx, transport) in self.transports.iter().enumerate() {
            if let Some(fault) = send_isolated(idx, transport.as_ref(), entry, formatted) {
                faults += 1;
                self.report(&fault);
            }
        }

        self.metrics.record_faults(faults);
    }

    fn flush(&self) -> Option<TransportFault> {
        let _guard = self.dispatch_lock.lock();
        let mut first_fault = None;

        for (idx, transport) in self.transports.iter().enumerate() {
            if let Some(fault) = flush_isolated(idx, transport.as_ref()) {
                self.report(&fault);
                first_fault.get_or_insert(fault);
            }
        }

        first_fault
    }

    fn report(&self, fault: &TransportFault) {
        if catch_unwind(AssertUnwindSafe(|| (self.on_fault)(fault))).is_err() {
            eprintln!(
                "[LOGGER CRITICAL] Fault handler panicked while reporting: {}",
                fault
            );
        }
    }
}

/// A leveled logger dispatching to pluggable transports
///
/// Leveled methods never fail and never panic on behalf of a transport:
/// filtered calls are free, accepted calls are formatted once and handed to
/// every transport, and transport faults go to the fault handler.
///
/// # Example
///
/// ```
/// use transport_logger::prelude::*;
///
/// let memory = MemoryTransport::new();
/// let logger = Logger::builder()
///     .min_level(LogLevel::Warn)
///     .mode(OutputMode::Json)
///     .transport(memory.clone())
///     .build();
///
/// logger.debug("x");
/// logger.warn("y");
/// logger.error_with_meta("z", LogMeta::new().with_field("code", 500));
///
/// assert_eq!(memory.len(), 2);
/// ```
pub struct Logger {
    level: RwLock<LogLevel>,
    mode: OutputMode,
    formatter: FormatterConfig,
    context: Option<String>,
    clock: MonotonicClock,
    pipeline: Arc<Pipeline>,
}

impl Logger {
    /// Build a logger from a configuration, filling unset fields from `environment`
    pub fn from_config(config: LoggerConfig, environment: &Environment) -> Self {
        let mode = config.mode.unwrap_or_else(|| environment.default_mode());
        let formatter = FormatterConfig::new()
            .with_timestamp_format(config.timestamp_format.unwrap_or_default())
            .with_colors(config.colors.unwrap_or_else(|| environment.colors_supported()));

        let transports = config
            .transports
            .unwrap_or_else(|| vec![Box::new(ConsoleTransport::new()) as Box<dyn Transport>]);
        let clock = config
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        Self {
            level: RwLock::new(config.level.unwrap_or_default()),
            mode,
            formatter,
            context: config.context,
            clock: MonotonicClock::new(clock),
            pipeline: Arc::new(Pipeline {
                transports,
                dispatch_lock: ReentrantMutex::new(()),
                metrics: LoggerMetrics::new(),
                on_fault: config
                    .on_fault
                    .unwrap_or_else(|| Arc::new(report_to_stderr) as FaultCallback),
            }),
        }
    }

    /// Build a logger from `LOG_*` variables and the detected environment
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when a variable holds an unrecognized value.
    pub fn from_env() -> Result<Self> {
        let config = super::config::LoggerSettings::from_env()?.into_config()?;
        Ok(Self::from_config(config, &Environment::detect()))
    }

    /// Whether a call at `level` would pass the current threshold
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.rank() >= self.level.read().rank()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, meta: Option<LogMeta>) {
        if !self.is_enabled(level) {
            return;
        }

        let mut entry = LogEntry::new(level, message, self.clock.now());
        entry.context = self.context.clone();
        entry.meta = meta;

        let formatted = self.mode.format(&entry, &self.formatter);
        self.pipeline.dispatch(&entry, &formatted);
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message, None);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, None);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message, None);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message, None);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message, None);
    }

    pub fn trace_with_meta(&self, message: impl Into<String>, meta: LogMeta) {
        self.log(LogLevel::Trace, message, Some(meta));
    }

    pub fn debug_with_meta(&self, message: impl Into<String>, meta: LogMeta) {
        self.log(LogLevel::Debug, message, Some(meta));
    }

    pub fn info_with_meta(&self, message: impl Into<String>, meta: LogMeta) {
        self.log(LogLevel::Info, message, Some(meta));
    }

    pub fn warn_with_meta(&self, message: impl Into<String>, meta: LogMeta) {
        self.log(LogLevel::Warn, message, Some(meta));
    }

    pub fn error_with_meta(&self, message: impl Into<String>, meta: LogMeta) {
        self.log(LogLevel::Error, message, Some(meta));
    }

    pub fn fatal_with_meta(&self, message: impl Into<String>, meta: LogMeta) {
        self.log(LogLevel::Fatal, message, Some(meta));
    }

    /// Replace the threshold of this instance
    ///
    /// Children already derived keep their own threshold.
    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn formatter_config(&self) -> &FormatterConfig {
        &self.formatter
    }

    pub fn transport_count(&self) -> usize {
        self.pipeline.transports.len()
    }

    /// Derive an independent logger carrying `context`
    ///
    /// The child shares mode and transports with `self` and starts from the
    /// current threshold; later `set_level` calls on either side do not
    /// affect the other.
    #[must_use]
    pub fn with_context(&self, context: impl Into<String>) -> Logger {
        Logger {
            level: RwLock::new(self.level()),
            mode: self.mode,
            formatter: self.formatter,
            context: Some(context.into()),
            clock: self.clock.fork(),
            pipeline: Arc::clone(&self.pipeline),
        }
    }

    /// Get the logger metrics, shared with every derived child
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.pipeline.metrics
    }

    /// Flush every transport
    ///
    /// Every transport is flushed even when an earlier one fails; faults are
    /// reported to the fault handler and the first one is returned.
    pub fn flush(&self) -> Result<()> {
        match self.pipeline.flush() {
            None => Ok(()),
            Some(fault) => Err(LoggerError::transport(fault.transport.clone(), fault.to_string())),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use transport_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .mode(OutputMode::Pretty)
    ///     .build();
    /// assert_eq!(logger.level(), LogLevel::Debug);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::from_config(LoggerConfig::default(), &Environment::default())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("mode", &self.mode)
            .field("context", &self.context)
            .field("transports", &self.transport_count())
            .finish()
    }
}

/// Create a logger from a configuration and the process environment defaults
///
/// # Example
/// ```
/// use transport_logger::prelude::*;
///
/// let logger = create_logger(
///     LoggerConfig {
///         level: Some(LogLevel::Warn),
///         ..Default::default()
///     },
///     &Environment::production(),
/// );
/// assert_eq!(logger.mode(), OutputMode::Json);
/// ```
pub fn create_logger(config: LoggerConfig, environment: &Environment) -> Logger {
    Logger::from_config(config, environment)
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use transport_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .transport(ConsoleTransport::new())
///     .context("Worker")
///     .on_fault(Arc::new(|fault: &TransportFault| {
///         eprintln!("ALERT: {}", fault);
///     }))
///     .build();
/// ```
#[derive(Default)]
pub struct LoggerBuilder {
    config: LoggerConfig,
    environment: Environment,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.config.mode = Some(mode);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.config.context = Some(context.into());
        self
    }

    /// Add a transport
    ///
    /// The first call replaces the default console transport.
    #[must_use = "builder methods return a new value"]
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.config
            .transports
            .get_or_insert_with(Vec::new)
            .push(Box::new(transport));
        self
    }

    /// Register no transports at all; every entry is discarded
    #[must_use = "builder methods return a new value"]
    pub fn no_transports(mut self) -> Self {
        self.config.transports = Some(Vec::new());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.config.colors = Some(colors);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = Some(format);
        self
    }

    /// Set a callback for transport faults
    ///
    /// The callback replaces the default stderr report.
    #[must_use = "builder methods return a new value"]
    pub fn on_fault(mut self, callback: FaultCallback) -> Self {
        self.config.on_fault = Some(callback);
        self
    }

    /// Set the time source
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.config.clock = Some(clock);
        self
    }

    /// Set the environment used for unset defaults
    #[must_use = "builder methods return a new value"]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger::from_config(self.config, &self.environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, FnTransport};
    use crate::transports::MemoryTransport;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory_logger(level: LogLevel) -> (Logger, MemoryTransport) {
        let memory = MemoryTransport::new();
        let logger = Logger::builder()
            .min_level(level)
            .mode(OutputMode::Json)
            .transport(memory.clone())
            .build();
        (logger, memory)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build();

        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.mode(), OutputMode::Pretty);
        assert_eq!(logger.transport_count(), 1);
        assert!(logger.context().is_none());
    }

    #[test]
    fn test_production_environment_selects_json() {
        let logger = Logger::builder()
            .environment(Environment::production())
            .no_transports()
            .build();
        assert_eq!(logger.mode(), OutputMode::Json);

        let logger = Logger::builder()
            .environment(Environment::production())
            .mode(OutputMode::Pretty)
            .no_transports()
            .build();
        assert_eq!(logger.mode(), OutputMode::Pretty);
    }

    #[test]
    fn test_empty_transport_list_is_legal() {
        let logger = Logger::builder().no_transports().build();
        logger.fatal("vanishes");
        assert_eq!(logger.transport_count(), 0);
        assert_eq!(logger.metrics().total_dispatched(), 1);
    }

    #[test]
    fn test_filtered_calls_reach_no_transport() {
        let (logger, memory) = memory_logger(LogLevel::Warn);

        logger.debug("x");
        logger.warn("y");
        logger.error("z");

        let messages: Vec<String> = memory.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["y", "z"]);
        assert_eq!(logger.metrics().total_dispatched(), 2);
    }

    #[test]
    fn test_filtered_calls_do_not_read_the_clock() {
        struct CountingClock(AtomicUsize);
        impl Clock for CountingClock {
            fn now(&self) -> chrono::DateTime<Utc> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Utc::now()
            }
        }

        let clock = Arc::new(CountingClock(AtomicUsize::new(0)));
        let logger = Logger::builder()
            .min_level(LogLevel::Error)
            .clock(clock.clone())
            .no_transports()
            .build();

        logger.trace("a");
        logger.info("b");
        assert_eq!(clock.0.load(Ordering::SeqCst), 0);

        logger.error("c");
        assert_eq!(clock.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_level_applies_to_later_calls() {
        let (logger, memory) = memory_logger(LogLevel::Info);

        logger.debug("debug 1");
        assert_eq!(memory.len(), 0);

        logger.set_level(LogLevel::Debug);
        logger.debug("debug 2");
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.entries()[0].message, "debug 2");
    }

    #[test]
    fn test_child_threshold_is_independent() {
        let (parent, memory) = memory_logger(LogLevel::Info);
        let child = parent.with_context("Child");

        child.set_level(LogLevel::Trace);
        parent.debug("parent debug");
        child.debug("child debug");
        assert_eq!(memory.len(), 1);

        parent.set_level(LogLevel::Error);
        assert_eq!(child.level(), LogLevel::Trace);
    }

    #[test]
    fn test_child_copies_threshold_at_derivation() {
        let (parent, _memory) = memory_logger(LogLevel::Warn);
        let child = parent.with_context("A");
        parent.set_level(LogLevel::Trace);
        assert_eq!(child.level(), LogLevel::Warn);
    }

    #[test]
    fn test_context_propagation() {
        let (logger, memory) = memory_logger(LogLevel::Trace);
        let auth = logger.with_context("AuthService");

        auth.info("user logged in");
        logger.info("root message");

        let entries = memory.entries();
        assert_eq!(entries[0].context.as_deref(), Some("AuthService"));
        assert_eq!(entries[1].context, None);
        assert_eq!(auth.mode(), logger.mode());
        assert_eq!(auth.transport_count(), logger.transport_count());
    }

    #[test]
    fn test_with_context_replaces_existing_context() {
        let logger = Logger::builder().context("Outer").no_transports().build();
        let inner = logger.with_context("Inner");
        assert_eq!(logger.context(), Some("Outer"));
        assert_eq!(inner.context(), Some("Inner"));
    }

    #[test]
    fn test_every_transport_gets_identical_pair() {
        let first = MemoryTransport::new();
        let second = MemoryTransport::new();
        let logger = Logger::builder()
            .transport(first.clone())
            .transport(second.clone())
            .build();

        logger.info_with_meta("hello", LogMeta::new().with_field("a", 1));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first.captured(), second.captured());
    }

    #[test]
    fn test_failing_transport_is_isolated() {
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);
        let memory = MemoryTransport::new();

        let logger = Logger::builder()
            .transport(FnTransport::new("failing", |_: &LogEntry, _: &str| {
                Err(LoggerError::other("Simulated failure"))
            }))
            .transport(FnTransport::new("panicking", |_: &LogEntry, _: &str| -> Result<()> {
                panic!("Simulated panic")
            }))
            .transport(memory.clone())
            .on_fault(Arc::new(move |_fault: &TransportFault| {
                reported_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .build();

        logger.info("still delivered");

        assert_eq!(memory.len(), 1);
        assert_eq!(reported.load(Ordering::SeqCst), 2);
        assert_eq!(logger.metrics().transport_faults(), 2);
        assert_eq!(logger.metrics().faulted_entries(), 1);
    }

    #[test]
    fn test_panicking_fault_handler_is_contained() {
        let memory = MemoryTransport::new();
        let logger = Logger::builder()
            .transport(FnTransport::new("failing", |_: &LogEntry, _: &str| {
                Err(LoggerError::other("boom"))
            }))
            .transport(memory.clone())
            .on_fault(Arc::new(|_fault: &TransportFault| panic!("handler broke")))
            .build();

        logger.warn("survives");
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_reentrant_logging_does_not_deadlock() {
        let memory = MemoryTransport::new();
        let memory_clone = memory.clone();

        let logger = Arc::new_cyclic(|weak: &std::sync::Weak<Logger>| {
            let weak = weak.clone();
            Logger::builder()
                .min_level(LogLevel::Trace)
                .transport(FnTransport::new("echo", move |entry: &LogEntry, _: &str| {
                    if !entry.message.starts_with("echo") {
                        if let Some(inner) = weak.upgrade() {
                            inner.trace(format!("echo: {}", entry.message));
                        }
                    }
                    Ok(())
                }))
                .transport(memory_clone)
                .build()
        });

        logger.info("ping");

        let messages: Vec<String> = memory.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["echo: ping", "ping"]);
    }

    #[test]
    fn test_timestamps_are_non_decreasing() {
        let start = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let memory = MemoryTransport::new();
        let logger = Logger::builder()
            .clock(clock.clone())
            .transport(memory.clone())
            .build();

        logger.info("first");
        clock.set(start - chrono::Duration::seconds(30));
        logger.info("second");

        let entries = memory.entries();
        assert!(entries[1].timestamp >= entries[0].timestamp);
    }

    #[test]
    fn test_flush_reports_first_fault() {
        struct BadFlush;
        impl Transport for BadFlush {
            fn send(&self, _: &LogEntry, _: &str) -> Result<()> {
                Ok(())
            }
            fn flush(&self) -> Result<()> {
                Err(LoggerError::other("flush failed"))
            }
            fn name(&self) -> &str {
                "bad-flush"
            }
        }

        let logger = Logger::builder()
            .transport(BadFlush)
            .transport(MemoryTransport::new())
            .on_fault(Arc::new(|_: &TransportFault| {}))
            .build();

        let err = logger.flush().unwrap_err();
        assert!(err.to_string().contains("bad-flush"));
    }

    #[test]
    fn test_logger_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Logger>();
    }
}
