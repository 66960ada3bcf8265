//! Transport trait for log output destinations, and per-call fault isolation

use super::{
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A sink for formatted log entries.
///
/// Every accepted log call hands each registered transport the same entry and
/// the same formatted line. Transports may fail; the logger isolates each call
/// so a failing transport never affects the caller or the other transports.
pub trait Transport: Send + Sync {
    fn send(&self, entry: &LogEntry, formatted: &str) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, entry: &LogEntry, formatted: &str) -> Result<()> {
        (**self).send(entry, formatted)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Adapts a closure into a transport
///
/// # Example
///
/// ```
/// use transport_logger::core::{FnTransport, LogEntry, Transport};
///
/// let transport = FnTransport::new("stdout-tagged", |_entry: &LogEntry, line: &str| {
///     println!("[CUSTOM] {}", line);
///     Ok(())
/// });
/// assert_eq!(transport.name(), "stdout-tagged");
/// ```
pub struct FnTransport<F> {
    name: String,
    func: F,
}

impl<F> FnTransport<F>
where
    F: Fn(&LogEntry, &str) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Transport for FnTransport<F>
where
    F: Fn(&LogEntry, &str) -> Result<()> + Send + Sync,
{
    fn send(&self, entry: &LogEntry, formatted: &str) -> Result<()> {
        (self.func)(entry, formatted)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// How a transport call went wrong
#[derive(Debug)]
pub enum FaultKind {
    /// The transport returned an error
    Error(LoggerError),
    /// The transport panicked
    Panic(String),
}

/// A failed transport call, reported to the fault handler instead of the caller
#[derive(Debug)]
pub struct TransportFault {
    /// Position of the transport in registration order, when known
    pub index: Option<usize>,
    pub transport: String,
    pub level: LogLevel,
    pub kind: FaultKind,
}

impl TransportFault {
    pub fn is_panic(&self) -> bool {
        matches!(self.kind, FaultKind::Panic(_))
    }
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "Transport #{} ({})", index, self.transport)?,
            None => write!(f, "Transport ({})", self.transport)?,
        }
        match &self.kind {
            FaultKind::Error(e) => write!(f, " failed: {}", e),
            FaultKind::Panic(msg) => write!(
                f,
                " panicked: {}. Other transports continue to function.",
                msg
            ),
        }
    }
}

/// Callback receiving transport faults
pub type FaultCallback = Arc<dyn Fn(&TransportFault) + Send + Sync>;

/// Default fault handler: one line on stderr
pub fn report_to_stderr(fault: &TransportFault) {
    if fault.is_panic() {
        eprintln!("[LOGGER CRITICAL] {}", fault);
    } else {
        eprintln!("[LOGGER ERROR] {}", fault);
    }
}

/// Invoke one transport, converting an error or a panic into a fault
pub(crate) fn send_isolated(
    index: usize,
    transport: &dyn Transport,
    entry: &LogEntry,
    formatted: &str,
) -> Option<TransportFault> {
    let result = catch_unwind(AssertUnwindSafe(|| transport.send(entry, formatted)));
    into_fault(index, transport, entry.level, result)
}

/// Flush one transport with the same isolation as `send_isolated`
pub(crate) fn flush_isolated(index: usize, transport: &dyn Transport) -> Option<TransportFault> {
    let result = catch_unwind(AssertUnwindSafe(|| transport.flush()));
    into_fault(index, transport, LogLevel::Info, result)
}

fn into_fault(
    index: usize,
    transport: &dyn Transport,
    level: LogLevel,
    result: std::thread::Result<Result<()>>,
) -> Option<TransportFault> {
    let kind = match result {
        Ok(Ok(())) => return None,
        Ok(Err(e)) => FaultKind::Error(e),
        Err(panic_info) => FaultKind::Panic(panic_message(panic_info.as_ref())),
    };

    // name() itself may panic on a broken transport
    let name = catch_unwind(AssertUnwindSafe(|| transport.name().to_string()))
        .unwrap_or_else(|_| "unknown".to_string());

    Some(TransportFault {
        index: Some(index),
        transport: name,
        level,
        kind,
    })
}

pub(crate) fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry() -> LogEntry {
        LogEntry::new(LogLevel::Warn, "disk low", Utc::now())
    }

    #[test]
    fn test_fn_transport_forwards_arguments() {
        let transport = FnTransport::new("check", |entry: &LogEntry, line: &str| {
            assert_eq!(entry.message, "disk low");
            assert_eq!(line, "formatted");
            Ok(())
        });
        assert!(send_isolated(0, &transport, &entry(), "formatted").is_none());
    }

    #[test]
    fn test_error_becomes_fault() {
        let transport = FnTransport::new("failing", |_: &LogEntry, _: &str| {
            Err(LoggerError::other("Simulated failure"))
        });

        let fault = send_isolated(2, &transport, &entry(), "x").expect("fault expected");
        assert_eq!(fault.index, Some(2));
        assert_eq!(fault.transport, "failing");
        assert_eq!(fault.level, LogLevel::Warn);
        assert!(!fault.is_panic());
        assert_eq!(
            fault.to_string(),
            "Transport #2 (failing) failed: Simulated failure"
        );
    }

    #[test]
    fn test_panic_becomes_fault() {
        let transport = FnTransport::new("panicking", |_: &LogEntry, _: &str| -> Result<()> {
            panic!("sink exploded")
        });

        let fault = send_isolated(0, &transport, &entry(), "x").expect("fault expected");
        assert!(fault.is_panic());
        assert!(fault.to_string().contains("sink exploded"));
    }

    #[test]
    fn test_arc_transport_delegates() {
        let transport: Arc<dyn Transport> =
            Arc::new(FnTransport::new("shared", |_: &LogEntry, _: &str| Ok(())));
        assert_eq!(Transport::name(&transport), "shared");
        assert!(flush_isolated(0, &transport).is_none());
    }
}
