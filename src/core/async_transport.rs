//! Async transport trait for non-blocking log output
//!
//! Async transports are fire-and-forget: the log call spawns the send onto a
//! Tokio runtime and returns without waiting. Failures can therefore only be
//! reported asynchronously, through the fault callback, and a send that is
//! still in flight when the process exits is lost.

use super::{
    error::{LoggerError, Result},
    log_entry::LogEntry,
    transport::{panic_message, report_to_stderr, FaultCallback, FaultKind, Transport, TransportFault},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Trait for asynchronous log transports
///
/// # Example
///
/// ```no_run
/// use transport_logger::core::{AsyncTransport, LogEntry, Result};
/// use async_trait::async_trait;
///
/// struct Webhook;
///
/// #[async_trait]
/// impl AsyncTransport for Webhook {
///     async fn send(&self, entry: LogEntry, formatted: String) -> Result<()> {
///         // non-blocking delivery
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "webhook"
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncTransport: Send + Sync + 'static {
    /// Deliver an owned copy of the entry and its formatted line
    async fn send(&self, entry: LogEntry, formatted: String) -> Result<()>;

    fn name(&self) -> &str;
}

/// Adapts an [`AsyncTransport`] to the synchronous [`Transport`] contract
///
/// Each `send` spawns a task on the captured runtime handle and returns
/// `Ok(())` immediately. Errors and panics from the task go to the fault
/// callback (stderr by default). There is no completion guarantee before
/// the runtime shuts down.
pub struct SpawnedTransport<T: AsyncTransport> {
    inner: Arc<T>,
    handle: Handle,
    on_fault: FaultCallback,
}

impl<T: AsyncTransport> SpawnedTransport<T> {
    /// Wrap a transport, spawning onto the runtime of the calling context
    ///
    /// # Errors
    ///
    /// Returns `RuntimeUnavailable` when called outside a Tokio runtime.
    pub fn new(inner: T) -> Result<Self> {
        let handle =
            Handle::try_current().map_err(|_| LoggerError::runtime_unavailable(inner.name()))?;
        Ok(Self::with_handle(inner, handle))
    }

    /// Wrap a transport, spawning onto an explicit runtime handle
    pub fn with_handle(inner: T, handle: Handle) -> Self {
        Self {
            inner: Arc::new(inner),
            handle,
            on_fault: Arc::new(report_to_stderr),
        }
    }

    /// Set the callback that receives asynchronous faults
    #[must_use]
    pub fn on_fault(mut self, callback: FaultCallback) -> Self {
        self.on_fault = callback;
        self
    }
}

impl<T: AsyncTransport> Transport for SpawnedTransport<T> {
    fn send(&self, entry: &LogEntry, formatted: &str) -> Result<()> {
        let inner = Arc::clone(&self.inner);
        let on_fault = Arc::clone(&self.on_fault);
        let level = entry.level;
        let entry = entry.clone();
        let formatted = formatted.to_string();

        let task = self.handle.spawn({
            let inner = Arc::clone(&inner);
            let on_fault = Arc::clone(&on_fault);
            async move {
                if let Err(e) = inner.send(entry, formatted).await {
                    on_fault(&TransportFault {
                        index: None,
                        transport: inner.name().to_string(),
                        level,
                        kind: FaultKind::Error(e),
                    });
                }
            }
        });

        // A panicking task surfaces only through its join handle
        self.handle.spawn(async move {
            if let Err(join_error) = task.await {
                if join_error.is_panic() {
                    let payload = join_error.into_panic();
                    on_fault(&TransportFault {
                        index: None,
                        transport: inner.name().to_string(),
                        level,
                        kind: FaultKind::Panic(panic_message(payload.as_ref())),
                    });
                }
            }
        });

        Ok(())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
