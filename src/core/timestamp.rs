//! Timestamp formatting and time sources
//!
//! Provides the ISO 8601 formats used in log output, plus the `Clock`
//! abstraction the logger reads call-time timestamps from.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Timestamp format options
///
/// Both variants are ISO 8601 in UTC with a trailing `Z`.
///
/// # Examples
///
/// ```
/// use transport_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Iso8601.format(&ts), "2025-01-08T10:30:45.000Z");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    ///
    /// Provides higher precision for ordering bursts of entries.
    Iso8601Micros,
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
        }
    }
}

/// Source of call-time timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `Utc::now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock, for deterministic output in tests
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(at),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.current.lock() = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut current = self.current.lock();
        *current += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

/// Per-logger view of a clock that never goes backwards
///
/// Wall clocks can step back (NTP adjustments); sequential calls on one
/// logger instance must still observe non-decreasing timestamps, so a
/// reading older than the last one handed out is clamped to it.
pub struct MonotonicClock {
    source: Arc<dyn Clock>,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl MonotonicClock {
    pub fn new(source: Arc<dyn Clock>) -> Self {
        Self {
            source,
            last: Mutex::new(None),
        }
    }

    /// A fresh monotonic view over the same underlying source
    pub fn fork(&self) -> Self {
        Self::new(Arc::clone(&self.source))
    }

    pub fn now(&self) -> DateTime<Utc> {
        let reading = self.source.now();
        let mut last = self.last.lock();
        match *last {
            Some(previous) if reading < previous => previous,
            _ => {
                *last = Some(reading);
                reading
            }
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicClock")
            .field("last", &*self.last.lock())
            .finish()
    }
}
