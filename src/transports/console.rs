//! Console transport implementation

use crate::core::{LogEntry, Result, Transport};
use std::io::Write;

#[cfg(test)]
use parking_lot::Mutex;
#[cfg(test)]
use std::sync::Arc;

/// Writes each formatted line to the console
///
/// Error and fatal entries go to stderr, everything else to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleTransport {
    #[cfg(test)]
    captured: Option<CapturedStreams>,
}

/// In-memory stand-ins for stdout and stderr
#[cfg(test)]
#[derive(Debug, Clone, Default)]
struct CapturedStreams {
    stdout: Arc<Mutex<Vec<u8>>>,
    stderr: Arc<Mutex<Vec<u8>>>,
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn capturing(streams: CapturedStreams) -> Self {
        Self {
            captured: Some(streams),
        }
    }

    fn write_line(&self, to_stderr: bool, formatted: &str) -> Result<()> {
        #[cfg(test)]
        if let Some(streams) = &self.captured {
            let target = if to_stderr {
                &streams.stderr
            } else {
                &streams.stdout
            };
            writeln!(target.lock(), "{}", formatted)?;
            return Ok(());
        }

        if to_stderr {
            let mut stderr = std::io::stderr().lock();
            writeln!(stderr, "{}", formatted)?;
        } else {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", formatted)?;
        }
        Ok(())
    }
}

impl Transport for ConsoleTransport {
    fn send(&self, entry: &LogEntry, formatted: &str) -> Result<()> {
        // Route Error and Fatal levels to stderr, others to stdout
        self.write_line(entry.level.is_error(), formatted)
    }

    fn flush(&self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
