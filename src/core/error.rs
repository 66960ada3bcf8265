//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File transport error with path
    #[error("File transport error for '{path}': {message}")]
    FileTransportError { path: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// A transport rejected an entry
    #[error("Transport '{transport}' failed: {message}")]
    TransportError { transport: String, message: String },

    /// No async runtime available to spawn onto
    #[error("No async runtime available for transport '{transport}'")]
    RuntimeUnavailable { transport: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file transport error
    pub fn file_transport(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileTransportError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    /// Create a transport error
    pub fn transport(transport: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::TransportError {
            transport: transport.into(),
            message: message.into(),
        }
    }

    pub fn runtime_unavailable(transport: impl Into<String>) -> Self {
        LoggerError::RuntimeUnavailable {
            transport: transport.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("level", "unrecognized value");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::file_transport("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileTransportError { .. }));

        let err = LoggerError::transport("capture", "closed");
        assert!(matches!(err, LoggerError::TransportError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("mode", "expected 'pretty' or 'json', got 'xml'");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for mode: expected 'pretty' or 'json', got 'xml'"
        );

        let err = LoggerError::file_transport("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File transport error for '/var/log/app.log': Disk full"
        );

        let err = LoggerError::runtime_unavailable("webhook");
        assert_eq!(
            err.to_string(),
            "No async runtime available for transport 'webhook'"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("creating log directory", "cannot create", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("creating log directory"));
        assert!(err.to_string().contains("cannot create"));
    }
}
