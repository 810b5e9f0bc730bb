use thiserror::Error;

/// Rejected logger settings, or a failed subscriber install.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// `format` / `REFID_LOG_FORMAT` is not one of text, json, journald.
    #[error("unknown log format '{0}', expected text, json or journald")]
    InvalidFormat(String),

    #[error("journald output requires Linux")]
    JournaldNotSupported,

    /// The journald socket could not be opened.
    #[error("cannot connect to journald: {0}")]
    JournaldInitFailed(String),

    /// A global subscriber is already installed in this process.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("unknown timezone '{0}', expected utc or local")]
    InvalidTimeZone(String),

    /// `level` / `REFID_LOG` is not a valid filter directive.
    #[error("invalid log filter {0}")]
    InvalidLevel(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
