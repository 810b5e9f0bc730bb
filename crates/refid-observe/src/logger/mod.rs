mod config;
mod error;
mod log;
mod object;

pub use config::{ENV_LOG_FORMAT, ENV_LOG_LEVEL, LoggerConfig};
pub use error::LoggerError;
pub use object::LoggerFormat;
pub use object::LoggerLevel;
pub use object::{LoggerTimeZone, init_local_offset};

/// Installs the global tracing subscriber described by `cfg`.
///
/// Call once, early in `main`. A second call fails with [`LoggerError::AlreadyInitialized`].
///
/// With [`LoggerTimeZone::Local`], call [`init_local_offset`] before the tokio
/// runtime starts any threads.
///
/// # Examples
/// ```rust
/// use refid_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("logger");
/// tracing::info!("allocator starting");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
