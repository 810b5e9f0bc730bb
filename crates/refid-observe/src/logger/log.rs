use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::logger::{
    config::LoggerConfig,
    error::{LoggerError, LoggerResult},
    object::LoggerTimestamp,
};

/// Human-readable text output.
pub(crate) fn logger_text(cfg: &LoggerConfig) -> LoggerResult<()> {
    let fmt_layer = fmt::layer()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(LoggerTimestamp::new(cfg.tz));

    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(fmt_layer);
    init_subscriber(subscriber)
}

/// One JSON object per event, for log collectors.
pub(crate) fn logger_json(cfg: &LoggerConfig) -> LoggerResult<()> {
    let fmt_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(true)
        .with_target(cfg.with_targets)
        .with_timer(LoggerTimestamp::new(cfg.tz));

    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(fmt_layer);
    init_subscriber(subscriber)
}

#[cfg(target_os = "linux")]
pub(crate) fn logger_journald(cfg: &LoggerConfig) -> LoggerResult<()> {
    let journald =
        tracing_journald::layer().map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))?;

    let subscriber = tracing_subscriber::registry()
        .with(cfg.level.to_env_filter())
        .with(journald);
    init_subscriber(subscriber)
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn logger_journald(_cfg: &LoggerConfig) -> LoggerResult<()> {
    Err(LoggerError::JournaldNotSupported)
}

fn init_subscriber<S>(subscriber: S) -> LoggerResult<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}
