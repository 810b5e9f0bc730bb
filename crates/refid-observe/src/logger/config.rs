use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::{
    error::LoggerResult,
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Environment variable overriding [`LoggerConfig::level`].
pub const ENV_LOG_LEVEL: &str = "REFID_LOG";
/// Environment variable overriding [`LoggerConfig::format`].
pub const ENV_LOG_FORMAT: &str = "REFID_LOG_FORMAT";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Filter expression, e.g. `"info"` or `"refid_core=debug,info"`.
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Include module/target names.
    pub with_targets: bool,
    /// Colored output (only honoured on a terminal).
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Color only when enabled in config and stdout is a terminal.
    ///
    /// Evaluate at logger initialization, not at config parsing.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }

    /// Apply `REFID_LOG` / `REFID_LOG_FORMAT` on top of this config.
    pub fn with_env_overrides(self) -> LoggerResult<Self> {
        self.with_overrides(
            std::env::var(ENV_LOG_LEVEL).ok().as_deref(),
            std::env::var(ENV_LOG_FORMAT).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, level: Option<&str>, format: Option<&str>) -> LoggerResult<Self> {
        if let Some(level) = level.filter(|s| !s.trim().is_empty()) {
            self.level = level.parse()?;
        }
        if let Some(format) = format.filter(|s| !s.trim().is_empty()) {
            self.format = format.parse()?;
        }
        Ok(self)
    }
}
