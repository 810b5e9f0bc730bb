use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

use crate::logger::error::LoggerError;

/// Local offset captured once at startup.
static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Timezone used for log timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggerTimeZone {
    #[default]
    Utc,
    Local,
}

impl LoggerTimeZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerTimeZone::Utc => "utc",
            LoggerTimeZone::Local => "local",
        }
    }

    fn offset(&self) -> UtcOffset {
        match self {
            LoggerTimeZone::Utc => UtcOffset::UTC,
            LoggerTimeZone::Local => local_offset(),
        }
    }
}

impl FromStr for LoggerTimeZone {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(LoggerError::InvalidTimeZone(s.to_string())),
        }
    }
}

impl fmt::Display for LoggerTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LoggerTimeZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LoggerTimeZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Detects and caches the local UTC offset.
///
/// Call in `main()` before the tokio runtime starts: offset detection fails
/// once the process has more than one thread on most Unix platforms.
/// Falls back to UTC when detection fails.
pub fn init_local_offset() {
    let _ = LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC));
}

fn local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

/// RFC3339 timer for `tracing_subscriber::fmt`.
#[derive(Debug, Clone, Copy)]
pub struct LoggerTimestamp {
    tz: LoggerTimeZone,
}

impl LoggerTimestamp {
    pub fn new(tz: LoggerTimeZone) -> Self {
        Self { tz }
    }

    fn render(&self, at: OffsetDateTime) -> String {
        at.to_offset(self.tz.offset())
            .format(&Rfc3339)
            .unwrap_or_else(|_| "<invalid-time>".to_string())
    }
}

impl FormatTime for LoggerTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{} ", self.render(OffsetDateTime::now_utc()))
    }
}
