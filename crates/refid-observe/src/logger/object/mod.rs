mod format;
mod level;
mod timestamp;

pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub use timestamp::{LoggerTimeZone, LoggerTimestamp, init_local_offset};
