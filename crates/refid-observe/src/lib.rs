//! Logging setup shared by refid binaries.
mod logger;
pub use logger::*;
