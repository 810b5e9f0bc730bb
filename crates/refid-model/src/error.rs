use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid report type key: {0:?}")]
    InvalidReportType(String),

    #[error("invalid identifier prefix: {0:?} (expected 1-8 uppercase letters/digits)")]
    InvalidPrefix(String),

    #[error("invalid pad width: {0} (expected 1..=19)")]
    InvalidPadWidth(u8),

    #[error("malformed identifier: {0:?}")]
    MalformedIdentifier(String),

    #[error("unknown overflow policy: {0}")]
    UnknownOverflowPolicy(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
