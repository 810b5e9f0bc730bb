use thiserror::Error;

use refid_model::SequenceValue;

/// Failure reported by a [`crate::CounterStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store unreachable, or the read-increment-write did not commit.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Incrementing would move the counter past the requested ceiling.
    /// The counter is left unchanged.
    #[error("counter for '{report_type}' is exhausted at ceiling {ceiling}")]
    Exhausted {
        report_type: String,
        ceiling: SequenceValue,
    },

    /// Persisted counter state cannot be interpreted.
    #[error("corrupt counter state: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
