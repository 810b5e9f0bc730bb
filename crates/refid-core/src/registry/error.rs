use thiserror::Error;

use refid_model::ModelError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("report type already registered: {0}")]
    DuplicateReportType(String),

    #[error("prefix '{prefix}' is already used by report type '{owner}'")]
    DuplicatePrefix { prefix: String, owner: String },

    #[error("invalid registry entry: {0}")]
    Invalid(#[from] ModelError),
}
