use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// What happens when a sequence value no longer fits in the pad width.
///
/// - `Widen`: render all digits (`FT-100000`); identifiers keep sorting
///   numerically but not lexically across the width boundary.
/// - `Reject`: refuse to allocate past `10^pad_width - 1`; the counter is not
///   advanced and callers get a counter-overflow error until the format is
///   reconfigured.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverflowPolicy {
    #[default]
    Widen,
    Reject,
}

impl OverflowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowPolicy::Widen => "widen",
            OverflowPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverflowPolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "widen" => Ok(OverflowPolicy::Widen),
            "reject" => Ok(OverflowPolicy::Reject),
            other => Err(ModelError::UnknownOverflowPolicy(other.to_string())),
        }
    }
}
