use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ReportTypeKey, SequenceValue};

/// Identifier handed out by the allocator.
///
/// Immutable once issued. For a given report type, `sequence` values of issued
/// identifiers are strictly increasing and never repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedIdentifier {
    report_type: ReportTypeKey,
    sequence: SequenceValue,
    #[serde(rename = "identifier")]
    value: String,
}

impl AllocatedIdentifier {
    pub fn new(report_type: ReportTypeKey, sequence: SequenceValue, value: String) -> Self {
        Self {
            report_type,
            sequence,
            value,
        }
    }

    pub fn report_type(&self) -> &ReportTypeKey {
        &self.report_type
    }

    /// Numeric suffix of the identifier.
    pub fn sequence(&self) -> SequenceValue {
        self.sequence
    }

    /// Rendered identifier, e.g. `IH-00001`.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for AllocatedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for AllocatedIdentifier {
    fn as_ref(&self) -> &str {
        &self.value
    }
}
