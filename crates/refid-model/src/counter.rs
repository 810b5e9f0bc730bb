use serde::{Deserialize, Serialize};

use crate::{ReportTypeKey, SequenceValue};

/// Last sequence value assigned for a report type.
///
/// Owned by a counter store, which is the only writer. A record starts at 0
/// (implicitly, on the first allocation) and only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRecord {
    pub report_type: ReportTypeKey,
    pub last_value: SequenceValue,
}

impl CounterRecord {
    pub fn new(report_type: ReportTypeKey, last_value: SequenceValue) -> Self {
        Self {
            report_type,
            last_value,
        }
    }

    /// `true` if nothing has been issued for this report type yet.
    pub fn is_fresh(&self) -> bool {
        self.last_value == 0
    }
}
