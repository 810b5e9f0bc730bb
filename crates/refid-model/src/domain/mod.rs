mod report_type;
pub use report_type::ReportTypeKey;

/// Sequence number assigned to a report within its report type.
///
/// Starts at 1 for the first report; 0 means "nothing issued yet".
pub type SequenceValue = u64;
