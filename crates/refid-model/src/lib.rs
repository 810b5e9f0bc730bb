mod domain;
pub use domain::{ReportTypeKey, SequenceValue};

mod error;
pub use error::{ModelError, ModelResult};

mod format;
pub use format::{AllocatedIdentifier, IdentifierFormat, OverflowPolicy, ReportTypeSpec};

mod view;
pub use view::{AllocationView, PENDING_PLACEHOLDER};

mod counter;
pub use counter::CounterRecord;
