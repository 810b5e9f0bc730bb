pub mod allocator;
pub mod error;
pub mod metrics;
pub mod pending;
pub mod registry;
pub mod store;

pub use allocator::{AllocContext, Allocator};
pub use error::AllocationError;
pub use metrics::{AllocOutcome, AllocationMetrics, MetricsHandle, NoOpMetrics, noop_metrics};
pub use pending::{PendingAllocation, allocation_view};
pub use registry::{FormatRegistry, RegistryError};
pub use store::{CounterStore, MAX_SEQUENCE, MemoryCounterStore, StoreError, StoreResult};

pub mod prelude {
    pub use crate::allocator::{AllocContext, Allocator};
    pub use crate::error::AllocationError;
    pub use crate::registry::FormatRegistry;
    pub use crate::store::{CounterStore, StoreError};
}
