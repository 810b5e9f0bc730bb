mod identifier;
pub use identifier::IdentifierFormat;

mod allocated;
pub use allocated::AllocatedIdentifier;

mod overflow;
pub use overflow::OverflowPolicy;

mod spec;
pub use spec::ReportTypeSpec;
