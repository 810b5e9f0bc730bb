//! Identifier format registry: report type -> prefix and pad width.
//!
//! Lookups are pure; adding a report type is a `register` call and never
//! touches the allocation logic.
mod error;
pub use error::RegistryError;

use std::collections::BTreeMap;

use refid_model::{IdentifierFormat, ReportTypeKey, ReportTypeSpec};
use tracing::debug;

use crate::error::AllocationError;

/// Registered identifier formats, ordered by report type key.
///
/// Invariants:
/// - one format per report type;
/// - a prefix belongs to exactly one report type.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: BTreeMap<ReportTypeKey, IdentifierFormat>,
}

impl FormatRegistry {
    /// Create an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            formats: BTreeMap::new(),
        }
    }

    /// Registry with the built-in report types (`FT`, `HT`, `IH`, `UA`).
    pub fn builtin() -> Self {
        Self::from_specs(&ReportTypeSpec::builtin())
            .expect("built-in report types must have valid, distinct keys and prefixes")
    }

    /// Build a registry from declarative entries, validating every one.
    pub fn from_specs(specs: &[ReportTypeSpec]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for spec in specs {
            let (key, format) = spec.resolve()?;
            registry.register(key, format)?;
        }
        Ok(registry)
    }

    /// Register a new report type.
    pub fn register(
        &mut self,
        key: ReportTypeKey,
        format: IdentifierFormat,
    ) -> Result<(), RegistryError> {
        if self.formats.contains_key(&key) {
            return Err(RegistryError::DuplicateReportType(key.to_string()));
        }
        if let Some((owner, _)) = self
            .formats
            .iter()
            .find(|(_, existing)| existing.prefix() == format.prefix())
        {
            return Err(RegistryError::DuplicatePrefix {
                prefix: format.prefix().to_string(),
                owner: owner.to_string(),
            });
        }

        debug!(report_type = %key, prefix = format.prefix(), pad_width = format.pad_width(), "report type registered");
        self.formats.insert(key, format);
        Ok(())
    }

    /// Resolve the format for a report type.
    ///
    /// Unregistered and syntactically invalid keys both yield
    /// [`AllocationError::UnknownReportType`].
    pub fn format_for(
        &self,
        report_type: &str,
    ) -> Result<(&ReportTypeKey, &IdentifierFormat), AllocationError> {
        self.formats
            .get_key_value(report_type)
            .ok_or_else(|| AllocationError::UnknownReportType(report_type.to_string()))
    }

    /// Returns `true` if the report type is registered.
    pub fn contains(&self, report_type: &str) -> bool {
        self.formats.contains_key(report_type)
    }

    /// Iterate over registered report types in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ReportTypeKey, &IdentifierFormat)> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
