use serde::{Deserialize, Serialize};

use crate::{IdentifierFormat, ReportTypeKey, error::ModelResult};

/// Declarative registry entry: one report type and how its identifiers look.
///
/// This is the shape used in configuration files:
/// `{"key": "fatality", "prefix": "FT", "padWidth": 5}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTypeSpec {
    pub key: String,
    pub prefix: String,
    #[serde(default = "default_pad_width")]
    pub pad_width: u8,
}

const DEFAULT_PAD_WIDTH: u8 = 5;

fn default_pad_width() -> u8 {
    DEFAULT_PAD_WIDTH
}

impl ReportTypeSpec {
    pub fn new(key: impl Into<String>, prefix: impl Into<String>, pad_width: u8) -> Self {
        Self {
            key: key.into(),
            prefix: prefix.into(),
            pad_width,
        }
    }

    /// Report types shipped with the application.
    pub fn builtin() -> Vec<ReportTypeSpec> {
        vec![
            Self::new(ReportTypeKey::FATALITY, "FT", DEFAULT_PAD_WIDTH),
            Self::new(ReportTypeKey::HOSPITAL_TREATMENT, "HT", DEFAULT_PAD_WIDTH),
            Self::new(ReportTypeKey::ILL_HEALTH, "IH", DEFAULT_PAD_WIDTH),
            Self::new(ReportTypeKey::UNSAFE_ACTIONS, "UA", DEFAULT_PAD_WIDTH),
        ]
    }

    /// Validate into a typed key and format.
    pub fn resolve(&self) -> ModelResult<(ReportTypeKey, IdentifierFormat)> {
        let key = ReportTypeKey::new(self.key.clone())?;
        let format = IdentifierFormat::new(self.prefix.clone(), self.pad_width)?;
        Ok((key, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelError;

    #[test]
    fn builtin_specs_resolve() {
        let specs = ReportTypeSpec::builtin();
        assert_eq!(specs.len(), 4);

        let prefixes: Vec<_> = specs
            .iter()
            .map(|s| s.resolve().unwrap().1.prefix().to_string())
            .collect();
        assert_eq!(prefixes, ["FT", "HT", "IH", "UA"]);
    }

    #[test]
    fn pad_width_defaults_to_five() {
        let spec: ReportTypeSpec =
            serde_json::from_str(r#"{"key": "near-miss", "prefix": "NM"}"#).unwrap();
        assert_eq!(spec.pad_width, 5);
    }

    #[test]
    fn resolve_reports_first_invalid_field() {
        let spec = ReportTypeSpec::new("Near Miss", "NM", 5);
        assert_eq!(
            spec.resolve(),
            Err(ModelError::InvalidReportType("Near Miss".into()))
        );

        let spec = ReportTypeSpec::new("near-miss", "nm", 5);
        assert_eq!(spec.resolve(), Err(ModelError::InvalidPrefix("nm".into())));
    }
}
