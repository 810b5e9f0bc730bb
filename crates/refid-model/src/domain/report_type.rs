use std::{borrow::Borrow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

const MAX_KEY_LEN: usize = 64;

/// Identifier of a report category (e.g. `fatality`, `ill-health`).
///
/// Keys are lowercase kebab-case: ASCII letters, digits and single dashes,
/// starting with a letter. Validation happens on construction, so every
/// `ReportTypeKey` in the system is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportTypeKey(String);

impl ReportTypeKey {
    pub const FATALITY: &'static str = "fatality";
    pub const HOSPITAL_TREATMENT: &'static str = "hospital-treatment";
    pub const ILL_HEALTH: &'static str = "ill-health";
    pub const UNSAFE_ACTIONS: &'static str = "unsafe-actions";

    /// Validate and wrap a key.
    pub fn new(key: impl Into<String>) -> ModelResult<Self> {
        let key = key.into();
        if is_valid_key(&key) {
            Ok(Self(key))
        } else {
            Err(ModelError::InvalidReportType(key))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_key(key: &str) -> bool {
    if key.is_empty() || key.len() > MAX_KEY_LEN {
        return false;
    }
    if !key.starts_with(|c: char| c.is_ascii_lowercase()) || key.ends_with('-') {
        return false;
    }
    if key.contains("--") {
        return false;
    }
    key.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl fmt::Display for ReportTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReportTypeKey {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ReportTypeKey {
    type Error = ModelError;
    fn try_from(s: String) -> ModelResult<Self> {
        Self::new(s)
    }
}

impl From<ReportTypeKey> for String {
    fn from(k: ReportTypeKey) -> Self {
        k.0
    }
}

// Lets maps keyed by `ReportTypeKey` be queried with a plain `&str`.
impl Borrow<str> for ReportTypeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ReportTypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_builtin_keys() {
        for key in [
            ReportTypeKey::FATALITY,
            ReportTypeKey::HOSPITAL_TREATMENT,
            ReportTypeKey::ILL_HEALTH,
            ReportTypeKey::UNSAFE_ACTIONS,
            "near-miss2",
        ] {
            let parsed = ReportTypeKey::new(key);
            assert!(parsed.is_ok(), "expected {key:?} to be valid, got {parsed:?}");
        }
    }

    #[test]
    fn rejects_malformed_keys() {
        let long = "a".repeat(MAX_KEY_LEN + 1);
        let bad = [
            "",
            "Fatality",
            "-fatality",
            "fatality-",
            "ill--health",
            "ill_health",
            "9lives",
            "unsafe actions",
            long.as_str(),
        ];

        for key in bad {
            assert_eq!(
                ReportTypeKey::new(key),
                Err(ModelError::InvalidReportType(key.to_string())),
                "expected {key:?} to be rejected"
            );
        }
    }

    #[test]
    fn serde_is_a_plain_string() {
        let key = ReportTypeKey::new("ill-health").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""ill-health""#);

        let back: ReportTypeKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn serde_rejects_invalid_key() {
        let res = serde_json::from_str::<ReportTypeKey>(r#""Not A Key""#);
        assert!(res.is_err());
    }
}
