use serde::Serialize;

use crate::{
    SequenceValue,
    error::{ModelError, ModelResult},
};

const MAX_PREFIX_LEN: usize = 8;
const MAX_PAD_WIDTH: u8 = 19;

/// Rendering rule for identifiers of one report type.
///
/// Identifiers look like `<prefix>-<zero-padded sequence>`, e.g. `FT-00042`.
/// The pad width must stay fixed for the lifetime of a report type:
/// changing it retroactively breaks the sort order of identifiers already issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierFormat {
    prefix: String,
    pad_width: u8,
}

impl IdentifierFormat {
    /// Create a validated format.
    ///
    /// Prefix: 1-8 uppercase ASCII letters or digits, starting with a letter.
    /// Pad width: 1..=19 digits (the widest zero-padded `u64`).
    pub fn new(prefix: impl Into<String>, pad_width: u8) -> ModelResult<Self> {
        let prefix = prefix.into();
        if !is_valid_prefix(&prefix) {
            return Err(ModelError::InvalidPrefix(prefix));
        }
        if pad_width == 0 || pad_width > MAX_PAD_WIDTH {
            return Err(ModelError::InvalidPadWidth(pad_width));
        }
        Ok(Self { prefix, pad_width })
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn pad_width(&self) -> u8 {
        self.pad_width
    }

    /// Largest sequence value that still fits in `pad_width` digits.
    pub fn max_padded_value(&self) -> SequenceValue {
        10u64.pow(u32::from(self.pad_width)) - 1
    }

    /// Render the identifier for a sequence value.
    ///
    /// Values wider than `pad_width` are written in full, never truncated:
    /// `FT` / 5 renders `100000` as `FT-100000`.
    pub fn render(&self, seq: SequenceValue) -> String {
        format!(
            "{prefix}-{seq:0width$}",
            prefix = self.prefix,
            width = usize::from(self.pad_width)
        )
    }

    /// Parse an identifier rendered in this format back into its sequence value.
    ///
    /// Accepts suffixes of any digit count so that widened identifiers parse too.
    pub fn parse_sequence(&self, identifier: &str) -> ModelResult<SequenceValue> {
        let malformed = || ModelError::MalformedIdentifier(identifier.to_string());

        let suffix = identifier
            .trim()
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(malformed)?;

        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        suffix.parse::<SequenceValue>().map_err(|_| malformed())
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix.len() <= MAX_PREFIX_LEN
        && prefix.starts_with(|c: char| c.is_ascii_uppercase())
        && prefix
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ft() -> IdentifierFormat {
        IdentifierFormat::new("FT", 5).unwrap()
    }

    #[test]
    fn renders_zero_padded_suffix() {
        assert_eq!(ft().render(1), "FT-00001");
        assert_eq!(ft().render(42), "FT-00042");
        assert_eq!(ft().render(99_999), "FT-99999");
    }

    #[test]
    fn widens_instead_of_truncating() {
        assert_eq!(ft().render(100_000), "FT-100000");
        assert_eq!(ft().render(1_234_567), "FT-1234567");
    }

    #[test]
    fn max_padded_value_matches_width() {
        assert_eq!(ft().max_padded_value(), 99_999);
        assert_eq!(IdentifierFormat::new("X", 1).unwrap().max_padded_value(), 9);
        assert_eq!(
            IdentifierFormat::new("X", 19).unwrap().max_padded_value(),
            9_999_999_999_999_999_999
        );
    }

    #[test]
    fn rejects_invalid_prefixes() {
        for prefix in ["", "ft", "F-T", "1FT", "ABCDEFGHI", "F T"] {
            assert_eq!(
                IdentifierFormat::new(prefix, 5),
                Err(ModelError::InvalidPrefix(prefix.to_string())),
                "prefix {prefix:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_invalid_pad_width() {
        assert_eq!(
            IdentifierFormat::new("FT", 0),
            Err(ModelError::InvalidPadWidth(0))
        );
        assert_eq!(
            IdentifierFormat::new("FT", 20),
            Err(ModelError::InvalidPadWidth(20))
        );
    }

    #[test]
    fn parses_rendered_identifiers() {
        let f = ft();
        assert_eq!(f.parse_sequence("FT-00001"), Ok(1));
        assert_eq!(f.parse_sequence("FT-00042"), Ok(42));
        assert_eq!(f.parse_sequence(" FT-100000 "), Ok(100_000));
        assert_eq!(f.parse_sequence(&f.render(777)), Ok(777));
    }

    #[test]
    fn parse_rejects_foreign_or_broken_identifiers() {
        let f = ft();
        for bad in ["HT-00001", "FT00001", "FT-", "FT-12a45", "FT--0001", "", "FT-+1234"] {
            assert_eq!(
                f.parse_sequence(bad),
                Err(ModelError::MalformedIdentifier(bad.to_string())),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(ft()).unwrap();
        assert_eq!(json, serde_json::json!({"prefix": "FT", "padWidth": 5}));
    }
}
