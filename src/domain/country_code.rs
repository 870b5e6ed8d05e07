//! Validated two-letter country code.
//!
//! [`CountryCode`] is a newtype around a two-byte ASCII array so that only
//! codes matching `^[A-Z]{2}$` can flow past intake validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{InvalidInputKind, TallyError};

/// ISO-3166 alpha-2 style country code: exactly two uppercase ASCII letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parses a code, accepting only two uppercase ASCII letters.
    ///
    /// No case folding is applied: `"us"` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::InvalidInput`] with
    /// [`InvalidInputKind::InvalidCountryCode`] otherwise.
    pub fn parse(raw: &str) -> Result<Self, TallyError> {
        match raw.as_bytes() {
            &[a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Ok(Self([a, b])),
            _ => Err(TallyError::InvalidInput(
                InvalidInputKind::InvalidCountryCode,
            )),
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII uppercase, so this never fails.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns the flag glyph: the two matching regional-indicator symbols.
    #[must_use]
    pub fn flag(&self) -> String {
        self.0
            .iter()
            .filter_map(|b| char::from_u32(0x1F1E6 + u32::from(b - b'A')))
            .collect()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn accepts_two_uppercase_letters() {
        let Ok(code) = CountryCode::parse("FR") else {
            panic!("FR should parse");
        };
        assert_eq!(code.as_str(), "FR");
        assert_eq!(code.to_string(), "FR");
    }

    #[test]
    fn rejects_malformed_codes() {
        for raw in ["us", "USA", "1A", "", "F", "Fr", "ÉT"] {
            assert!(
                matches!(
                    CountryCode::parse(raw),
                    Err(TallyError::InvalidInput(InvalidInputKind::InvalidCountryCode))
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn flag_uses_regional_indicators() {
        let Ok(code) = CountryCode::parse("JP") else {
            panic!("JP should parse");
        };
        assert_eq!(code.flag(), "\u{1F1EF}\u{1F1F5}");
    }

    #[test]
    fn serializes_as_plain_string() {
        let Ok(code) = CountryCode::parse("DE") else {
            panic!("DE should parse");
        };
        let json = serde_json::to_string(&code).unwrap_or_default();
        assert_eq!(json, "\"DE\"");
        let back: Result<CountryCode, _> = serde_json::from_str("\"de\"");
        assert!(back.is_err());
    }
}
