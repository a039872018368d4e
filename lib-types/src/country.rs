//! Two-letter jurisdiction codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error constructing a [`CountryCode`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    #[error("invalid country code length: expected 2 letters, got {0:?}")]
    InvalidCountryCodeLength(String),
}

/// Two-letter country code ("US", "DE", ...).
///
/// Codes are exactly two ASCII letters; anything else is rejected at parse
/// time so every stored `CountryCode` is well-formed.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a code from its string form.
    pub fn parse(code: &str) -> Result<Self, CountryCodeError> {
        let bytes = code.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return Err(CountryCodeError::InvalidCountryCodeLength(code.to_string()));
        }
        Ok(Self([bytes[0], bytes[1]]))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        // Invariant: constructed from two ASCII letters only.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_code() {
        let code = CountryCode::parse("US").unwrap();
        assert_eq!(code.as_str(), "US");
        assert_eq!(format!("{}", code), "US");
    }

    #[test]
    fn test_parse_rejects_bad_lengths() {
        assert!(matches!(
            CountryCode::parse("USA"),
            Err(CountryCodeError::InvalidCountryCodeLength(_))
        ));
        assert!(matches!(
            CountryCode::parse("U"),
            Err(CountryCodeError::InvalidCountryCodeLength(_))
        ));
        assert!(matches!(
            CountryCode::parse(""),
            Err(CountryCodeError::InvalidCountryCodeLength(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_letters() {
        assert!(CountryCode::parse("U1").is_err());
        assert!(CountryCode::parse("!!").is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let code = CountryCode::parse("DE").unwrap();
        let serialized = bincode::serialize(&code).unwrap();
        let deserialized: CountryCode = bincode::deserialize(&serialized).unwrap();
        assert_eq!(code, deserialized);
    }
}
