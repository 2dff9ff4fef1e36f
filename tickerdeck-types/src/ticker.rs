use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TickerdeckError;

/// A validated, canonical security identifier (e.g. `AAPL`, `BRK.B`, `005930.KS`).
///
/// Canonical form is trimmed and uppercase, 2 to 10 characters, ASCII letters
/// and digits with at most one internal `.` or `-` separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalize and validate a raw ticker string.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the normalized string is not a valid ticker.
    pub fn parse(raw: &str) -> Result<Self, TickerdeckError> {
        let canonical = raw.trim().to_ascii_uppercase();
        if is_valid(&canonical) {
            Ok(Self(canonical))
        } else {
            Err(TickerdeckError::InvalidArg(format!(
                "invalid ticker format: {raw:?}"
            )))
        }
    }

    /// Canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Variant with `-` replaced by `.`, as expected by vendors that use share-class dots.
    #[must_use]
    pub fn dotted(&self) -> String {
        self.0.replace('-', ".")
    }
}

fn is_valid(s: &str) -> bool {
    if !(2..=10).contains(&s.len()) {
        return false;
    }
    let bytes = s.as_bytes();
    let alnum = |b: u8| b.is_ascii_uppercase() || b.is_ascii_digit();
    if !alnum(bytes[0]) || !alnum(bytes[bytes.len() - 1]) {
        return false;
    }
    let mut separators = 0;
    for &b in bytes {
        if b == b'.' || b == b'-' {
            separators += 1;
        } else if !alnum(b) {
            return false;
        }
    }
    separators <= 1
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = TickerdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerdeckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(Ticker::parse("  aapl ").unwrap().as_str(), "AAPL");
        assert_eq!(Ticker::parse("brk.b").unwrap().as_str(), "BRK.B");
        assert_eq!(Ticker::parse("005930.ks").unwrap().as_str(), "005930.KS");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["A", "", "TOOLONGTICKER", ".AAPL", "AAPL.", "BR.K.B", "AA PL", "AA$"] {
            assert!(Ticker::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn dotted_replaces_hyphen() {
        assert_eq!(Ticker::parse("BRK-B").unwrap().dotted(), "BRK.B");
    }
}
