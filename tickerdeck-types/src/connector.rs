//! Provider identity types usable across crates.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::TickerdeckError;

/// Name tag attached to every successful result so callers can observe provenance.
///
/// Also used as the key in routing configuration and in the circuit breaker registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProviderId(pub &'static str);

impl ProviderId {
    /// Finnhub: prices and company news.
    pub const FINNHUB: Self = Self("finnhub");
    /// Stooq: end-of-day price CSV, no key required.
    pub const STOOQ: Self = Self("stooq");
    /// Financial Modeling Prep: statements and overview.
    pub const FMP: Self = Self("fmp");
    /// Alpha Vantage: prices, statements, and overview.
    pub const ALPHA_VANTAGE: Self = Self("alpha_vantage");
    /// GDELT document API: news, no key required.
    pub const GDELT: Self = Self("gdelt");

    /// Every built-in vendor.
    pub const BUILTIN: [Self; 5] = [
        Self::FINNHUB,
        Self::STOOQ,
        Self::FMP,
        Self::ALPHA_VANTAGE,
        Self::GDELT,
    ];

    /// Construct a new provider id from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the inner static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Resolve a configuration string to one of the built-in vendors.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the name does not match a built-in vendor.
    pub fn parse_builtin(name: &str) -> Result<Self, TickerdeckError> {
        let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::BUILTIN
            .into_iter()
            .find(|p| p.0 == wanted)
            .ok_or_else(|| TickerdeckError::InvalidArg(format!("unknown provider: {name}")))
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    /// Only built-in vendor names can be deserialized; custom ids exist in code only.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::parse_builtin(&name).map_err(serde::de::Error::custom)
    }
}

impl From<ProviderId> for &'static str {
    fn from(k: ProviderId) -> Self {
        k.0
    }
}
