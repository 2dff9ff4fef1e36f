use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TickerdeckError;

/// High-level capability labels for routing, errors, and telemetry.
///
/// Each capability has its own primary/secondary provider pair, its own
/// circuit breakers, and its own cache freshness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Daily OHLCV price bars.
    Price,
    /// Income, balance sheet, and cash flow statements.
    Financials,
    /// Recent news articles.
    News,
    /// Company profile and fundamental ratios.
    Overview,
}

impl Capability {
    /// All capabilities, in routing order.
    pub const ALL: [Self; 4] = [Self::Price, Self::Financials, Self::News, Self::Overview];

    /// Stable, lowercase identifier for logs, errors, and cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Financials => "financials",
            Self::News => "news",
            Self::Overview => "overview",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = TickerdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" | "prices" => Ok(Self::Price),
            "financials" | "financial" => Ok(Self::Financials),
            "news" => Ok(Self::News),
            "overview" => Ok(Self::Overview),
            other => Err(TickerdeckError::InvalidArg(format!(
                "unknown capability: {other}"
            ))),
        }
    }
}
