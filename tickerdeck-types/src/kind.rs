//! Request parameters and the `DataKind` discriminant used for routing and cache keys.

use core::fmt;
use core::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Capability, Ticker, TickerdeckError};

/// Lookback window for price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    /// One week.
    #[serde(rename = "1W")]
    OneWeek,
    /// One month.
    #[serde(rename = "1M")]
    OneMonth,
    /// Three months.
    #[serde(rename = "3M")]
    ThreeMonths,
    /// Six months.
    #[serde(rename = "6M")]
    SixMonths,
    /// One year.
    #[serde(rename = "1Y")]
    OneYear,
    /// Five years.
    #[serde(rename = "5Y")]
    FiveYears,
    /// Everything the vendor has, bounded to twenty years for date-window APIs.
    #[serde(rename = "MAX")]
    Max,
}

impl TimeRange {
    /// All ranges, shortest first.
    pub const ALL: [Self; 7] = [
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::FiveYears,
        Self::Max,
    ];

    /// Wire label, e.g. `"1M"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::Max => "MAX",
        }
    }

    /// First calendar day of the window ending at `today`.
    ///
    /// Months and years are calendar-aware; `Max` reaches back twenty years.
    #[must_use]
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        let back = match self {
            Self::OneWeek => return today.checked_sub_days(Days::new(7)).unwrap_or(today),
            Self::OneMonth => Months::new(1),
            Self::ThreeMonths => Months::new(3),
            Self::SixMonths => Months::new(6),
            Self::OneYear => Months::new(12),
            Self::FiveYears => Months::new(60),
            Self::Max => Months::new(240),
        };
        today.checked_sub_months(back).unwrap_or(NaiveDate::MIN)
    }

    /// Fixed-length cutoff in days for vendors that return more than asked.
    ///
    /// `None` means the full series is kept.
    #[must_use]
    pub const fn cutoff_days(self) -> Option<u64> {
        match self {
            Self::OneWeek => Some(7),
            Self::OneMonth => Some(30),
            Self::ThreeMonths => Some(90),
            Self::SixMonths => Some(180),
            Self::OneYear => Some(365),
            Self::FiveYears => Some(5 * 365),
            Self::Max => None,
        }
    }

    /// Whether a vendor with a compact/full switch needs the full series.
    #[must_use]
    pub const fn needs_full_history(self) -> bool {
        matches!(self, Self::FiveYears | Self::Max)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = TickerdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| TickerdeckError::InvalidArg(format!("invalid range: {s}")))
    }
}

/// Which financial statement is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Income statement.
    Income,
    /// Balance sheet.
    Balance,
    /// Cash flow statement.
    Cashflow,
}

impl StatementKind {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Balance => "balance",
            Self::Cashflow => "cashflow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementKind {
    type Err = TickerdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "balance" => Ok(Self::Balance),
            "cashflow" => Ok(Self::Cashflow),
            _ => Err(TickerdeckError::InvalidArg(
                "invalid statement type; use income, balance, or cashflow".into(),
            )),
        }
    }
}

/// Reporting period of financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Fiscal-year reports.
    #[default]
    Annual,
    /// Quarterly reports.
    Quarterly,
}

impl Period {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = TickerdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            _ => Err(TickerdeckError::InvalidArg(
                "invalid period; use annual or quarterly".into(),
            )),
        }
    }
}

/// Lookback window for news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NewsWindow {
    /// Last 24 hours.
    #[serde(rename = "24h")]
    Day,
    /// Last seven days.
    #[default]
    #[serde(rename = "7d")]
    Week,
    /// Last thirty days.
    #[serde(rename = "30d")]
    Month,
}

impl NewsWindow {
    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }

    /// Window length in days.
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}

impl fmt::Display for NewsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsWindow {
    type Err = TickerdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            _ => Err(TickerdeckError::InvalidArg(
                "invalid window; use 24h, 7d, or 30d".into(),
            )),
        }
    }
}

/// What is being fetched, with every parameter that shapes the upstream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataKind {
    /// Daily bars over a range.
    Price {
        /// Lookback window.
        range: TimeRange,
    },
    /// One statement type for one reporting period.
    Financials {
        /// Statement type.
        statement: StatementKind,
        /// Reporting period.
        period: Period,
    },
    /// News articles over a window.
    News {
        /// Lookback window.
        window: NewsWindow,
    },
    /// Company overview.
    Overview,
}

impl DataKind {
    /// Capability required to serve this kind.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::Price { .. } => Capability::Price,
            Self::Financials { .. } => Capability::Financials,
            Self::News { .. } => Capability::News,
            Self::Overview => Capability::Overview,
        }
    }

    /// Deterministic cache key: discriminant, ticker, then parameters, joined by `|`.
    #[must_use]
    pub fn cache_key(&self, ticker: &Ticker) -> String {
        match self {
            Self::Price { range } => format!("price|{ticker}|{range}"),
            Self::Financials { statement, period } => {
                format!("financials|{ticker}|{statement}|{period}")
            }
            Self::News { window } => format!("news|{ticker}|{window}"),
            Self::Overview => format!("overview|{ticker}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_date_is_calendar_aware() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            TimeRange::OneMonth.start_date(today),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            TimeRange::OneWeek.start_date(today),
            NaiveDate::from_ymd_opt(2024, 3, 24).unwrap()
        );
        assert_eq!(
            TimeRange::Max.start_date(today),
            NaiveDate::from_ymd_opt(2004, 3, 31).unwrap()
        );
    }

    #[test]
    fn parses_wire_labels() {
        assert_eq!("1m".parse::<TimeRange>().unwrap(), TimeRange::OneMonth);
        assert_eq!("MAX".parse::<TimeRange>().unwrap(), TimeRange::Max);
        assert!("2W".parse::<TimeRange>().is_err());
        assert_eq!("cashflow".parse::<StatementKind>().unwrap(), StatementKind::Cashflow);
        assert_eq!("24h".parse::<NewsWindow>().unwrap().days(), 1);
        assert!("monthly".parse::<Period>().is_err());
    }
}
