//! Derived presentations of fetched data.
//!
//! Each view carries the provider that served the underlying fetch.

use chrono::NaiveDate;
use serde::Serialize;
use tickerdeck_core::analytics::{PriceSummary, QualityScore, StatementMetrics, ValueScore};
use tickerdeck_core::{
    FinancialStatement, NewsArticle, NewsWindow, Overview, Period, PriceBar, ProviderId,
    StatementKind, Ticker, TimeRange,
};

/// Price bars with their headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceView {
    /// Requested ticker.
    pub ticker: Ticker,
    /// Requested lookback.
    pub range: TimeRange,
    /// Provider that served the data.
    pub provider: ProviderId,
    /// Newest first.
    pub bars: Vec<PriceBar>,
    /// Current price and changes.
    pub summary: PriceSummary,
}

/// One ticker's closes indexed to 100 at the start of the range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    /// Requested ticker.
    pub ticker: Ticker,
    /// Provider that served the data.
    pub provider: ProviderId,
    /// Oldest first, aligned with `normalized`.
    pub dates: Vec<NaiveDate>,
    /// Closes over the first close, times 100.
    pub normalized: Vec<f64>,
}

/// Statements of one kind plus the metrics derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialsView {
    /// Requested ticker.
    pub ticker: Ticker,
    /// Statement type.
    pub statement: StatementKind,
    /// Reporting period.
    pub period: Period,
    /// Provider that served the data.
    pub provider: ProviderId,
    /// Most recent first.
    pub statements: Vec<FinancialStatement>,
    /// Ratios from the latest statement.
    pub metrics: StatementMetrics,
}

/// De-duplicated articles tagged with sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsView {
    /// Requested ticker.
    pub ticker: Ticker,
    /// Requested lookback.
    pub window: NewsWindow,
    /// Provider that served the data.
    pub provider: ProviderId,
    /// Articles left after de-duplication.
    pub count: usize,
    /// Tagged articles.
    pub articles: Vec<NewsArticle>,
}

/// Company overview with quality and value scores.
///
/// A score is `None` when too few of its inputs are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    /// Requested ticker.
    pub ticker: Ticker,
    /// Provider that served the data.
    pub provider: ProviderId,
    /// Profile and trailing fundamentals.
    pub overview: Overview,
    /// Business quality score.
    pub quality: Option<QualityScore>,
    /// Valuation score.
    pub value: Option<ValueScore>,
}
