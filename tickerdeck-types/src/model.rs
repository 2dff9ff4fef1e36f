//! Canonical payload types every provider maps into.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::StatementKind;

/// One daily OHLCV bar. Series are ordered newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Ticker the bar belongs to.
    pub ticker: String,
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: u64,
}

/// One reported financial statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    /// Ticker the statement belongs to.
    pub ticker: String,
    /// Fiscal period end as reported by the vendor (usually `YYYY-MM-DD`).
    pub fiscal_date_ending: String,
    /// ISO currency code; vendors that omit it default to `USD`.
    pub reported_currency: String,
    /// Line items, shaped by statement type.
    pub lines: StatementLines,
}

impl FinancialStatement {
    /// Statement type of the line items.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        match self.lines {
            StatementLines::Income(_) => StatementKind::Income,
            StatementLines::Balance(_) => StatementKind::Balance,
            StatementLines::Cashflow(_) => StatementKind::Cashflow,
        }
    }

    /// Income line items, if this is an income statement.
    #[must_use]
    pub const fn income(&self) -> Option<&IncomeLines> {
        match &self.lines {
            StatementLines::Income(l) => Some(l),
            _ => None,
        }
    }

    /// Balance sheet line items, if this is a balance sheet.
    #[must_use]
    pub const fn balance(&self) -> Option<&BalanceLines> {
        match &self.lines {
            StatementLines::Balance(l) => Some(l),
            _ => None,
        }
    }

    /// Cash flow line items, if this is a cash flow statement.
    #[must_use]
    pub const fn cashflow(&self) -> Option<&CashflowLines> {
        match &self.lines {
            StatementLines::Cashflow(l) => Some(l),
            _ => None,
        }
    }
}

/// Line items of a statement. Missing vendor values are reported as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statement", rename_all = "lowercase")]
pub enum StatementLines {
    /// Income statement lines.
    Income(IncomeLines),
    /// Balance sheet lines.
    Balance(BalanceLines),
    /// Cash flow lines.
    Cashflow(CashflowLines),
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeLines {
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub operating_income: f64,
    pub net_income: f64,
    pub ebitda: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceLines {
    pub total_assets: f64,
    pub total_current_assets: f64,
    pub total_liabilities: f64,
    pub total_current_liabilities: f64,
    pub total_shareholder_equity: f64,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashflowLines {
    pub operating_cashflow: f64,
    pub capital_expenditures: f64,
    pub cashflow_from_investment: f64,
    pub cashflow_from_financing: f64,
}

/// Keyword-derived tone of a headline and summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// More positive than negative keywords.
    Positive,
    /// Balanced or no keywords.
    Neutral,
    /// More negative than positive keywords.
    Negative,
}

/// One news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Title.
    pub headline: String,
    /// Publisher name or domain.
    pub source: String,
    /// Link to the article.
    pub url: String,
    /// Publication (or first-seen) time.
    pub published_at: DateTime<Utc>,
    /// Vendor summary; falls back to the headline when absent.
    pub summary: String,
    /// Filled in by presentation-side analytics, never by providers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// Company profile and trailing fundamentals.
///
/// Percent-typed fields (margins, returns, growth, yield, payout) hold
/// percentages, e.g. `25.31` for a 25.31% margin.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub average_volume: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub revenue: Option<f64>,
    pub quarterly_revenue_growth: Option<f64>,
    pub quarterly_earnings_growth: Option<f64>,
    pub eps: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub book_value: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub dividend_per_share: Option<f64>,
    pub payout_ratio: Option<f64>,
}

/// Convert a vendor fraction (`0.2531`) into a percentage rounded to two decimals (`25.31`).
#[must_use]
pub fn fraction_to_percent(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round() / 100.0
}
