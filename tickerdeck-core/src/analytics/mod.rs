//! Pure metric computations over canonical payloads.
//!
//! Nothing here performs I/O; the orchestrator applies these to fetched data
//! when building views.

pub mod indicators;
pub mod news;
pub mod portfolio;
pub mod prices;
pub mod scores;
pub mod statements;

pub use indicators::{IndicatorPoint, sma, sma_values};
pub use news::{annotate, dedupe, fingerprint, sentiment};
pub use portfolio::{Holding, HoldingPnl, PortfolioTotals, allocation, totals};
pub use prices::{PriceSummary, chronological, normalize, summarize};
pub use scores::{
    Grade, QualityBreakdown, QualityScore, Score, ValueBreakdown, ValueScore, quality_score,
    sub_score, value_score,
};
pub use statements::{
    BalanceMetrics, CashflowMetrics, IncomeMetrics, StatementMetrics, balance_metrics,
    cashflow_metrics, income_metrics,
};
