use tickerdeck_core::analytics::{
    StatementMetrics, balance_metrics, cashflow_metrics, income_metrics,
};
use tickerdeck_core::{
    DataKind, FinancialStatement, Period, StatementKind, Ticker, TickerdeckError,
};

use crate::Tickerdeck;
use crate::router::macros::tickerdeck_router_method;
use crate::views::FinancialsView;

impl Tickerdeck {
    tickerdeck_router_method! {
        /// Fetch one statement type for a reporting period, most recent first.
        ///
        /// Cached per statement and period for the financials TTL.
        method: financials(ticker, statement: StatementKind, period: Period) -> Vec<FinancialStatement>,
        accessor: as_financials_provider,
        capability: "financials",
        kind: DataKind::Financials { statement, period },
        call: statements(statement, period)
    }

    /// Statements plus their metrics.
    ///
    /// Cash flow margins need revenue, so a cash flow view also fetches the
    /// income statement for the same period (usually a cache hit).
    ///
    /// # Errors
    /// Propagates fetch errors; returns `Data` when a series holds no
    /// statements of the expected kind.
    pub async fn financials_view(
        &self,
        ticker: &Ticker,
        statement: StatementKind,
        period: Period,
    ) -> Result<FinancialsView, TickerdeckError> {
        let sourced = self.financials(ticker, statement, period).await?;
        let metrics = match statement {
            StatementKind::Income => StatementMetrics::Income(income_metrics(&sourced.value)?),
            StatementKind::Balance => StatementMetrics::Balance(balance_metrics(&sourced.value)?),
            StatementKind::Cashflow => {
                let income = self
                    .financials(ticker, StatementKind::Income, period)
                    .await?;
                StatementMetrics::Cashflow(cashflow_metrics(&sourced.value, &income.value)?)
            }
        };
        Ok(FinancialsView {
            ticker: ticker.clone(),
            statement,
            period,
            provider: sourced.provider,
            statements: sourced.value,
            metrics,
        })
    }
}
