//! Mock connectors for CI-safe tests and examples.
//!
//! [`MockConnector`] serves deterministic fixture data for `AAPL`, `MSFT`,
//! `GOOGL` and `TSLA` (coverage differs per capability). A few reserved
//! tickers force failures:
//!
//! - `FAIL` fails with `Transport`
//! - `RATELIMIT` fails with `RateLimited`
//! - `MISSING` fails with `NotFound`
//! - `TIMEOUT` sleeps 200ms before answering
//!
//! [`DynamicMockConnector`] defers every answer to a test-side controller.
use std::time::Duration;

use async_trait::async_trait;
use tickerdeck_core::{
    FinancialStatement, FinancialsProvider, NewsArticle, NewsProvider, NewsWindow, Overview,
    OverviewProvider, Period, PriceBar, PriceProvider, StatementKind, Ticker, TickerdeckConnector,
    TickerdeckError, TimeRange,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};
pub use fixtures::prices::LAST_DAY;

/// Mock connector backed by static fixtures.
#[derive(Debug, Clone, Copy)]
pub struct MockConnector {
    name: &'static str,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Connector named `mock`.
    #[must_use]
    pub const fn new() -> Self {
        Self { name: "mock" }
    }

    /// Connector with a custom name, for routing several mocks side by side.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }

    fn not_found(what: String) -> TickerdeckError {
        TickerdeckError::not_found(what)
    }

    async fn maybe_fail_or_timeout(
        &self,
        ticker: &Ticker,
        capability: &'static str,
    ) -> Result<(), TickerdeckError> {
        match ticker.as_str() {
            "FAIL" => Err(TickerdeckError::transport(
                self.name,
                format!("forced failure: {capability}"),
            )),
            "RATELIMIT" => Err(TickerdeckError::rate_limited(
                self.name,
                format!("forced rate limit: {capability}"),
            )),
            "MISSING" => Err(Self::not_found(format!("{capability} for MISSING"))),
            "TIMEOUT" => {
                // Long enough for a short provider_timeout to fire.
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl TickerdeckConnector for MockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }

    fn as_financials_provider(&self) -> Option<&dyn FinancialsProvider> {
        Some(self as &dyn FinancialsProvider)
    }

    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }

    fn as_overview_provider(&self) -> Option<&dyn OverviewProvider> {
        Some(self as &dyn OverviewProvider)
    }
}

#[async_trait]
impl PriceProvider for MockConnector {
    async fn prices(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<Vec<PriceBar>, TickerdeckError> {
        self.maybe_fail_or_timeout(ticker, "price").await?;
        fixtures::prices::by_symbol(ticker.as_str(), range)
            .ok_or_else(|| Self::not_found(format!("price data for {ticker}")))
    }
}

impl MockConnector {
    async fn statements_for(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.maybe_fail_or_timeout(ticker, "financials").await?;
        fixtures::fundamentals::statements(ticker.as_str(), kind, period)
            .ok_or_else(|| Self::not_found(format!("{kind} statements for {ticker}")))
    }
}

#[async_trait]
impl FinancialsProvider for MockConnector {
    async fn income_statement(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Income, period)
            .await
    }

    async fn balance_sheet(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Balance, period)
            .await
    }

    async fn cash_flow(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Cashflow, period)
            .await
    }
}

#[async_trait]
impl NewsProvider for MockConnector {
    async fn news(
        &self,
        ticker: &Ticker,
        _window: NewsWindow,
    ) -> Result<Vec<NewsArticle>, TickerdeckError> {
        self.maybe_fail_or_timeout(ticker, "news").await?;
        Ok(fixtures::news::by_symbol(ticker.as_str()).unwrap_or_default())
    }
}

#[async_trait]
impl OverviewProvider for MockConnector {
    async fn overview(&self, ticker: &Ticker) -> Result<Overview, TickerdeckError> {
        self.maybe_fail_or_timeout(ticker, "overview").await?;
        fixtures::fundamentals::overview(ticker.as_str())
            .ok_or_else(|| Self::not_found(format!("overview for {ticker}")))
    }
}
