use async_trait::async_trait;

use tickerdeck_types::{
    Capability, FinancialStatement, NewsArticle, NewsWindow, Overview, Period, PriceBar,
    ProviderId, StatementKind, Ticker, TickerdeckError, TimeRange,
};

/// Focused role trait for connectors that provide daily price bars.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch daily bars covering `range`, newest first.
    async fn prices(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<Vec<PriceBar>, TickerdeckError>;

    /// Whether the vendor knows the ticker: a one-week fetch returns at least one bar.
    ///
    /// Any failure, including transient ones, reads as `false`.
    async fn validate_ticker(&self, ticker: &Ticker) -> bool {
        matches!(
            self.prices(ticker, TimeRange::OneWeek).await,
            Ok(bars) if !bars.is_empty()
        )
    }
}

/// Focused role trait for connectors that provide financial statements.
#[async_trait]
pub trait FinancialsProvider: Send + Sync {
    /// Fetch income statements, most recent first.
    async fn income_statement(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError>;

    /// Fetch balance sheets, most recent first.
    async fn balance_sheet(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError>;

    /// Fetch cash flow statements, most recent first.
    async fn cash_flow(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError>;

    /// Dispatch on the statement kind.
    async fn statements(
        &self,
        ticker: &Ticker,
        statement: StatementKind,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        match statement {
            StatementKind::Income => self.income_statement(ticker, period).await,
            StatementKind::Balance => self.balance_sheet(ticker, period).await,
            StatementKind::Cashflow => self.cash_flow(ticker, period).await,
        }
    }
}

/// Focused role trait for connectors that provide news.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch articles published within `window`.
    async fn news(
        &self,
        ticker: &Ticker,
        window: NewsWindow,
    ) -> Result<Vec<NewsArticle>, TickerdeckError>;
}

/// Focused role trait for connectors that provide a company overview.
#[async_trait]
pub trait OverviewProvider: Send + Sync {
    /// Fetch the company profile and trailing fundamentals.
    async fn overview(&self, ticker: &Ticker) -> Result<Overview, TickerdeckError>;
}

/// Main connector trait implemented by provider adapters. Exposes capability discovery.
pub trait TickerdeckConnector: Send + Sync {
    /// A stable identifier used in routing configuration and result provenance.
    fn name(&self) -> &'static str;

    /// Typed provider id constructed from the static name.
    fn key(&self) -> ProviderId {
        ProviderId::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise price capability by returning a usable trait object reference when supported.
    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        None
    }

    /// If implemented, returns a trait object for financial statements.
    fn as_financials_provider(&self) -> Option<&dyn FinancialsProvider> {
        None
    }

    /// If implemented, returns a trait object for news.
    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        None
    }

    /// If implemented, returns a trait object for the company overview.
    fn as_overview_provider(&self) -> Option<&dyn OverviewProvider> {
        None
    }

    /// Whether the connector advertises `capability`.
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Price => self.as_price_provider().is_some(),
            Capability::Financials => self.as_financials_provider().is_some(),
            Capability::News => self.as_news_provider().is_some(),
            Capability::Overview => self.as_overview_provider().is_some(),
        }
    }
}
