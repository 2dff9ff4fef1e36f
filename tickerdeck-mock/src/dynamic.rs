use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tickerdeck_core::{
    Capability, FinancialStatement, FinancialsProvider, NewsArticle, NewsProvider, NewsWindow,
    Overview, OverviewProvider, Period, PriceBar, PriceProvider, StatementKind, Ticker,
    TickerdeckConnector, TickerdeckError, TimeRange,
};

/// Instruction for how a method should behave for a given input.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(TickerdeckError),
    /// Hang indefinitely (simulate a stalled upstream).
    Hang,
}

#[derive(Default)]
struct InternalState {
    price_rules: HashMap<Ticker, MockBehavior<Vec<PriceBar>>>,
    financials_rules: HashMap<Ticker, MockBehavior<Vec<FinancialStatement>>>,
    news_rules: HashMap<Ticker, MockBehavior<Vec<NewsArticle>>>,
    overview_rules: HashMap<Ticker, MockBehavior<Overview>>,
    calls: HashMap<Capability, usize>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `prices` calls for a ticker.
    pub async fn set_price_behavior(&self, ticker: Ticker, behavior: MockBehavior<Vec<PriceBar>>) {
        self.state.lock().await.price_rules.insert(ticker, behavior);
    }

    /// Set the behavior for every statement call for a ticker.
    pub async fn set_financials_behavior(
        &self,
        ticker: Ticker,
        behavior: MockBehavior<Vec<FinancialStatement>>,
    ) {
        self.state
            .lock()
            .await
            .financials_rules
            .insert(ticker, behavior);
    }

    /// Set the behavior for `news` calls for a ticker.
    pub async fn set_news_behavior(&self, ticker: Ticker, behavior: MockBehavior<Vec<NewsArticle>>) {
        self.state.lock().await.news_rules.insert(ticker, behavior);
    }

    /// Set the behavior for `overview` calls for a ticker.
    pub async fn set_overview_behavior(&self, ticker: Ticker, behavior: MockBehavior<Overview>) {
        self.state
            .lock()
            .await
            .overview_rules
            .insert(ticker, behavior);
    }

    /// Number of calls received for a capability, whatever their outcome.
    pub async fn calls(&self, capability: Capability) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&capability)
            .copied()
            .unwrap_or(0)
    }

    /// Clear all configured behaviors and call counters.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.price_rules.clear();
        guard.financials_rules.clear();
        guard.news_rules.clear();
        guard.overview_rules.clear();
        guard.calls.clear();
    }
}

/// A connector that defers all behavior to an external controller.
///
/// Calls for a ticker with no configured behavior fail with `Unsupported`.
pub struct DynamicMockConnector {
    name: &'static str,
    capabilities: Vec<Capability>,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a connector advertising every capability, plus its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn TickerdeckConnector>, DynamicMockController) {
        Self::with_capabilities(name, &Capability::ALL)
    }

    /// Create a connector advertising only `capabilities`, plus its controller.
    #[must_use]
    pub fn with_capabilities(
        name: &'static str,
        capabilities: &[Capability],
    ) -> (Arc<dyn TickerdeckConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self {
            name,
            capabilities: capabilities.to_vec(),
            state,
        });
        (me as Arc<dyn TickerdeckConnector>, controller)
    }

    // Counts the call and snapshots the rule without holding the lock across await points.
    async fn behavior<T: Clone>(
        &self,
        capability: Capability,
        pick: impl FnOnce(&InternalState) -> Option<&MockBehavior<T>>,
    ) -> Result<T, TickerdeckError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry(capability).or_insert(0) += 1;
            pick(&guard).cloned()
        };
        match behavior {
            Some(MockBehavior::Return(v)) => Ok(v),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => Err(TickerdeckError::unsupported(capability.as_str())),
        }
    }

    fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl TickerdeckConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        self.has(Capability::Price)
            .then_some(self as &dyn PriceProvider)
    }

    fn as_financials_provider(&self) -> Option<&dyn FinancialsProvider> {
        self.has(Capability::Financials)
            .then_some(self as &dyn FinancialsProvider)
    }

    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        self.has(Capability::News).then_some(self as &dyn NewsProvider)
    }

    fn as_overview_provider(&self) -> Option<&dyn OverviewProvider> {
        self.has(Capability::Overview)
            .then_some(self as &dyn OverviewProvider)
    }
}

#[async_trait]
impl PriceProvider for DynamicMockConnector {
    async fn prices(
        &self,
        ticker: &Ticker,
        _range: TimeRange,
    ) -> Result<Vec<PriceBar>, TickerdeckError> {
        self.behavior(Capability::Price, |s| s.price_rules.get(ticker))
            .await
    }
}

impl DynamicMockConnector {
    async fn statements_for(
        &self,
        ticker: &Ticker,
        kind: StatementKind,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        let all = self
            .behavior(Capability::Financials, |s| s.financials_rules.get(ticker))
            .await?;
        // Rules hold mixed statement types; serve the requested one.
        Ok(all.into_iter().filter(|st| st.kind() == kind).collect())
    }
}

#[async_trait]
impl FinancialsProvider for DynamicMockConnector {
    async fn income_statement(
        &self,
        ticker: &Ticker,
        _period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Income).await
    }

    async fn balance_sheet(
        &self,
        ticker: &Ticker,
        _period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Balance).await
    }

    async fn cash_flow(
        &self,
        ticker: &Ticker,
        _period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Cashflow).await
    }
}

#[async_trait]
impl NewsProvider for DynamicMockConnector {
    async fn news(
        &self,
        ticker: &Ticker,
        _window: NewsWindow,
    ) -> Result<Vec<NewsArticle>, TickerdeckError> {
        self.behavior(Capability::News, |s| s.news_rules.get(ticker))
            .await
    }
}

#[async_trait]
impl OverviewProvider for DynamicMockConnector {
    async fn overview(&self, ticker: &Ticker) -> Result<Overview, TickerdeckError> {
        self.behavior(Capability::Overview, |s| s.overview_rules.get(ticker))
            .await
    }
}
