use tickerdeck_core::analytics::{quality_score, value_score};
use tickerdeck_core::{DataKind, Overview, Ticker, TickerdeckError};

use crate::Tickerdeck;
use crate::router::macros::tickerdeck_router_method;
use crate::views::OverviewView;

impl Tickerdeck {
    tickerdeck_router_method! {
        /// Fetch the company profile and trailing fundamentals.
        method: overview(ticker) -> Overview,
        accessor: as_overview_provider,
        capability: "overview",
        kind: DataKind::Overview,
        call: overview()
    }

    /// Overview with quality and value scores.
    ///
    /// # Errors
    /// Propagates the fetch error.
    pub async fn overview_view(&self, ticker: &Ticker) -> Result<OverviewView, TickerdeckError> {
        let sourced = self.overview(ticker).await?;
        Ok(OverviewView {
            ticker: ticker.clone(),
            provider: sourced.provider,
            quality: quality_score(&sourced.value),
            value: value_score(&sourced.value),
            overview: sourced.value,
        })
    }
}
