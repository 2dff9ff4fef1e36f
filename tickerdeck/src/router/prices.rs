use futures::future::join_all;
use tickerdeck_core::analytics::{chronological, normalize, summarize};
use tickerdeck_core::{DataKind, PriceBar, Ticker, TickerdeckError, TimeRange};

use crate::Tickerdeck;
use crate::router::macros::tickerdeck_router_method;
use crate::views::{ComparisonSeries, PriceView};

impl Tickerdeck {
    tickerdeck_router_method! {
        /// Fetch daily bars covering `range`, newest first.
        ///
        /// Cached under `price|TICKER|RANGE` for the price TTL.
        method: prices(ticker, range: TimeRange) -> Vec<PriceBar>,
        accessor: as_price_provider,
        capability: "price",
        kind: DataKind::Price { range },
        call: prices(range)
    }

    /// Bars plus current price, day change and period change.
    ///
    /// # Errors
    /// Propagates the fetch error; returns `Data` when the series is empty.
    pub async fn price_view(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<PriceView, TickerdeckError> {
        let sourced = self.prices(ticker, range).await?;
        let summary = summarize(&sourced.value)?;
        Ok(PriceView {
            ticker: ticker.clone(),
            range,
            provider: sourced.provider,
            bars: sourced.value,
            summary,
        })
    }

    /// Fetch every ticker concurrently and index each to 100 at its oldest bar.
    ///
    /// Results keep the input order; one ticker failing does not fail the others.
    pub async fn compare(
        &self,
        tickers: &[Ticker],
        range: TimeRange,
    ) -> Vec<Result<ComparisonSeries, TickerdeckError>> {
        join_all(tickers.iter().map(|ticker| async move {
            let sourced = self.prices(ticker, range).await?;
            let bars = chronological(&sourced.value);
            Ok::<_, TickerdeckError>(ComparisonSeries {
                ticker: ticker.clone(),
                provider: sourced.provider,
                dates: bars.iter().map(|b| b.date).collect(),
                normalized: normalize(&bars),
            })
        }))
        .await
    }

    /// Whether the routed price provider knows `ticker`: a one-week fetch
    /// yields at least one bar.
    ///
    /// Any failure reads as `false`. A successful check warms the cache.
    pub async fn validate_ticker(&self, ticker: &Ticker) -> bool {
        matches!(
            self.prices(ticker, TimeRange::OneWeek).await,
            Ok(sourced) if !sourced.value.is_empty()
        )
    }
}
