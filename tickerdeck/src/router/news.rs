use tickerdeck_core::analytics::annotate;
use tickerdeck_core::{DataKind, NewsArticle, NewsWindow, Ticker, TickerdeckError};

use crate::Tickerdeck;
use crate::router::macros::tickerdeck_router_method;
use crate::views::NewsView;

impl Tickerdeck {
    tickerdeck_router_method! {
        /// Fetch articles published within `window`.
        ///
        /// Providers may return syndicated near-duplicates; see [`Tickerdeck::news_view`].
        method: news(ticker, window: NewsWindow) -> Vec<NewsArticle>,
        accessor: as_news_provider,
        capability: "news",
        kind: DataKind::News { window },
        call: news(window)
    }

    /// Articles de-duplicated by headline fingerprint and tagged with sentiment.
    ///
    /// The cache holds the raw articles; annotation runs on every call.
    ///
    /// # Errors
    /// Propagates the fetch error.
    pub async fn news_view(
        &self,
        ticker: &Ticker,
        window: NewsWindow,
    ) -> Result<NewsView, TickerdeckError> {
        let sourced = self.news(ticker, window).await?;
        let articles = annotate(sourced.value);
        Ok(NewsView {
            ticker: ticker.clone(),
            window,
            provider: sourced.provider,
            count: articles.len(),
            articles,
        })
    }
}
