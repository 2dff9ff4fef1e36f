//! Finnhub: daily candles and company news.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use tickerdeck_core::{
    Capability, NewsArticle, NewsProvider, NewsWindow, PriceBar, PriceProvider, ProviderId,
    Ticker, TickerdeckConnector, TickerdeckError, TimeRange,
};

use crate::classify::{Fallback, classify_message, parse_json};
use crate::http::{ResilientHttp, endpoint};

/// Finnhub connector. Needs `FINNHUB_API_KEY`.
#[derive(Debug, Clone)]
pub struct FinnhubConnector {
    http: ResilientHttp,
    api_key: String,
    base_url: String,
}

impl FinnhubConnector {
    /// Static connector key for routing configuration.
    pub const KEY: ProviderId = ProviderId::FINNHUB;
    /// Production API root.
    pub const BASE_URL: &'static str = "https://finnhub.io/api/v1";

    /// Connector using `api_key` and shared HTTP plumbing.
    #[must_use]
    pub fn new(api_key: impl Into<String>, http: ResilientHttp) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Point at a different API root (mock servers in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CandleResponse {
    #[serde(default)]
    s: Option<String>,
    #[serde(default)]
    o: Option<Vec<f64>>,
    #[serde(default)]
    h: Option<Vec<f64>>,
    #[serde(default)]
    l: Option<Vec<f64>>,
    #[serde(default)]
    c: Option<Vec<f64>>,
    #[serde(default)]
    v: Option<Vec<f64>>,
    #[serde(default)]
    t: Option<Vec<i64>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireArticle {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    datetime: i64,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NewsBody {
    Articles(Vec<WireArticle>),
    Error { error: String },
    Other(serde_json::Value),
}

fn unix_day(ts: i64) -> Result<NaiveDate, TickerdeckError> {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| TickerdeckError::Data(format!("finnhub: timestamp out of range: {ts}")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn volume(v: f64) -> u64 {
    v.max(0.0).round() as u64
}

/// Convert a candle response into newest-first bars.
pub(crate) fn map_candles(
    ticker: &Ticker,
    resp: CandleResponse,
) -> Result<Vec<PriceBar>, TickerdeckError> {
    let name = FinnhubConnector::KEY.as_str();
    if let Some(msg) = resp.error {
        return Err(classify_message(name, &msg, Fallback::Connector));
    }
    if resp.s.as_deref() == Some("no_data") {
        return Err(TickerdeckError::not_found(format!("price data for {ticker}")));
    }
    let (Some(o), Some(h), Some(l), Some(c), Some(v), Some(t)) =
        (resp.o, resp.h, resp.l, resp.c, resp.v, resp.t)
    else {
        return Err(TickerdeckError::not_found(format!(
            "no price data available for {ticker}"
        )));
    };
    let n = [o.len(), h.len(), l.len(), c.len(), v.len()]
        .into_iter()
        .fold(t.len(), usize::min);
    let mut bars = (0..n)
        .map(|i| {
            Ok(PriceBar {
                ticker: ticker.to_string(),
                date: unix_day(t[i])?,
                open: o[i],
                high: h[i],
                low: l[i],
                close: c[i],
                volume: volume(v[i]),
            })
        })
        .collect::<Result<Vec<_>, TickerdeckError>>()?;
    bars.reverse();
    Ok(bars)
}

/// Convert a company-news body into articles.
pub(crate) fn map_news(body: NewsBody) -> Result<Vec<NewsArticle>, TickerdeckError> {
    let name = FinnhubConnector::KEY.as_str();
    match body {
        NewsBody::Articles(items) => items
            .into_iter()
            .map(|a| {
                let published_at = DateTime::from_timestamp(a.datetime, 0).ok_or_else(|| {
                    TickerdeckError::Data(format!("finnhub: bad article time {}", a.datetime))
                })?;
                let summary = a
                    .summary
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| a.headline.clone());
                Ok(NewsArticle {
                    headline: a.headline,
                    source: a.source,
                    url: a.url,
                    published_at,
                    summary,
                    sentiment: None,
                })
            })
            .collect(),
        NewsBody::Error { error } => Err(classify_message(name, &error, Fallback::Connector)),
        NewsBody::Other(_) => Err(TickerdeckError::Data(
            "finnhub: invalid news data format".into(),
        )),
    }
}

impl TickerdeckConnector for FinnhubConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Finnhub"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }

    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
}

#[async_trait]
impl PriceProvider for FinnhubConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tickerdeck::providers",
            name = "finnhub::prices",
            skip(self),
            fields(ticker = %ticker, range = %range),
        )
    )]
    async fn prices(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<Vec<PriceBar>, TickerdeckError> {
        let now = Utc::now();
        let from = range
            .start_date(now.date_naive())
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp()
            .to_string();
        let to = now.timestamp().to_string();
        let url = endpoint(
            &self.base_url,
            "stock/candle",
            &[
                ("symbol", ticker.as_str()),
                ("resolution", "D"),
                ("from", &from),
                ("to", &to),
                ("token", &self.api_key),
            ],
        )?;
        let body = self.http.get_text(Capability::Price, &url).await?;
        map_candles(ticker, parse_json(self.name(), &body)?)
    }
}

#[async_trait]
impl NewsProvider for FinnhubConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tickerdeck::providers",
            name = "finnhub::news",
            skip(self),
            fields(ticker = %ticker, window = %window),
        )
    )]
    async fn news(
        &self,
        ticker: &Ticker,
        window: NewsWindow,
    ) -> Result<Vec<NewsArticle>, TickerdeckError> {
        let now = Utc::now();
        let from = (now - Duration::days(i64::from(window.days())))
            .format("%Y-%m-%d")
            .to_string();
        let to = now.format("%Y-%m-%d").to_string();
        let url = endpoint(
            &self.base_url,
            "company-news",
            &[
                ("symbol", ticker.as_str()),
                ("from", &from),
                ("to", &to),
                ("token", &self.api_key),
            ],
        )?;
        let body = self.http.get_text(Capability::News, &url).await?;
        map_news(parse_json(self.name(), &body)?)
    }
}
