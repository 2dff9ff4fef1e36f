//! GDELT DOC 2.0 article list. No key required.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tickerdeck_core::{
    Capability, NewsArticle, NewsProvider, NewsWindow, ProviderId, Ticker, TickerdeckConnector,
    TickerdeckError,
};
use url::Url;

use crate::http::{ResilientHttp, endpoint};

const MAX_ARTICLES: usize = 50;

/// GDELT connector.
#[derive(Debug, Clone)]
pub struct GdeltConnector {
    http: ResilientHttp,
    base_url: String,
}

impl GdeltConnector {
    /// Static connector key for routing configuration.
    pub const KEY: ProviderId = ProviderId::GDELT;
    /// Production DOC API endpoint.
    pub const BASE_URL: &'static str = "https://api.gdeltproject.org/api/v2/doc/doc";

    /// Connector using shared HTTP plumbing.
    #[must_use]
    pub fn new(http: ResilientHttp) -> Self {
        Self {
            http,
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Point at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Free-text search term for a ticker. GDELT matches article text, so
/// well-known symbols search by company name.
#[must_use]
pub fn search_term(ticker: &Ticker) -> String {
    let dotted = ticker.dotted();
    let known = match dotted.as_str() {
        "AAPL" => "Apple Inc",
        "GOOGL" | "GOOG" => "Google Alphabet",
        "MSFT" => "Microsoft",
        "AMZN" => "Amazon",
        "TSLA" => "Tesla",
        "META" => "Meta Facebook",
        "NVDA" => "NVIDIA",
        "NFLX" => "Netflix",
        "BRK.B" | "BRK.A" => "Berkshire Hathaway",
        _ => return dotted,
    };
    known.to_string()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ArtList {
    #[serde(default)]
    articles: Option<Vec<WireArticle>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireArticle {
    url: Option<String>,
    title: Option<String>,
    domain: Option<String>,
    seendate: Option<String>,
    socialimage: Option<String>,
}

fn seen_at(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim) else {
        return now;
    };
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y%m%dT%H%M%SZ") {
        return dt.and_utc();
    }
    raw.get(..8)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok())
        .map_or(now, |d| d.and_time(chrono::NaiveTime::MIN).and_utc())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

/// Parse an artlist body. Plain-text bodies are GDELT's throttling notices.
pub(crate) fn parse_artlist(
    body: &str,
    now: DateTime<Utc>,
) -> Result<Vec<NewsArticle>, TickerdeckError> {
    let name = GdeltConnector::KEY.as_str();
    let list: ArtList = match serde_json::from_str(body) {
        Ok(list) => list,
        Err(_) if body.to_ascii_lowercase().contains("limit requests") => {
            return Err(TickerdeckError::rate_limited(name, body.trim()));
        }
        Err(e) => {
            return Err(TickerdeckError::Data(format!(
                "{name}: unexpected response: {e}"
            )));
        }
    };
    Ok(list
        .articles
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| {
            let url = non_empty(a.url)?;
            let title = non_empty(a.title)?;
            let source = non_empty(a.domain)
                .or_else(|| {
                    Url::parse(&url)
                        .ok()
                        .and_then(|u| u.host_str().map(str::to_string))
                })
                .unwrap_or_default();
            Some(NewsArticle {
                summary: non_empty(a.socialimage).unwrap_or_else(|| title.clone()),
                published_at: seen_at(a.seendate.as_deref(), now),
                headline: title,
                source,
                url,
                sentiment: None,
            })
        })
        .take(MAX_ARTICLES)
        .collect())
}

impl TickerdeckConnector for GdeltConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "GDELT Project"
    }

    fn as_news_provider(&self) -> Option<&dyn NewsProvider> {
        Some(self as &dyn NewsProvider)
    }
}

#[async_trait]
impl NewsProvider for GdeltConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tickerdeck::providers",
            name = "gdelt::news",
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
        let start = (now - Duration::days(i64::from(window.days())))
            .format("%Y%m%d%H%M%S")
            .to_string();
        let end = now.format("%Y%m%d%H%M%S").to_string();
        let query = search_term(ticker);
        let url = endpoint(
            &self.base_url,
            "",
            &[
                ("query", &query),
                ("mode", "artlist"),
                ("maxrecords", "250"),
                ("format", "json"),
                ("sort", "datedesc"),
                ("startdatetime", &start),
                ("enddatetime", &end),
            ],
        )?;
        let body = self.http.get_text(Capability::News, &url).await?;
        parse_artlist(&body, now)
    }
}
