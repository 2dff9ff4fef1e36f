//! Stooq end-of-day CSV download. No key required; US listings only.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tickerdeck_core::{
    Capability, PriceBar, PriceProvider, ProviderId, Ticker, TickerdeckConnector, TickerdeckError,
    TimeRange,
};

use crate::classify::{Fallback, classify_message};
use crate::http::{ResilientHttp, endpoint};

const DAILY_LIMIT_MARKER: &str = "exceeded the daily hits limit";

/// Stooq connector.
#[derive(Debug, Clone)]
pub struct StooqConnector {
    http: ResilientHttp,
    base_url: String,
}

impl StooqConnector {
    /// Static connector key for routing configuration.
    pub const KEY: ProviderId = ProviderId::STOOQ;
    /// Production download endpoint.
    pub const BASE_URL: &'static str = "https://stooq.com/q/d/l/";

    /// Connector using shared HTTP plumbing.
    #[must_use]
    pub fn new(http: ResilientHttp) -> Self {
        Self {
            http,
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Point at a different download endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn parse_row(ticker: &Ticker, line: &str) -> Option<PriceBar> {
    let cols: Vec<&str> = line.trim().split(',').collect();
    if cols.len() < 6 {
        return None;
    }
    let (date, open) = (cols[0].trim(), cols[1].trim());
    if date.is_empty() || date == "Date" || open == "null" {
        return None;
    }
    let num = |s: &str| s.trim().parse::<f64>().ok();
    Some(PriceBar {
        ticker: ticker.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
        open: num(open)?,
        high: num(cols[2])?,
        low: num(cols[3])?,
        close: num(cols[4])?,
        volume: cols[5].trim().parse::<u64>().unwrap_or(0),
    })
}

/// Parse the CSV download (oldest first) into newest-first bars.
pub(crate) fn parse_csv(ticker: &Ticker, csv: &str) -> Result<Vec<PriceBar>, TickerdeckError> {
    if csv.to_ascii_lowercase().contains(DAILY_LIMIT_MARKER) {
        return Err(classify_message(
            StooqConnector::KEY.as_str(),
            csv.trim(),
            Fallback::RateLimited,
        ));
    }
    let mut bars: Vec<PriceBar> = csv
        .trim()
        .lines()
        .skip(1)
        .filter_map(|line| parse_row(ticker, line))
        .collect();
    if bars.is_empty() {
        return Err(TickerdeckError::not_found(format!(
            "price data for {ticker} on stooq"
        )));
    }
    bars.reverse();
    Ok(bars)
}

impl TickerdeckConnector for StooqConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Stooq"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }
}

#[async_trait]
impl PriceProvider for StooqConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tickerdeck::providers",
            name = "stooq::prices",
            skip(self),
            fields(ticker = %ticker, range = %range),
        )
    )]
    async fn prices(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<Vec<PriceBar>, TickerdeckError> {
        let today = Utc::now().date_naive();
        let symbol = format!("{}.US", ticker.as_str());
        let d1 = range.start_date(today).format("%Y%m%d").to_string();
        let d2 = today.format("%Y%m%d").to_string();
        let url = endpoint(
            &self.base_url,
            "",
            &[("s", &symbol), ("d1", &d1), ("d2", &d2), ("i", "d")],
        )?;
        let csv = self.http.get_text(Capability::Price, &url).await?;
        parse_csv(ticker, &csv)
    }
}
