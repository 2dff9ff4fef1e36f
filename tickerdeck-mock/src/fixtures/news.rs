use chrono::{DateTime, Utc};
use tickerdeck_core::NewsArticle;

fn article(headline: &str, source: &str, path: &str, ts: i64) -> NewsArticle {
    NewsArticle {
        headline: headline.to_string(),
        source: source.to_string(),
        url: format!("https://{source}/{path}"),
        published_at: DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or(DateTime::UNIX_EPOCH),
        summary: headline.to_string(),
        sentiment: None,
    }
}

/// Recent articles for a fixture symbol, newest first.
///
/// Contains one near-duplicate headline so deduplication has something to do.
pub fn by_symbol(symbol: &str) -> Option<Vec<NewsArticle>> {
    match symbol {
        "AAPL" => Some(vec![
            article("Apple beats estimates on record iPhone sales", "reuters.com", "a1", 1_709_280_000),
            article("Apple beats estimates on record iPhone sales!", "cnbc.com", "a2", 1_709_276_400),
            article("Apple faces EU probe and possible fine", "ft.com", "a3", 1_709_190_000),
            article("Apple unveils new MacBook Air", "theverge.com", "a4", 1_709_100_000),
        ]),
        "MSFT" => Some(vec![
            article("Microsoft cloud growth surges", "bloomberg.com", "m1", 1_709_250_000),
            article("Microsoft layoffs hit gaming unit", "wsj.com", "m2", 1_709_000_000),
        ]),
        _ => None,
    }
}
