use chrono::{Days, NaiveDate};
use tickerdeck_core::{PriceBar, TimeRange};

/// Last trading day in every fixture series.
pub const LAST_DAY: (i32, u32, u32) = (2024, 3, 1);

const SERIES_LEN: u64 = 400;

fn base(symbol: &str) -> Option<(f64, f64)> {
    match symbol {
        "AAPL" => Some((180.0, 0.15)),
        "MSFT" => Some((400.0, 0.4)),
        "GOOGL" => Some((140.0, -0.05)),
        "TSLA" => Some((200.0, -0.3)),
        _ => None,
    }
}

/// Newest-first daily bars for a fixture symbol, trimmed to the range.
pub fn by_symbol(symbol: &str, range: TimeRange) -> Option<Vec<PriceBar>> {
    let (start, drift) = base(symbol)?;
    let last = NaiveDate::from_ymd_opt(LAST_DAY.0, LAST_DAY.1, LAST_DAY.2)?;
    let keep = range.cutoff_days().unwrap_or(SERIES_LEN).min(SERIES_LEN);
    let bars = (0..keep)
        .filter_map(|back| {
            let date = last.checked_sub_days(Days::new(back))?;
            #[allow(clippy::cast_precision_loss)]
            let step = (SERIES_LEN - back) as f64;
            let close = start + drift * step;
            Some(PriceBar {
                ticker: symbol.to_string(),
                date,
                open: close - drift,
                high: close.max(close - drift) + 1.0,
                low: close.min(close - drift) - 1.0,
                close,
                volume: 1_000_000 + (back % 7) * 50_000,
            })
        })
        .collect();
    Some(bars)
}
