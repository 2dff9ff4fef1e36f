use serde::Serialize;
use tickerdeck_types::{PriceBar, TickerdeckError};

/// Headline numbers for a price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSummary {
    /// Latest close.
    pub current: f64,
    /// Percent change from the previous close.
    pub day_change_pct: f64,
    /// Percent change from the oldest close in the series.
    pub period_change_pct: f64,
}

/// Summarize a newest-first series.
///
/// A single bar yields zero changes.
///
/// # Errors
/// Returns `Data` when the series is empty.
pub fn summarize(bars: &[PriceBar]) -> Result<PriceSummary, TickerdeckError> {
    let (Some(latest), Some(oldest)) = (bars.first(), bars.last()) else {
        return Err(TickerdeckError::Data("no price data to summarize".into()));
    };
    let current = latest.close;
    let previous = bars.get(1).map_or(current, |b| b.close);
    Ok(PriceSummary {
        current,
        day_change_pct: pct_change(previous, current),
        period_change_pct: pct_change(oldest.close, current),
    })
}

fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

/// Index closes to 100 at the first bar, for comparing tickers on one axis.
#[must_use]
pub fn normalize(bars: &[PriceBar]) -> Vec<f64> {
    let Some(start) = bars.first().map(|b| b.close) else {
        return Vec::new();
    };
    if start == 0.0 {
        return vec![0.0; bars.len()];
    }
    bars.iter().map(|b| b.close / start * 100.0).collect()
}

/// Oldest-first copy of a newest-first series.
#[must_use]
pub fn chronological(bars: &[PriceBar]) -> Vec<PriceBar> {
    bars.iter().rev().cloned().collect()
}
