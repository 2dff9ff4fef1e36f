use chrono::NaiveDate;
use serde::Serialize;
use tickerdeck_types::PriceBar;

/// One indicator value aligned to a trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPoint {
    /// Day the window ends on.
    pub date: NaiveDate,
    /// Indicator value.
    pub value: f64,
}

/// Simple moving average of closing prices.
///
/// `bars` must be chronological (oldest first). The first point averages
/// the first `period` closes; the output has `len - period + 1` points and
/// is empty when `period` is zero or exceeds the input.
#[must_use]
pub fn sma(bars: &[PriceBar], period: usize) -> Vec<IndicatorPoint> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    sma_values(&closes, period)
        .into_iter()
        .zip(bars.iter().skip(period.saturating_sub(1)))
        .map(|(value, bar)| IndicatorPoint {
            date: bar.date,
            value,
        })
        .collect()
}

/// Simple moving average over raw values; see [`sma`].
#[must_use]
pub fn sma_values(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = period as f64;
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / n)
        .collect()
}
