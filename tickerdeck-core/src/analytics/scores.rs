//! Weighted 0–10 scores over overview fundamentals.
//!
//! Each metric maps linearly from its `worst` value (0) to its `best` value
//! (10), clamped. Missing metrics drop out and the remaining weights are
//! renormalized; too few present metrics yields no score at all.

use serde::Serialize;
use tickerdeck_types::Overview;

/// Sectors whose leverage is structural, so debt/equity is not scored.
pub const FINANCIAL_SECTORS: [&str; 3] = ["Financial Services", "Banking", "Insurance"];

/// Letter band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    /// 8 and above.
    A,
    /// 6 up to 8.
    B,
    /// 4 up to 6.
    C,
    /// Below 4.
    D,
}

impl Grade {
    /// Band for a score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            Self::A
        } else if score >= 6.0 {
            Self::B
        } else if score >= 4.0 {
            Self::C
        } else {
            Self::D
        }
    }
}

/// Per-metric sub-scores of the quality score; `None` when not scored.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityBreakdown {
    pub roe: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub price_to_book: Option<f64>,
}

/// Per-metric sub-scores of the value score.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueBreakdown {
    pub pe: Option<f64>,
    pub peg: Option<f64>,
    pub pb: Option<f64>,
}

/// A score with its grade and breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score<B> {
    /// Weighted average, one decimal.
    pub score: f64,
    /// Letter band.
    pub grade: Grade,
    /// Sub-scores per metric.
    pub breakdown: B,
}

/// Business quality score.
pub type QualityScore = Score<QualityBreakdown>;
/// Valuation score.
pub type ValueScore = Score<ValueBreakdown>;

#[derive(Debug, Clone, Copy)]
struct ScoreInput {
    value: Option<f64>,
    weight: f64,
    best: f64,
    worst: f64,
}

impl ScoreInput {
    const fn new(value: Option<f64>, weight: f64, best: f64, worst: f64) -> Self {
        Self {
            value,
            weight,
            best,
            worst,
        }
    }

    fn sub_score(&self) -> Option<f64> {
        self.value.map(|v| sub_score(v, self.best, self.worst))
    }
}

/// Linear 0–10 mapping of `value` between `worst` and `best`, clamped.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn sub_score(value: f64, best: f64, worst: f64) -> f64 {
    if best == worst {
        return 5.0;
    }
    ((value - worst) / (best - worst) * 10.0).clamp(0.0, 10.0)
}

fn weighted(inputs: &[ScoreInput], min_present: usize) -> Option<(f64, Grade)> {
    let present: Vec<(f64, f64)> = inputs
        .iter()
        .filter_map(|s| s.sub_score().map(|sub| (sub, s.weight)))
        .collect();
    if present.len() < min_present {
        return None;
    }
    let total_weight: f64 = present.iter().map(|(_, w)| w).sum();
    let weighted_sum: f64 = present.iter().map(|(sub, w)| sub * w).sum();
    let score = (weighted_sum / total_weight * 10.0).round() / 10.0;
    Some((score, Grade::from_score(score)))
}

/// Quality score; `None` with fewer than three scorable metrics.
#[must_use]
pub fn quality_score(o: &Overview) -> Option<QualityScore> {
    let financial = o
        .sector
        .as_deref()
        .is_some_and(|s| FINANCIAL_SECTORS.contains(&s));
    let inputs = [
        ScoreInput::new(o.return_on_equity, 25.0, 15.0, 5.0),
        ScoreInput::new(o.profit_margin, 20.0, 20.0, 5.0),
        ScoreInput::new(o.operating_margin, 15.0, 15.0, 3.0),
        ScoreInput::new(o.quarterly_earnings_growth, 15.0, 15.0, 0.0),
        ScoreInput::new(o.debt_to_equity.filter(|_| !financial), 15.0, 0.3, 2.0),
        ScoreInput::new(o.quarterly_revenue_growth, 5.0, 10.0, 0.0),
        ScoreInput::new(o.price_to_book, 5.0, 1.5, 5.0),
    ];
    let (score, grade) = weighted(&inputs, 3)?;
    Some(Score {
        score,
        grade,
        breakdown: QualityBreakdown {
            roe: inputs[0].sub_score(),
            profit_margin: inputs[1].sub_score(),
            operating_margin: inputs[2].sub_score(),
            earnings_growth: inputs[3].sub_score(),
            debt_to_equity: inputs[4].sub_score(),
            revenue_growth: inputs[5].sub_score(),
            price_to_book: inputs[6].sub_score(),
        },
    })
}

/// Value score; `None` with fewer than two scorable metrics.
///
/// A non-positive P/E carries no valuation meaning and counts as missing.
#[must_use]
pub fn value_score(o: &Overview) -> Option<ValueScore> {
    let inputs = [
        ScoreInput::new(o.pe_ratio.filter(|pe| *pe > 0.0), 50.0, 15.0, 40.0),
        ScoreInput::new(o.peg_ratio, 30.0, 1.0, 3.0),
        ScoreInput::new(o.price_to_book, 20.0, 1.5, 5.0),
    ];
    let (score, grade) = weighted(&inputs, 2)?;
    Some(Score {
        score,
        grade,
        breakdown: ValueBreakdown {
            pe: inputs[0].sub_score(),
            peg: inputs[1].sub_score(),
            pb: inputs[2].sub_score(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_score_clamps_both_ends() {
        assert_eq!(sub_score(50.0, 15.0, 5.0), 10.0);
        assert_eq!(sub_score(-3.0, 15.0, 5.0), 0.0);
        assert!((sub_score(10.0, 15.0, 5.0) - 5.0).abs() < 1e-9);
        // inverted scale: lower is better
        assert_eq!(sub_score(0.1, 0.3, 2.0), 10.0);
        assert_eq!(sub_score(7.0, 7.0, 7.0), 5.0);
    }

    #[test]
    fn grade_bands() {
        assert_eq!(Grade::from_score(8.0), Grade::A);
        assert_eq!(Grade::from_score(7.9), Grade::B);
        assert_eq!(Grade::from_score(4.0), Grade::C);
        assert_eq!(Grade::from_score(3.9), Grade::D);
    }

    #[test]
    fn financial_sector_skips_leverage() {
        let o = Overview {
            sector: Some("Financial Services".into()),
            return_on_equity: Some(15.0),
            profit_margin: Some(20.0),
            operating_margin: Some(15.0),
            debt_to_equity: Some(9.0),
            ..Overview::default()
        };
        let q = quality_score(&o).unwrap();
        assert_eq!(q.breakdown.debt_to_equity, None);
        assert_eq!(q.score, 10.0);
        assert_eq!(q.grade, Grade::A);
    }

    #[test]
    fn negative_pe_is_ignored() {
        let o = Overview {
            pe_ratio: Some(-12.0),
            peg_ratio: Some(1.0),
            ..Overview::default()
        };
        assert!(value_score(&o).is_none());
        let o = Overview {
            price_to_book: Some(5.0),
            ..o
        };
        let v = value_score(&o).unwrap();
        assert_eq!(v.breakdown.pe, None);
        // (10*30 + 0*20) / 50
        assert_eq!(v.score, 6.0);
    }
}
