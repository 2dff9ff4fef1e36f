use serde::{Deserialize, Serialize};

/// A position as held by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Shares held.
    pub quantity: f64,
    /// Average cost per share.
    pub avg_cost: f64,
    /// Latest price per share.
    pub current_price: f64,
}

/// Profit and loss of one holding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoldingPnl {
    #[allow(missing_docs)]
    pub cost_basis: f64,
    #[allow(missing_docs)]
    pub current_value: f64,
    #[allow(missing_docs)]
    pub gain_loss: f64,
    /// Zero when the cost basis is not positive.
    pub gain_loss_percent: f64,
}

/// Aggregate profit and loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PortfolioTotals {
    #[allow(missing_docs)]
    pub total_cost: f64,
    #[allow(missing_docs)]
    pub total_value: f64,
    #[allow(missing_docs)]
    pub total_gain_loss: f64,
    /// Percent return on total cost; zero when cost is not positive.
    pub portfolio_return: f64,
}

impl Holding {
    /// Profit and loss at the current price.
    #[must_use]
    pub fn pnl(&self) -> HoldingPnl {
        let cost_basis = self.quantity * self.avg_cost;
        let current_value = self.quantity * self.current_price;
        let gain_loss = current_value - cost_basis;
        HoldingPnl {
            cost_basis,
            current_value,
            gain_loss,
            gain_loss_percent: if cost_basis > 0.0 {
                gain_loss / cost_basis * 100.0
            } else {
                0.0
            },
        }
    }
}

/// Sum every holding; an empty portfolio totals zero.
#[must_use]
pub fn totals(holdings: &[Holding]) -> PortfolioTotals {
    let (total_cost, total_value) = holdings.iter().fold((0.0, 0.0), |(c, v), h| {
        (c + h.quantity * h.avg_cost, v + h.quantity * h.current_price)
    });
    let total_gain_loss = total_value - total_cost;
    PortfolioTotals {
        total_cost,
        total_value,
        total_gain_loss,
        portfolio_return: if total_cost > 0.0 {
            total_gain_loss / total_cost * 100.0
        } else {
            0.0
        },
    }
}

/// Share of `total_value` held in each position, in percent.
///
/// All zeros when `total_value` is zero.
#[must_use]
pub fn allocation(values: &[f64], total_value: f64) -> Vec<f64> {
    if total_value == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / total_value * 100.0).collect()
}
