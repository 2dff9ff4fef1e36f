//! Ratios derived from the latest (first) statement of each kind.

use serde::Serialize;
use tickerdeck_types::{FinancialStatement, TickerdeckError};

/// Margins and growth from income statements, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeMetrics {
    /// Gross profit over revenue.
    pub gross_margin: f64,
    /// Operating income over revenue.
    pub operating_margin: f64,
    /// Net income over revenue.
    pub net_margin: f64,
    /// Revenue change against the prior statement.
    pub revenue_growth_yoy: f64,
}

/// Liquidity and leverage ratios from balance sheets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceMetrics {
    /// Current assets over current liabilities.
    pub current_ratio: f64,
    /// Total liabilities over shareholder equity.
    pub debt_to_equity: f64,
}

/// Free cash flow figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashflowMetrics {
    /// Operating cash flow minus the magnitude of capital expenditures.
    pub free_cash_flow: f64,
    /// Free cash flow over the latest revenue, in percent.
    pub fcf_margin: f64,
}

/// Metrics for whichever statement kind was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatementMetrics {
    #[allow(missing_docs)]
    Income(IncomeMetrics),
    #[allow(missing_docs)]
    Balance(BalanceMetrics),
    #[allow(missing_docs)]
    Cashflow(CashflowMetrics),
}

fn ratio_pct(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den * 100.0 } else { 0.0 }
}

fn revenue_of(statements: &[FinancialStatement], idx: usize) -> Option<f64> {
    statements.get(idx)?.income().map(|l| l.total_revenue)
}

/// Income metrics for a newest-first income statement series.
///
/// Margins are zero when revenue is not positive. Growth is zero without a
/// prior statement or when prior revenue is not positive.
///
/// # Errors
/// Returns `Data` when the series is empty or does not hold income statements.
pub fn income_metrics(statements: &[FinancialStatement]) -> Result<IncomeMetrics, TickerdeckError> {
    let latest = statements
        .first()
        .and_then(FinancialStatement::income)
        .ok_or_else(|| TickerdeckError::Data("No income statement data".into()))?;
    let revenue = latest.total_revenue;
    let revenue_growth_yoy = match revenue_of(statements, 1) {
        Some(prior) if prior > 0.0 => (revenue - prior) / prior * 100.0,
        _ => 0.0,
    };
    Ok(IncomeMetrics {
        gross_margin: ratio_pct(latest.gross_profit, revenue),
        operating_margin: ratio_pct(latest.operating_income, revenue),
        net_margin: ratio_pct(latest.net_income, revenue),
        revenue_growth_yoy,
    })
}

/// Balance metrics for a newest-first balance sheet series.
///
/// # Errors
/// Returns `Data` when the series is empty or does not hold balance sheets.
pub fn balance_metrics(
    statements: &[FinancialStatement],
) -> Result<BalanceMetrics, TickerdeckError> {
    let latest = statements
        .first()
        .and_then(FinancialStatement::balance)
        .ok_or_else(|| TickerdeckError::Data("No balance sheet data".into()))?;
    let current_ratio = if latest.total_current_liabilities > 0.0 {
        latest.total_current_assets / latest.total_current_liabilities
    } else {
        0.0
    };
    let debt_to_equity = if latest.total_shareholder_equity > 0.0 {
        latest.total_liabilities / latest.total_shareholder_equity
    } else {
        0.0
    };
    Ok(BalanceMetrics {
        current_ratio,
        debt_to_equity,
    })
}

/// Cash flow metrics; `income` supplies revenue for the margin and may be empty.
///
/// # Errors
/// Returns `Data` when `cashflow` is empty or does not hold cash flow statements.
pub fn cashflow_metrics(
    cashflow: &[FinancialStatement],
    income: &[FinancialStatement],
) -> Result<CashflowMetrics, TickerdeckError> {
    let latest = cashflow
        .first()
        .and_then(FinancialStatement::cashflow)
        .ok_or_else(|| TickerdeckError::Data("No cash flow data".into()))?;
    let free_cash_flow = latest.operating_cashflow - latest.capital_expenditures.abs();
    let fcf_margin = ratio_pct(free_cash_flow, revenue_of(income, 0).unwrap_or(0.0));
    Ok(CashflowMetrics {
        free_cash_flow,
        fcf_margin,
    })
}
