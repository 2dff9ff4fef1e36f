use tickerdeck_core::{
    BalanceLines, CashflowLines, FinancialStatement, IncomeLines, Overview, Period, StatementKind,
    StatementLines,
};

fn statement(symbol: &str, date: &str, lines: StatementLines) -> FinancialStatement {
    FinancialStatement {
        ticker: symbol.to_string(),
        fiscal_date_ending: date.to_string(),
        reported_currency: "USD".to_string(),
        lines,
    }
}

const ANNUAL: [&str; 2] = ["2023-09-30", "2022-09-30"];
const QUARTERLY: [&str; 2] = ["2023-12-30", "2023-09-30"];

/// Two periods of statements, most recent first.
pub fn statements(
    symbol: &str,
    kind: StatementKind,
    period: Period,
) -> Option<Vec<FinancialStatement>> {
    // (revenue, scale) per fixture company
    let (revenue, scale) = match symbol {
        "AAPL" => (383_285_000_000.0, 1.0),
        "MSFT" => (211_915_000_000.0, 0.6),
        _ => return None,
    };
    let dates = match period {
        Period::Annual => ANNUAL,
        Period::Quarterly => QUARTERLY,
    };
    let divisor = match period {
        Period::Annual => 1.0,
        Period::Quarterly => 4.0,
    };
    let rows = dates
        .iter()
        .zip([1.0, 0.97])
        .map(|(date, growth)| {
            let rev = revenue * growth / divisor;
            let lines = match kind {
                StatementKind::Income => StatementLines::Income(IncomeLines {
                    total_revenue: rev,
                    gross_profit: rev * 0.44,
                    operating_income: rev * 0.30,
                    net_income: rev * 0.25,
                    ebitda: rev * 0.33,
                }),
                StatementKind::Balance => StatementLines::Balance(BalanceLines {
                    total_assets: 352_583_000_000.0 * scale,
                    total_current_assets: 143_566_000_000.0 * scale,
                    total_liabilities: 290_437_000_000.0 * scale,
                    total_current_liabilities: 145_308_000_000.0 * scale,
                    total_shareholder_equity: 62_146_000_000.0 * scale,
                }),
                StatementKind::Cashflow => StatementLines::Cashflow(CashflowLines {
                    operating_cashflow: rev * 0.29,
                    capital_expenditures: -rev * 0.03,
                    cashflow_from_investment: rev * 0.01,
                    cashflow_from_financing: -rev * 0.28,
                }),
            };
            statement(symbol, date, lines)
        })
        .collect();
    Some(rows)
}

/// Company overview for a fixture symbol.
pub fn overview(symbol: &str) -> Option<Overview> {
    match symbol {
        "AAPL" => Some(Overview {
            name: Some("Apple Inc".into()),
            sector: Some("Technology".into()),
            industry: Some("Consumer Electronics".into()),
            market_cap: Some(2_800_000_000_000.0),
            fifty_two_week_high: Some(199.62),
            fifty_two_week_low: Some(164.08),
            pe_ratio: Some(28.5),
            forward_pe: Some(26.0),
            peg_ratio: Some(2.1),
            price_to_book: Some(45.0),
            profit_margin: Some(25.31),
            operating_margin: Some(30.13),
            return_on_equity: Some(147.25),
            return_on_assets: Some(22.07),
            quarterly_revenue_growth: Some(2.1),
            quarterly_earnings_growth: Some(13.1),
            eps: Some(6.42),
            debt_to_equity: Some(1.8),
            dividend_yield: Some(0.5),
            dividend_per_share: Some(0.96),
            ..Overview::default()
        }),
        "MSFT" => Some(Overview {
            name: Some("Microsoft Corporation".into()),
            sector: Some("Technology".into()),
            industry: Some("Software".into()),
            market_cap: Some(3_050_000_000_000.0),
            pe_ratio: Some(36.0),
            peg_ratio: Some(2.3),
            price_to_book: Some(12.5),
            profit_margin: Some(36.27),
            operating_margin: Some(44.6),
            return_on_equity: Some(38.5),
            quarterly_revenue_growth: Some(17.6),
            quarterly_earnings_growth: Some(33.2),
            debt_to_equity: Some(0.35),
            ..Overview::default()
        }),
        _ => None,
    }
}
