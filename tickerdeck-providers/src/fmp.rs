//! Financial Modeling Prep: statements and a composed company overview.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tickerdeck_core::{
    BalanceLines, Capability, CashflowLines, FinancialStatement, FinancialsProvider, IncomeLines,
    Overview, OverviewProvider, Period, ProviderId, StatementKind, StatementLines, Ticker,
    TickerdeckConnector, TickerdeckError, fraction_to_percent,
};

use crate::classify::{Fallback, classify_message, parse_json};
use crate::http::{ResilientHttp, endpoint};

/// FMP connector. Needs `FMP_API_KEY`.
#[derive(Debug, Clone)]
pub struct FmpConnector {
    http: ResilientHttp,
    api_key: String,
    base_url: String,
}

impl FmpConnector {
    /// Static connector key for routing configuration.
    pub const KEY: ProviderId = ProviderId::FMP;
    /// Production API root.
    pub const BASE_URL: &'static str = "https://financialmodelingprep.com/api/v3";

    /// Connector using `api_key` and shared HTTP plumbing.
    #[must_use]
    pub fn new(api_key: impl Into<String>, http: ResilientHttp) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Point at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn rows<T: DeserializeOwned>(
        &self,
        capability: Capability,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, TickerdeckError> {
        let mut query = params.to_vec();
        query.push(("apikey", self.api_key.as_str()));
        let url = endpoint(&self.base_url, path, &query)?;
        let body = self.http.get_text(capability, &url).await?;
        parse_rows(&body)
    }

    async fn statement_rows(
        &self,
        ticker: &Ticker,
        statement: StatementKind,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        let path = format!("{}/{}", statement_path(statement), ticker.dotted());
        let rows: Vec<StatementRow> = self
            .rows(
                Capability::Financials,
                &path,
                &[("period", period_param(period)), ("limit", "5")],
            )
            .await?;
        if rows.is_empty() {
            return Err(TickerdeckError::not_found(format!(
                "{statement} statements for {ticker} on fmp"
            )));
        }
        Ok(rows
            .into_iter()
            .map(|r| r.into_statement(ticker, statement))
            .collect())
    }
}

const fn statement_path(statement: StatementKind) -> &'static str {
    match statement {
        StatementKind::Income => "income-statement",
        StatementKind::Balance => "balance-sheet-statement",
        StatementKind::Cashflow => "cash-flow-statement",
    }
}

const fn period_param(period: Period) -> &'static str {
    match period {
        Period::Annual => "annual",
        Period::Quarterly => "quarter",
    }
}

/// Every FMP endpoint answers with an array; failures come back as an
/// object carrying `"Error Message"`.
pub(crate) fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, TickerdeckError> {
    let name = FmpConnector::KEY.as_str();
    let value: serde_json::Value = parse_json(name, body)?;
    if let Some(msg) = value.get("Error Message").and_then(serde_json::Value::as_str) {
        return Err(classify_message(name, msg, Fallback::Forbidden));
    }
    if !value.is_array() {
        return Err(TickerdeckError::not_found("fmp returned no rows"));
    }
    serde_json::from_value(value)
        .map_err(|e| TickerdeckError::Data(format!("{name}: unexpected row shape: {e}")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct StatementRow {
    date: Option<String>,
    filling_date: Option<String>,
    reported_currency: Option<String>,
    revenue: Option<f64>,
    gross_profit: Option<f64>,
    operating_income: Option<f64>,
    net_income: Option<f64>,
    ebitda: Option<f64>,
    total_assets: Option<f64>,
    total_current_assets: Option<f64>,
    total_liabilities: Option<f64>,
    total_current_liabilities: Option<f64>,
    total_stockholders_equity: Option<f64>,
    operating_cash_flow: Option<f64>,
    capital_expenditure: Option<f64>,
    // Misspelled upstream.
    net_cash_used_for_investing_activites: Option<f64>,
    net_cash_used_provided_by_financing_activities: Option<f64>,
}

impl StatementRow {
    pub(crate) fn into_statement(self, ticker: &Ticker, kind: StatementKind) -> FinancialStatement {
        let z = |v: Option<f64>| v.unwrap_or(0.0);
        let lines = match kind {
            StatementKind::Income => StatementLines::Income(IncomeLines {
                total_revenue: z(self.revenue),
                gross_profit: z(self.gross_profit),
                operating_income: z(self.operating_income),
                net_income: z(self.net_income),
                ebitda: z(self.ebitda),
            }),
            StatementKind::Balance => StatementLines::Balance(BalanceLines {
                total_assets: z(self.total_assets),
                total_current_assets: z(self.total_current_assets),
                total_liabilities: z(self.total_liabilities),
                total_current_liabilities: z(self.total_current_liabilities),
                total_shareholder_equity: z(self.total_stockholders_equity),
            }),
            StatementKind::Cashflow => StatementLines::Cashflow(CashflowLines {
                operating_cashflow: z(self.operating_cash_flow),
                capital_expenditures: z(self.capital_expenditure),
                cashflow_from_investment: z(self.net_cash_used_for_investing_activites),
                cashflow_from_financing: z(self.net_cash_used_provided_by_financing_activities),
            }),
        };
        FinancialStatement {
            ticker: ticker.to_string(),
            fiscal_date_ending: self.date.or(self.filling_date).unwrap_or_default(),
            reported_currency: self
                .reported_currency
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "USD".to_string()),
            lines,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Profile {
    company_name: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    mkt_cap: Option<f64>,
    last_div: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Quote {
    price: Option<f64>,
    year_high: Option<f64>,
    year_low: Option<f64>,
    avg_volume: Option<f64>,
    pe: Option<f64>,
    eps: Option<f64>,
    price_to_book: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub(crate) struct RatiosTtm {
    peRatioTTM: Option<f64>,
    forwardPE: Option<f64>,
    pegRatio: Option<f64>,
    priceToBookRatioTTM: Option<f64>,
    priceToSalesRatioTTM: Option<f64>,
    enterpriseValueOverEBITDATTM: Option<f64>,
    netProfitMarginTTM: Option<f64>,
    operatingProfitMarginTTM: Option<f64>,
    returnOnEquityTTM: Option<f64>,
    returnOnAssetsTTM: Option<f64>,
    revenueGrowthTTM: Option<f64>,
    earningsGrowthTTM: Option<f64>,
    debtEquityRatioTTM: Option<f64>,
    currentRatioTTM: Option<f64>,
    quickRatioTTM: Option<f64>,
    payoutRatioTTM: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub(crate) struct KeyMetricsTtm {
    revenuePerShareTTM: Option<f64>,
    bookValuePerShareTTM: Option<f64>,
}

fn nonzero(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x != 0.0)
}

// Ratio endpoints already report whole-number percentages.
fn percent(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite()).map(|x| (x * 100.0).round() / 100.0)
}

/// Compose the overview from the four endpoint payloads.
pub(crate) fn compose_overview(
    profile: Profile,
    quote: Quote,
    ratios: RatiosTtm,
    metrics: KeyMetricsTtm,
) -> Overview {
    let price = nonzero(quote.price);
    let revenue = match (metrics.revenuePerShareTTM, profile.mkt_cap, price) {
        (Some(per_share), Some(cap), Some(p)) => nonzero(Some(per_share * cap / p)),
        _ => None,
    };
    let dividend_yield = match (nonzero(profile.last_div), price) {
        (Some(div), Some(p)) => Some(fraction_to_percent(div / p)),
        _ => None,
    };
    Overview {
        name: profile.company_name.filter(|s| !s.is_empty()),
        sector: profile.sector.filter(|s| !s.is_empty()),
        industry: profile.industry.filter(|s| !s.is_empty()),
        market_cap: nonzero(profile.mkt_cap),
        fifty_two_week_high: nonzero(quote.year_high),
        fifty_two_week_low: nonzero(quote.year_low),
        average_volume: nonzero(quote.avg_volume),
        pe_ratio: nonzero(quote.pe).or(nonzero(ratios.peRatioTTM)),
        forward_pe: nonzero(ratios.forwardPE),
        peg_ratio: nonzero(ratios.pegRatio),
        price_to_book: nonzero(quote.price_to_book).or(nonzero(ratios.priceToBookRatioTTM)),
        price_to_sales: nonzero(ratios.priceToSalesRatioTTM),
        ev_to_ebitda: nonzero(ratios.enterpriseValueOverEBITDATTM),
        profit_margin: percent(ratios.netProfitMarginTTM),
        operating_margin: percent(ratios.operatingProfitMarginTTM),
        return_on_equity: percent(ratios.returnOnEquityTTM),
        return_on_assets: percent(ratios.returnOnAssetsTTM),
        revenue,
        quarterly_revenue_growth: percent(ratios.revenueGrowthTTM),
        quarterly_earnings_growth: percent(ratios.earningsGrowthTTM),
        eps: quote.eps.filter(|x| x.is_finite()),
        debt_to_equity: ratios.debtEquityRatioTTM.filter(|x| x.is_finite()),
        current_ratio: nonzero(ratios.currentRatioTTM),
        quick_ratio: nonzero(ratios.quickRatioTTM),
        book_value: nonzero(metrics.bookValuePerShareTTM),
        dividend_yield,
        dividend_per_share: profile.last_div.filter(|x| x.is_finite()),
        payout_ratio: percent(ratios.payoutRatioTTM),
    }
}

impl TickerdeckConnector for FmpConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Financial Modeling Prep"
    }

    fn as_financials_provider(&self) -> Option<&dyn FinancialsProvider> {
        Some(self as &dyn FinancialsProvider)
    }

    fn as_overview_provider(&self) -> Option<&dyn OverviewProvider> {
        Some(self as &dyn OverviewProvider)
    }
}

#[async_trait]
impl FinancialsProvider for FmpConnector {
    async fn income_statement(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statement_rows(ticker, StatementKind::Income, period).await
    }

    async fn balance_sheet(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statement_rows(ticker, StatementKind::Balance, period).await
    }

    async fn cash_flow(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statement_rows(ticker, StatementKind::Cashflow, period).await
    }
}

#[async_trait]
impl OverviewProvider for FmpConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tickerdeck::providers",
            name = "fmp::overview",
            skip(self),
            fields(ticker = %ticker),
        )
    )]
    async fn overview(&self, ticker: &Ticker) -> Result<Overview, TickerdeckError> {
        let symbol = ticker.dotted();
        let cap = Capability::Overview;
        let profile_path = format!("profile/{symbol}");
        let quote_path = format!("quote/{symbol}");
        let ratios_path = format!("ratios-ttm/{symbol}");
        let metrics_path = format!("key-metrics-ttm/{symbol}");
        let (profiles, quotes, ratios, metrics) = futures::try_join!(
            self.rows::<Profile>(cap, &profile_path, &[]),
            self.rows::<Quote>(cap, &quote_path, &[]),
            self.rows::<RatiosTtm>(cap, &ratios_path, &[]),
            self.rows::<KeyMetricsTtm>(cap, &metrics_path, &[]),
        )?;
        let (Some(profile), Some(quote)) = (profiles.into_iter().next(), quotes.into_iter().next())
        else {
            return Err(TickerdeckError::not_found(format!(
                "overview for {ticker} on fmp"
            )));
        };
        Ok(compose_overview(
            profile,
            quote,
            ratios.into_iter().next().unwrap_or_default(),
            metrics.into_iter().next().unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_defaults_to_forbidden() {
        let err = parse_rows::<StatementRow>(r#"{"Error Message":"Limit Reach . Please upgrade"}"#)
            .unwrap_err();
        assert!(matches!(err, TickerdeckError::Forbidden { .. }));
        let rl = parse_rows::<StatementRow>(r#"{"Error Message":"Rate limit exceeded"}"#)
            .unwrap_err();
        assert!(matches!(rl, TickerdeckError::RateLimited { .. }));
    }

    #[test]
    fn statement_row_maps_cash_flow() {
        let rows: Vec<StatementRow> = parse_rows(
            r#"[{"date":"2023-09-30","reportedCurrency":"USD","operatingCashFlow":110543000000,
                "capitalExpenditure":-10959000000,"netCashUsedForInvestingActivites":3705000000,
                "netCashUsedProvidedByFinancingActivities":-108488000000}]"#,
        )
        .unwrap();
        let t = Ticker::parse("AAPL").unwrap();
        let stmt = rows
            .into_iter()
            .next()
            .unwrap()
            .into_statement(&t, StatementKind::Cashflow);
        let cf = stmt.cashflow().unwrap();
        assert_eq!(cf.capital_expenditures, -10_959_000_000.0);
        assert_eq!(cf.cashflow_from_investment, 3_705_000_000.0);
        assert_eq!(stmt.fiscal_date_ending, "2023-09-30");
    }

    #[test]
    fn filling_date_and_currency_defaults() {
        let row: StatementRow =
            serde_json::from_str(r#"{"fillingDate":"2023-11-03","revenue":1.0}"#).unwrap();
        let t = Ticker::parse("AAPL").unwrap();
        let stmt = row.into_statement(&t, StatementKind::Income);
        assert_eq!(stmt.fiscal_date_ending, "2023-11-03");
        assert_eq!(stmt.reported_currency, "USD");
        assert_eq!(stmt.income().unwrap().total_revenue, 1.0);
    }

    #[test]
    fn overview_prefers_quote_and_derives_revenue() {
        let profile: Profile = serde_json::from_str(
            r#"{"companyName":"Apple Inc.","sector":"Technology","mktCap":3000,"lastDiv":0.96}"#,
        )
        .unwrap();
        let quote: Quote =
            serde_json::from_str(r#"{"price":192.0,"pe":0,"eps":6.13,"yearHigh":199.62}"#).unwrap();
        let ratios: RatiosTtm = serde_json::from_str(
            r#"{"peRatioTTM":31.3,"netProfitMarginTTM":25.306,"debtEquityRatioTTM":1.8}"#,
        )
        .unwrap();
        let metrics: KeyMetricsTtm = serde_json::from_str(r#"{"revenuePerShareTTM":24.32}"#).unwrap();

        let o = compose_overview(profile, quote, ratios, metrics);
        assert_eq!(o.name.as_deref(), Some("Apple Inc."));
        assert_eq!(o.pe_ratio, Some(31.3), "zero quote PE falls through to ratios");
        assert_eq!(o.profit_margin, Some(25.31));
        assert!((o.revenue.unwrap() - 24.32 * 3000.0 / 192.0).abs() < 1e-9);
        assert_eq!(o.dividend_yield, Some(0.5));
        assert_eq!(o.forward_pe, None);
        assert_eq!(o.book_value, None);
    }
}
