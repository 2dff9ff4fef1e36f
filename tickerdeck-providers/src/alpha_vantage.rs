//! Alpha Vantage: daily series, statements and the flat OVERVIEW document.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tickerdeck_core::{
    BalanceLines, Capability, CashflowLines, FinancialStatement, FinancialsProvider, IncomeLines,
    Overview, OverviewProvider, Period, PriceBar, PriceProvider, ProviderId, StatementKind,
    StatementLines, Ticker, TickerdeckConnector, TickerdeckError, TimeRange, fraction_to_percent,
};

use crate::classify::{Fallback, classify_message, parse_json};
use crate::http::{ResilientHttp, endpoint};

/// Alpha Vantage connector. Needs `ALPHA_VANTAGE_API_KEY`.
#[derive(Debug, Clone)]
pub struct AlphaVantageConnector {
    http: ResilientHttp,
    api_key: String,
    base_url: String,
}

impl AlphaVantageConnector {
    /// Static connector key for routing configuration.
    pub const KEY: ProviderId = ProviderId::ALPHA_VANTAGE;
    /// Production query endpoint.
    pub const BASE_URL: &'static str = "https://www.alphavantage.co/query";

    /// Connector using `api_key` and shared HTTP plumbing.
    #[must_use]
    pub fn new(api_key: impl Into<String>, http: ResilientHttp) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: Self::BASE_URL.to_string(),
        }
    }

    /// Point at a different query endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn query(
        &self,
        capability: Capability,
        function: &str,
        ticker: &Ticker,
        extra: &[(&str, &str)],
    ) -> Result<Map<String, Value>, TickerdeckError> {
        let symbol = ticker.dotted();
        let mut params = vec![("function", function), ("symbol", symbol.as_str())];
        params.extend_from_slice(extra);
        params.push(("apikey", self.api_key.as_str()));
        let url = endpoint(&self.base_url, "", &params)?;
        let body = self.http.get_text(capability, &url).await?;
        check_body(ticker, parse_json(self.name(), &body)?)
    }

    async fn statements_for(
        &self,
        ticker: &Ticker,
        statement: StatementKind,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        let function = match statement {
            StatementKind::Income => "INCOME_STATEMENT",
            StatementKind::Balance => "BALANCE_SHEET",
            StatementKind::Cashflow => "CASH_FLOW",
        };
        let doc = self
            .query(Capability::Financials, function, ticker, &[])
            .await?;
        map_statements(ticker, statement, period, &doc)
    }
}

/// Reject the vendor's in-band error documents.
///
/// Alpha Vantage answers quota exhaustion with HTTP 200 and a `Note` or
/// `Information` field, and unknown symbols with `Error Message` or `{}`.
pub(crate) fn check_body(
    ticker: &Ticker,
    value: Value,
) -> Result<Map<String, Value>, TickerdeckError> {
    let name = AlphaVantageConnector::KEY.as_str();
    let Value::Object(doc) = value else {
        return Err(TickerdeckError::Data(format!(
            "{name}: expected a JSON object"
        )));
    };
    if doc.is_empty() {
        return Err(TickerdeckError::not_found(format!("{ticker} on alpha_vantage")));
    }
    if let Some(msg) = doc.get("Error Message").and_then(Value::as_str) {
        return Err(classify_message(name, msg, Fallback::NotFound));
    }
    for key in ["Note", "Information"] {
        if let Some(msg) = doc.get(key).and_then(Value::as_str) {
            return Err(classify_message(name, msg, Fallback::RateLimited));
        }
    }
    Ok(doc)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DailyRow {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Map `Time Series (Daily)` into newest-first bars inside the range cutoff.
pub(crate) fn map_daily(
    ticker: &Ticker,
    range: TimeRange,
    today: NaiveDate,
    doc: &Map<String, Value>,
) -> Result<Vec<PriceBar>, TickerdeckError> {
    let name = AlphaVantageConnector::KEY.as_str();
    let Some(series) = doc.get("Time Series (Daily)") else {
        return Err(TickerdeckError::not_found(format!(
            "no price data available for {ticker}"
        )));
    };
    let rows: BTreeMap<NaiveDate, DailyRow> = serde_json::from_value(series.clone())
        .map_err(|e| TickerdeckError::Data(format!("{name}: bad daily series: {e}")))?;
    let cutoff = range
        .cutoff_days()
        .and_then(|d| today.checked_sub_days(Days::new(d)));
    let num = |s: &str| s.trim().parse::<f64>().unwrap_or(0.0);
    Ok(rows
        .into_iter()
        .rev()
        .filter(|(date, _)| cutoff.is_none_or(|c| *date >= c))
        .map(|(date, row)| PriceBar {
            ticker: ticker.to_string(),
            date,
            open: num(&row.open),
            high: num(&row.high),
            low: num(&row.low),
            close: num(&row.close),
            volume: row.volume.trim().parse().unwrap_or(0),
        })
        .collect())
}

fn field(report: &Map<String, Value>, key: &str) -> f64 {
    match report.get(key) {
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Map `annualReports` or `quarterlyReports` into statements.
pub(crate) fn map_statements(
    ticker: &Ticker,
    statement: StatementKind,
    period: Period,
    doc: &Map<String, Value>,
) -> Result<Vec<FinancialStatement>, TickerdeckError> {
    let key = match period {
        Period::Annual => "annualReports",
        Period::Quarterly => "quarterlyReports",
    };
    let Some(Value::Array(reports)) = doc.get(key) else {
        return Err(TickerdeckError::not_found(format!(
            "{statement} statements for {ticker} on alpha_vantage"
        )));
    };
    Ok(reports
        .iter()
        .filter_map(Value::as_object)
        .map(|r| {
            let lines = match statement {
                StatementKind::Income => StatementLines::Income(IncomeLines {
                    total_revenue: field(r, "totalRevenue"),
                    gross_profit: field(r, "grossProfit"),
                    operating_income: field(r, "operatingIncome"),
                    net_income: field(r, "netIncome"),
                    ebitda: field(r, "ebitda"),
                }),
                StatementKind::Balance => StatementLines::Balance(BalanceLines {
                    total_assets: field(r, "totalAssets"),
                    total_current_assets: field(r, "totalCurrentAssets"),
                    total_liabilities: field(r, "totalLiabilities"),
                    total_current_liabilities: field(r, "totalCurrentLiabilities"),
                    total_shareholder_equity: field(r, "totalShareholderEquity"),
                }),
                StatementKind::Cashflow => StatementLines::Cashflow(CashflowLines {
                    operating_cashflow: field(r, "operatingCashflow"),
                    capital_expenditures: field(r, "capitalExpenditures"),
                    cashflow_from_investment: field(r, "cashflowFromInvestment"),
                    cashflow_from_financing: field(r, "cashflowFromFinancing"),
                }),
            };
            let text = |k: &str| r.get(k).and_then(Value::as_str).map(str::to_string);
            FinancialStatement {
                ticker: ticker.to_string(),
                fiscal_date_ending: text("fiscalDateEnding").unwrap_or_default(),
                reported_currency: text("reportedCurrency")
                    .filter(|c| !c.is_empty() && c != "None")
                    .unwrap_or_else(|| "USD".to_string()),
                lines,
            }
        })
        .collect())
}

fn opt_num(doc: &Map<String, Value>, key: &str) -> Option<f64> {
    let raw = doc.get(key)?.as_str()?.trim();
    if raw.is_empty() || raw == "None" || raw == "-" {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn opt_text(doc: &Map<String, Value>, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "None")
        .map(str::to_string)
}

/// Map the OVERVIEW document. Ratio fields arrive as fractions.
pub(crate) fn map_overview(doc: &Map<String, Value>) -> Overview {
    let pct = |key: &str| opt_num(doc, key).map(fraction_to_percent);
    let num = |key: &str| opt_num(doc, key);
    Overview {
        name: opt_text(doc, "Name"),
        sector: opt_text(doc, "Sector"),
        industry: opt_text(doc, "Industry"),
        market_cap: num("MarketCapitalization"),
        fifty_two_week_high: num("52WeekHigh"),
        fifty_two_week_low: num("52WeekLow"),
        average_volume: num("Volume"),
        pe_ratio: num("PERatio"),
        forward_pe: num("ForwardPE"),
        peg_ratio: num("PEGRatio"),
        price_to_book: num("PriceToBookRatio"),
        price_to_sales: num("PriceToSalesRatioTTM"),
        ev_to_ebitda: num("EVToEBITDA"),
        profit_margin: pct("ProfitMargin"),
        operating_margin: pct("OperatingMarginTTM"),
        return_on_equity: pct("ReturnOnEquityTTM"),
        return_on_assets: pct("ReturnOnAssetsTTM"),
        revenue: num("RevenueTTM"),
        quarterly_revenue_growth: pct("QuarterlyRevenueGrowthYOY"),
        quarterly_earnings_growth: pct("QuarterlyEarningsGrowthYOY"),
        eps: num("DilutedEPSTTM"),
        debt_to_equity: num("DebtToEquity"),
        current_ratio: num("CurrentRatio"),
        quick_ratio: num("QuickRatio"),
        book_value: num("BookValue"),
        dividend_yield: pct("DividendYield"),
        dividend_per_share: num("DividendPerShare"),
        payout_ratio: pct("PayoutRatio"),
    }
}

impl TickerdeckConnector for AlphaVantageConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Alpha Vantage"
    }

    fn as_price_provider(&self) -> Option<&dyn PriceProvider> {
        Some(self as &dyn PriceProvider)
    }

    fn as_financials_provider(&self) -> Option<&dyn FinancialsProvider> {
        Some(self as &dyn FinancialsProvider)
    }

    fn as_overview_provider(&self) -> Option<&dyn OverviewProvider> {
        Some(self as &dyn OverviewProvider)
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tickerdeck::providers",
            name = "alpha_vantage::prices",
            skip(self),
            fields(ticker = %ticker, range = %range),
        )
    )]
    async fn prices(
        &self,
        ticker: &Ticker,
        range: TimeRange,
    ) -> Result<Vec<PriceBar>, TickerdeckError> {
        let size = if range.needs_full_history() {
            "full"
        } else {
            "compact"
        };
        let doc = self
            .query(
                Capability::Price,
                "TIME_SERIES_DAILY",
                ticker,
                &[("outputsize", size)],
            )
            .await?;
        map_daily(ticker, range, Utc::now().date_naive(), &doc)
    }
}

#[async_trait]
impl FinancialsProvider for AlphaVantageConnector {
    async fn income_statement(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Income, period)
            .await
    }

    async fn balance_sheet(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Balance, period)
            .await
    }

    async fn cash_flow(
        &self,
        ticker: &Ticker,
        period: Period,
    ) -> Result<Vec<FinancialStatement>, TickerdeckError> {
        self.statements_for(ticker, StatementKind::Cashflow, period)
            .await
    }
}

#[async_trait]
impl OverviewProvider for AlphaVantageConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "tickerdeck::providers",
            name = "alpha_vantage::overview",
            skip(self),
            fields(ticker = %ticker),
        )
    )]
    async fn overview(&self, ticker: &Ticker) -> Result<Overview, TickerdeckError> {
        let doc = self
            .query(Capability::Overview, "OVERVIEW", ticker, &[])
            .await?;
        Ok(map_overview(&doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> Result<Map<String, Value>, TickerdeckError> {
        check_body(
            &Ticker::parse("AAPL").unwrap(),
            serde_json::from_str(json).unwrap(),
        )
    }

    #[test]
    fn in_band_errors() {
        assert!(matches!(doc("{}"), Err(TickerdeckError::NotFound { .. })));
        assert!(matches!(
            doc(r#"{"Error Message":"Invalid API call."}"#),
            Err(TickerdeckError::NotFound { .. })
        ));
        assert!(matches!(
            doc(r#"{"Note":"Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute"}"#),
            Err(TickerdeckError::RateLimited { .. })
        ));
        assert!(matches!(
            doc(r#"{"Information":"Please subscribe to a premium plan"}"#),
            Err(TickerdeckError::RateLimited { .. })
        ));
    }

    #[test]
    fn daily_series_is_cut_and_sorted() {
        let d = doc(r#"{"Time Series (Daily)":{
            "2024-03-01":{"1. open":"1","2. high":"2","3. low":"0.5","4. close":"1.5","5. volume":"100"},
            "2024-02-29":{"1. open":"1","2. high":"2","3. low":"0.5","4. close":"1.4","5. volume":"90"},
            "2024-01-02":{"1. open":"1","2. high":"2","3. low":"0.5","4. close":"1.0","5. volume":"80"}}}"#)
        .unwrap();
        let t = Ticker::parse("AAPL").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let week = map_daily(&t, TimeRange::OneWeek, today, &d).unwrap();
        assert_eq!(week.len(), 2);
        assert_eq!(week[0].date, today);
        assert_eq!(week[1].close, 1.4);
        let max = map_daily(&t, TimeRange::Max, today, &d).unwrap();
        assert_eq!(max.len(), 3);
    }

    #[test]
    fn statements_read_string_numbers() {
        let d = doc(r#"{"symbol":"AAPL","annualReports":[{"fiscalDateEnding":"2023-09-30",
            "reportedCurrency":"USD","totalAssets":"352583000000","totalCurrentAssets":"None",
            "totalLiabilities":"290437000000","totalCurrentLiabilities":"145308000000",
            "totalShareholderEquity":"62146000000"}]}"#)
        .unwrap();
        let t = Ticker::parse("AAPL").unwrap();
        let out = map_statements(&t, StatementKind::Balance, Period::Annual, &d).unwrap();
        let b = out[0].balance().unwrap();
        assert_eq!(b.total_assets, 352_583_000_000.0);
        assert_eq!(b.total_current_assets, 0.0);
        assert!(matches!(
            map_statements(&t, StatementKind::Balance, Period::Quarterly, &d),
            Err(TickerdeckError::NotFound { .. })
        ));
    }

    #[test]
    fn overview_converts_fractions() {
        let d = doc(r#"{"Name":"Apple Inc","Sector":"TECHNOLOGY","PERatio":"29.5",
            "ProfitMargin":"0.253","DividendYield":"0.0044","ForwardPE":"-","PEGRatio":"None"}"#)
        .unwrap();
        let o = map_overview(&d);
        assert_eq!(o.name.as_deref(), Some("Apple Inc"));
        assert_eq!(o.pe_ratio, Some(29.5));
        assert_eq!(o.profit_margin, Some(25.3));
        assert_eq!(o.dividend_yield, Some(0.44));
        assert_eq!(o.forward_pe, None);
        assert_eq!(o.peg_ratio, None);
    }
}
