use tickerdeck_core::{DataKind, FetchOutcome, Payload, PayloadKind, Ticker};

use crate::Tickerdeck;

impl Tickerdeck {
    /// Untyped entry point: dispatch `kind` to its typed operation.
    ///
    /// Shares the cache with the typed operations, so a price fetched here is
    /// a hit for [`Tickerdeck::prices`] and vice versa.
    ///
    /// # Errors
    /// Same as the typed operation for `kind`.
    pub async fn fetch(&self, ticker: &Ticker, kind: DataKind) -> FetchOutcome<Payload> {
        match kind {
            DataKind::Price { range } => self
                .prices(ticker, range)
                .await
                .map(|s| s.map(PayloadKind::into_payload)),
            DataKind::Financials { statement, period } => self
                .financials(ticker, statement, period)
                .await
                .map(|s| s.map(PayloadKind::into_payload)),
            DataKind::News { window } => self
                .news(ticker, window)
                .await
                .map(|s| s.map(PayloadKind::into_payload)),
            DataKind::Overview => self
                .overview(ticker)
                .await
                .map(|s| s.map(PayloadKind::into_payload)),
        }
    }
}
