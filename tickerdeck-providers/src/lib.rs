//! HTTP connectors for the tickerdeck workspace.
//!
//! Every vendor issues its requests through [`ResilientHttp`], which wraps an
//! injectable [`HttpTransport`] in a per-(provider, capability) circuit breaker
//! and a transport-only retry policy. Vendor field names stay inside each
//! module's wire structs and mapping functions.
//!
//! | Connector | Price | Financials | News | Overview | Key |
//! |---|---|---|---|---|---|
//! | [`FinnhubConnector`] | yes | | yes | | `FINNHUB_API_KEY` |
//! | [`StooqConnector`] | yes | | | | none |
//! | [`FmpConnector`] | | yes | | yes | `FMP_API_KEY` |
//! | [`AlphaVantageConnector`] | yes | yes | | yes | `ALPHA_VANTAGE_API_KEY` |
//! | [`GdeltConnector`] | | | yes | | none |
#![warn(missing_docs)]

mod alpha_vantage;
/// Status and vendor-message classification.
pub mod classify;
mod factory;
mod finnhub;
mod fmp;
mod gdelt;
mod http;
mod stooq;
mod transport;

pub use alpha_vantage::AlphaVantageConnector;
pub use factory::ConnectorFactory;
pub use finnhub::FinnhubConnector;
pub use fmp::FmpConnector;
pub use gdelt::{GdeltConnector, search_term};
pub use http::{ResilientHttp, endpoint};
pub use stooq::StooqConnector;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
