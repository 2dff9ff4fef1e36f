//! Tickerdeck routes stock-data requests across market data providers.
//!
//! Overview
//! - Each capability (price, financials, news, overview) is served by one
//!   primary connector with an optional secondary.
//! - The secondary runs only when the primary fails with a fallback-eligible
//!   error (rate limits, auth, transport, timeouts, open breakers, missing or
//!   malformed data). Invalid arguments propagate untouched.
//! - Successful results are cached per ticker and parameters with a TTL per
//!   capability and tagged with the provider that served them.
//! - Concurrent misses on one key share a single upstream fetch.
//!
//! Key behaviors and trade-offs
//! - Fallback is single-level: the secondary's outcome is final, so a failed
//!   pair surfaces the secondary's error.
//! - The per-provider deadline bounds each attempt including its HTTP retries;
//!   a stalled primary costs at most one deadline before the secondary runs.
//! - Errors are never cached. A provider that keeps failing is shielded by
//!   its circuit breaker instead.
//!
//! Examples
//! Building an orchestrator over explicit connectors:
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickerdeck::{Capability, ProviderId, Ticker, Tickerdeck, TimeRange};
//!
//! let deck = Tickerdeck::builder()
//!     .with_connector(Arc::new(finnhub))
//!     .with_connector(Arc::new(stooq))
//!     .route(Capability::Price, ProviderId::FINNHUB, Some(ProviderId::STOOQ))
//!     .build()?;
//!
//! let aapl = Ticker::parse("aapl")?;
//! let bars = deck.prices(&aapl, TimeRange::OneMonth).await?;
//! println!("{} bars from {}", bars.value.len(), bars.provider);
//! ```
//!
//! Configuring everything from the environment:
//! ```rust,ignore
//! let deck = tickerdeck::Tickerdeck::from_env()?;
//! let view = deck.overview_view(&tickerdeck::Ticker::parse("MSFT")?).await?;
//! ```
//!
//! See `tickerdeck/examples/` for a runnable demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod env;
mod router;
pub mod views;

pub use crate::core::{Tickerdeck, TickerdeckBuilder};
pub use views::{ComparisonSeries, FinancialsView, NewsView, OverviewView, PriceView};

pub use tickerdeck_cache::ResultCache;
pub use tickerdeck_core::analytics;
pub use tickerdeck_providers::{ConnectorFactory, HttpResponse, HttpTransport, ReqwestTransport};

// Re-export core types for convenience
pub use tickerdeck_core::{
    BreakerConfig,
    BreakerSnapshot,
    CacheConfig,
    Capability,
    CircuitBreakerRegistry,
    Credentials,
    DataKind,
    ErrorKind,
    FetchOutcome,
    FinancialStatement,
    NewsArticle,
    NewsWindow,
    Overview,
    Payload,
    Period,
    PriceBar,
    ProviderId,
    ProviderPair,
    RetryConfig,
    RetryPolicy,
    RoutingConfig,
    Sentiment,
    Sourced,
    StatementKind,
    Ticker,
    TickerdeckConfig,
    TickerdeckConnector,
    TickerdeckError,
    TimeRange,
};
