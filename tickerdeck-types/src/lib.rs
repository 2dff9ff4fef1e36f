//! Tickerdeck-specific data transfer objects, error taxonomy, and configuration primitives.
#![warn(missing_docs)]

mod capability;
/// Configuration structs for routing, caching, retries, and circuit breakers.
pub mod config;
mod connector;
mod error;
mod kind;
mod model;
mod payload;
mod ticker;

pub use capability::Capability;
pub use config::{
    BreakerConfig, CacheConfig, Credentials, ProviderPair, RetryConfig, RoutingConfig,
    TickerdeckConfig,
};
pub use connector::ProviderId;
pub use error::{ErrorKind, TickerdeckError};
pub use kind::{DataKind, NewsWindow, Period, StatementKind, TimeRange};
pub use model::{
    BalanceLines, CashflowLines, FinancialStatement, IncomeLines, NewsArticle, Overview, PriceBar,
    Sentiment, StatementLines, fraction_to_percent,
};
pub use payload::{FetchOutcome, Payload, PayloadKind, Sourced};
pub use ticker::Ticker;
