//! tickerdeck-core
//!
//! Traits and building blocks shared across the tickerdeck crates.
//!
//! - `connector`: the `TickerdeckConnector` trait and per-capability provider traits.
//! - `resilience`: retry with backoff, circuit breakers, primary/secondary fallback.
//! - `analytics`: pure metrics computed from fetched payloads.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Retry backoff, breaker cooldowns and fallback deadlines all use
//! `tokio::time`, so callers must run under a Tokio 1.x runtime. Tests can
//! pause the clock and advance it instead of sleeping.
#![warn(missing_docs)]

pub mod analytics;
/// Connector capability traits and the primary `TickerdeckConnector` interface.
pub mod connector;
/// Retry, circuit breaking and fallback.
pub mod resilience;

pub use connector::{
    FinancialsProvider, NewsProvider, OverviewProvider, PriceProvider, TickerdeckConnector,
};
pub use resilience::{
    Attempt, BreakerSnapshot, CircuitBreaker, CircuitBreakerRegistry, FallbackCoordinator,
    RetryPolicy, with_fallback,
};
pub use tickerdeck_types::*;
