//! Configuration types shared across the orchestrator, cache, and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Capability, ProviderId, TickerdeckError};

/// Retry behavior applied to every provider HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one (>= 1).
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each further failure.
    pub base_delay_ms: u64,
    /// Random extra delay as a percentage of the computed delay, in [0, 100].
    pub jitter_percent: u8,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            jitter_percent: 0,
        }
    }
}

/// Circuit breaker thresholds, shared by every (provider, capability) breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakerConfig {
    /// Consecutive failures that open the breaker.
    pub failure_threshold: u32,
    /// How long an open breaker rejects calls after the last failure.
    pub reset_time_ms: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_time_ms: 60_000,
        }
    }
}

impl BreakerConfig {
    /// Reset window as a `Duration`.
    #[must_use]
    pub const fn reset_time(&self) -> Duration {
        Duration::from_millis(self.reset_time_ms)
    }
}

/// Freshness windows for the result cache, one per capability.
///
/// A TTL of zero disables caching for that capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached entries across all kinds.
    pub max_entries: u64,
    /// Price bars; markets move, so this is the shortest window.
    pub price_ttl_ms: u64,
    /// News articles.
    pub news_ttl_ms: u64,
    /// Financial statements change quarterly.
    pub financials_ttl_ms: u64,
    /// Company overview fundamentals.
    pub overview_ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            price_ttl_ms: 120_000,
            news_ttl_ms: 600_000,
            financials_ttl_ms: 86_400_000,
            overview_ttl_ms: 21_600_000,
        }
    }
}

impl CacheConfig {
    /// Freshness window for a capability; `None` when caching is disabled for it.
    #[must_use]
    pub const fn ttl_for(&self, capability: Capability) -> Option<Duration> {
        let ms = match capability {
            Capability::Price => self.price_ttl_ms,
            Capability::News => self.news_ttl_ms,
            Capability::Financials => self.financials_ttl_ms,
            Capability::Overview => self.overview_ttl_ms,
        };
        if ms == 0 {
            None
        } else {
            Some(Duration::from_millis(ms))
        }
    }

    /// Override the window for one capability.
    #[must_use]
    pub fn with_ttl(mut self, capability: Capability, ttl: Duration) -> Self {
        let ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        match capability {
            Capability::Price => self.price_ttl_ms = ms,
            Capability::News => self.news_ttl_ms = ms,
            Capability::Financials => self.financials_ttl_ms = ms,
            Capability::Overview => self.overview_ttl_ms = ms,
        }
        self
    }
}

/// Primary provider and optional single-level fallback for one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPair {
    /// Tried first.
    pub primary: ProviderId,
    /// Tried only when the primary fails with a fallback-eligible error.
    pub secondary: Option<ProviderId>,
}

impl ProviderPair {
    /// Pair with a secondary.
    #[must_use]
    pub const fn new(primary: ProviderId, secondary: ProviderId) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Primary only.
    #[must_use]
    pub const fn single(primary: ProviderId) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }
}

/// Which providers serve which capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Price bars.
    pub price: ProviderPair,
    /// Financial statements.
    pub financials: ProviderPair,
    /// News.
    pub news: ProviderPair,
    /// Company overview.
    pub overview: ProviderPair,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            price: ProviderPair::new(ProviderId::FINNHUB, ProviderId::STOOQ),
            financials: ProviderPair::new(ProviderId::FMP, ProviderId::ALPHA_VANTAGE),
            news: ProviderPair::new(ProviderId::GDELT, ProviderId::FINNHUB),
            overview: ProviderPair::new(ProviderId::FMP, ProviderId::ALPHA_VANTAGE),
        }
    }
}

impl RoutingConfig {
    /// Pair configured for a capability.
    #[must_use]
    pub const fn pair(&self, capability: Capability) -> ProviderPair {
        match capability {
            Capability::Price => self.price,
            Capability::Financials => self.financials,
            Capability::News => self.news,
            Capability::Overview => self.overview,
        }
    }

    /// Replace the pair for a capability.
    pub const fn set_pair(&mut self, capability: Capability, pair: ProviderPair) {
        match capability {
            Capability::Price => self.price = pair,
            Capability::Financials => self.financials = pair,
            Capability::News => self.news = pair,
            Capability::Overview => self.overview = pair,
        }
    }

    /// Environment variable naming the primary provider for a capability.
    #[must_use]
    pub const fn env_var(capability: Capability) -> &'static str {
        match capability {
            Capability::Price => "PRICE_PROVIDER",
            Capability::Financials => "FINANCIAL_PROVIDER",
            Capability::News => "NEWS_PROVIDER",
            Capability::Overview => "OVERVIEW_PROVIDER",
        }
    }

    /// Built-in vendors able to serve a capability, in fallback preference order.
    #[must_use]
    pub const fn candidates(capability: Capability) -> &'static [ProviderId] {
        match capability {
            Capability::Price => &[
                ProviderId::STOOQ,
                ProviderId::FINNHUB,
                ProviderId::ALPHA_VANTAGE,
            ],
            Capability::Financials | Capability::Overview => {
                &[ProviderId::ALPHA_VANTAGE, ProviderId::FMP]
            }
            Capability::News => &[ProviderId::FINNHUB, ProviderId::GDELT],
        }
    }

    /// Pair for a chosen primary: the secondary is the first other candidate.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `primary` cannot serve the capability.
    pub fn pair_for_primary(
        capability: Capability,
        primary: ProviderId,
    ) -> Result<ProviderPair, TickerdeckError> {
        let candidates = Self::candidates(capability);
        if !candidates.contains(&primary) {
            return Err(TickerdeckError::InvalidArg(format!(
                "unknown {capability} provider: {primary}"
            )));
        }
        Ok(ProviderPair {
            primary,
            secondary: candidates.iter().copied().find(|p| *p != primary),
        })
    }

    /// Build routing from an environment-style lookup.
    ///
    /// Unset variables keep the default pair for that capability.
    ///
    /// # Errors
    /// Returns `InvalidArg` when a variable names an unknown or incapable provider.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TickerdeckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut routing = Self::default();
        for capability in Capability::ALL {
            let Some(raw) = lookup(Self::env_var(capability)) else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            let primary = ProviderId::parse_builtin(&raw).map_err(|_| {
                TickerdeckError::InvalidArg(format!("unknown {capability} provider: {raw}"))
            })?;
            if primary == routing.pair(capability).primary {
                continue;
            }
            routing.set_pair(capability, Self::pair_for_primary(capability, primary)?);
        }
        Ok(routing)
    }
}

/// API keys for vendors that require one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// `FINNHUB_API_KEY`.
    pub finnhub: Option<String>,
    /// `FMP_API_KEY`.
    pub fmp: Option<String>,
    /// `ALPHA_VANTAGE_API_KEY`.
    pub alpha_vantage: Option<String>,
}

impl Credentials {
    /// Environment variable holding the key for a provider, if it needs one.
    #[must_use]
    pub fn env_var(provider: ProviderId) -> Option<&'static str> {
        match provider.as_str() {
            "finnhub" => Some("FINNHUB_API_KEY"),
            "fmp" => Some("FMP_API_KEY"),
            "alpha_vantage" => Some("ALPHA_VANTAGE_API_KEY"),
            _ => None,
        }
    }

    /// Read keys from an environment-style lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        Self {
            finnhub: read("FINNHUB_API_KEY"),
            fmp: read("FMP_API_KEY"),
            alpha_vantage: read("ALPHA_VANTAGE_API_KEY"),
        }
    }

    /// Key for a provider.
    ///
    /// # Errors
    /// Returns `Configuration` when the provider needs a key and none is set.
    pub fn key_for(&self, provider: ProviderId) -> Result<Option<&str>, TickerdeckError> {
        let key = match provider.as_str() {
            "finnhub" => &self.finnhub,
            "fmp" => &self.fmp,
            "alpha_vantage" => &self.alpha_vantage,
            _ => return Ok(None),
        };
        match key {
            Some(k) => Ok(Some(k.as_str())),
            None => Err(TickerdeckError::configuration(
                provider.as_str(),
                format!("{} is not set", Self::env_var(provider).unwrap_or("API key")),
            )),
        }
    }
}

/// Global configuration for the `Tickerdeck` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerdeckConfig {
    /// Primary/secondary provider per capability.
    pub routing: RoutingConfig,
    /// Result cache freshness windows.
    pub cache: CacheConfig,
    /// Per-call retry policy.
    pub retry: RetryConfig,
    /// Circuit breaker thresholds.
    pub breaker: BreakerConfig,
    /// Deadline for one provider attempt including its retries.
    pub provider_timeout: Duration,
    /// Timeout for a single HTTP request.
    pub request_timeout: Duration,
}

impl Default for TickerdeckConfig {
    fn default() -> Self {
        Self {
            routing: RoutingConfig::default(),
            cache: CacheConfig::default(),
            retry: RetryConfig::default(),
            breaker: BreakerConfig::default(),
            provider_timeout: Duration::from_secs(45),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl TickerdeckConfig {
    /// Defaults with routing read from an environment-style lookup.
    ///
    /// # Errors
    /// Returns `InvalidArg` when a routing variable names an unknown provider.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TickerdeckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            routing: RoutingConfig::from_lookup(lookup)?,
            ..Self::default()
        })
    }

    /// Defaults with routing read from the process environment.
    ///
    /// # Errors
    /// See [`TickerdeckConfig::from_lookup`].
    pub fn from_env() -> Result<Self, TickerdeckError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }
}
