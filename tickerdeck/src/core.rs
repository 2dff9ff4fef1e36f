use std::sync::Arc;
use std::time::Duration;

use tickerdeck_cache::ResultCache;
use tickerdeck_core::{
    Attempt, BreakerSnapshot, CacheConfig, Capability, CircuitBreakerRegistry, DataKind,
    FallbackCoordinator, FetchOutcome, PayloadKind, ProviderId, ProviderPair, RoutingConfig,
    Ticker, TickerdeckConfig, TickerdeckConnector, TickerdeckError,
};

/// Connectors resolved for one capability.
#[derive(Clone)]
pub(crate) struct Route {
    pub(crate) primary: Arc<dyn TickerdeckConnector>,
    pub(crate) secondary: Option<Arc<dyn TickerdeckConnector>>,
}

/// Orchestrator that routes each capability to a primary provider with an
/// optional secondary, behind a shared result cache.
pub struct Tickerdeck {
    pub(crate) connectors: Vec<Arc<dyn TickerdeckConnector>>,
    routes: [Option<Route>; 4],
    pub(crate) cache: ResultCache,
    pub(crate) cache_cfg: CacheConfig,
    provider_timeout: Option<Duration>,
    breakers: Option<Arc<CircuitBreakerRegistry>>,
}

impl std::fmt::Debug for Tickerdeck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connectors: Vec<&str> = self.connectors.iter().map(|c| c.name()).collect();
        f.debug_struct("Tickerdeck")
            .field("connectors", &connectors)
            .field("routing", &self.routing())
            .field("cache", &self.cache)
            .field("provider_timeout", &self.provider_timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Tickerdeck`].
pub struct TickerdeckBuilder {
    connectors: Vec<Arc<dyn TickerdeckConnector>>,
    routing: RoutingConfig,
    cache_cfg: CacheConfig,
    cache: Option<ResultCache>,
    provider_timeout: Option<Duration>,
    breakers: Option<Arc<CircuitBreakerRegistry>>,
}

impl Default for TickerdeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

const fn slot(capability: Capability) -> usize {
    match capability {
        Capability::Price => 0,
        Capability::Financials => 1,
        Capability::News => 2,
        Capability::Overview => 3,
    }
}

impl TickerdeckBuilder {
    /// Builder with the default routing table, cache windows and provider deadline.
    ///
    /// No connectors are registered; add at least one via [`Self::with_connector`].
    #[must_use]
    pub fn new() -> Self {
        let defaults = TickerdeckConfig::default();
        Self {
            connectors: vec![],
            routing: defaults.routing,
            cache_cfg: defaults.cache,
            cache: None,
            provider_timeout: Some(defaults.provider_timeout),
            breakers: None,
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order matters only when routing names no usable connector
    /// for a capability: the first registered capable connector then serves it.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn TickerdeckConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Replace the whole routing table.
    #[must_use]
    pub const fn routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    /// Route one capability to `primary`, falling back to `secondary`.
    #[must_use]
    pub const fn route(
        mut self,
        capability: Capability,
        primary: ProviderId,
        secondary: Option<ProviderId>,
    ) -> Self {
        self.routing.set_pair(
            capability,
            ProviderPair {
                primary,
                secondary,
            },
        );
        self
    }

    /// Freshness windows and capacity for the result cache.
    #[must_use]
    pub const fn cache(mut self, cfg: CacheConfig) -> Self {
        self.cache_cfg = cfg;
        self
    }

    /// Share an existing result cache instead of creating one.
    ///
    /// Capacity is then the given cache's; TTLs still come from [`Self::cache`].
    #[must_use]
    pub fn result_cache(mut self, cache: ResultCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Deadline for one provider attempt, retries included.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = Some(timeout);
        self
    }

    /// Remove the per-attempt deadline.
    #[must_use]
    pub const fn without_provider_timeout(mut self) -> Self {
        self.provider_timeout = None;
        self
    }

    /// Apply routing, cache windows and provider deadline from `config`.
    #[must_use]
    pub const fn config(mut self, config: &TickerdeckConfig) -> Self {
        self.routing = config.routing;
        self.cache_cfg = config.cache;
        self.provider_timeout = Some(config.provider_timeout);
        self
    }

    /// Registry the connectors report into, exposed through
    /// [`Tickerdeck::breaker_snapshot`].
    #[must_use]
    pub fn breakers(mut self, registry: Arc<CircuitBreakerRegistry>) -> Self {
        self.breakers = Some(registry);
        self
    }

    fn find(&self, id: ProviderId, capability: Capability) -> Option<Arc<dyn TickerdeckConnector>> {
        self.connectors
            .iter()
            .find(|c| c.key() == id && c.supports(capability))
            .cloned()
    }

    fn resolve(&self, capability: Capability) -> Option<Route> {
        let pair = self.routing.pair(capability);
        let primary = self.find(pair.primary, capability);
        let secondary = pair
            .secondary
            .filter(|s| *s != pair.primary)
            .and_then(|s| self.find(s, capability));

        match (primary, secondary) {
            (Some(primary), secondary) => Some(Route { primary, secondary }),
            (None, Some(promoted)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "tickerdeck::router",
                    capability = capability.as_str(),
                    missing = pair.primary.as_str(),
                    promoted = promoted.name(),
                    "configured primary is not registered; promoting secondary"
                );
                Some(Route {
                    primary: promoted,
                    secondary: None,
                })
            }
            (None, None) => {
                let first = self
                    .connectors
                    .iter()
                    .find(|c| c.supports(capability))
                    .cloned()?;
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target: "tickerdeck::router",
                    capability = capability.as_str(),
                    primary = pair.primary.as_str(),
                    using = first.name(),
                    "no configured provider is registered; using first capable connector"
                );
                Some(Route {
                    primary: first,
                    secondary: None,
                })
            }
        }
    }

    /// Build the orchestrator.
    ///
    /// Routing entries naming unregistered or incapable connectors are dropped.
    /// A missing primary promotes the secondary; when neither remains, the
    /// first registered capable connector serves the capability. Capabilities
    /// no connector offers fail with `Unsupported` at call time.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors have been registered.
    pub fn build(self) -> Result<Tickerdeck, TickerdeckError> {
        if self.connectors.is_empty() {
            return Err(TickerdeckError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }

        let routes = Capability::ALL.map(|cap| self.resolve(cap));
        let cache = self
            .cache
            .unwrap_or_else(|| ResultCache::from_config(&self.cache_cfg));

        Ok(Tickerdeck {
            connectors: self.connectors,
            routes,
            cache,
            cache_cfg: self.cache_cfg,
            provider_timeout: self.provider_timeout,
            breakers: self.breakers,
        })
    }
}

impl Tickerdeck {
    /// Start building a new `Tickerdeck` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use tickerdeck::{Capability, ProviderId, Tickerdeck};
    ///
    /// let deck = Tickerdeck::builder()
    ///     .with_connector(Arc::new(finnhub))
    ///     .with_connector(Arc::new(stooq))
    ///     .route(Capability::Price, ProviderId::FINNHUB, Some(ProviderId::STOOQ))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> TickerdeckBuilder {
        TickerdeckBuilder::new()
    }

    pub(crate) fn route_for(&self, capability: Capability) -> Result<&Route, TickerdeckError> {
        self.routes[slot(capability)]
            .as_ref()
            .ok_or_else(|| TickerdeckError::unsupported(capability.as_str()))
    }

    /// Routing actually in effect after build-time resolution.
    ///
    /// Capabilities no connector serves are absent.
    #[must_use]
    pub fn routing(&self) -> Vec<(Capability, ProviderPair)> {
        Capability::ALL
            .into_iter()
            .filter_map(|cap| {
                let route = self.routes[slot(cap)].as_ref()?;
                Some((
                    cap,
                    ProviderPair {
                        primary: route.primary.key(),
                        secondary: route.secondary.as_ref().map(|s| s.key()),
                    },
                ))
            })
            .collect()
    }

    /// The shared result cache.
    #[must_use]
    pub const fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Breaker state per provider and capability, when a registry was supplied.
    #[must_use]
    pub fn breaker_snapshot(&self) -> Vec<BreakerSnapshot> {
        self.breakers
            .as_ref()
            .map(|r| r.snapshot())
            .unwrap_or_default()
    }

    fn coordinator(&self, capability: Capability) -> FallbackCoordinator {
        let coordinator = FallbackCoordinator::new().for_capability(capability);
        match self.provider_timeout {
            Some(timeout) => coordinator.with_provider_timeout(timeout),
            None => coordinator,
        }
    }

    /// Serve `kind` from the cache, or through the capability's route.
    ///
    /// `attempt` turns a routed connector into a deferred provider call. The
    /// secondary's attempt is only started if the primary fails with a
    /// fallback-eligible error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tickerdeck::core::fetch_routed",
            skip(self, attempt),
            fields(ticker = %ticker, capability = kind.capability().as_str()),
        )
    )]
    pub(crate) async fn fetch_routed<'a, T, F>(
        &self,
        ticker: &Ticker,
        kind: DataKind,
        attempt: F,
    ) -> FetchOutcome<T>
    where
        T: PayloadKind,
        F: Fn(&Arc<dyn TickerdeckConnector>) -> Attempt<'a, T>,
    {
        let capability = kind.capability();
        let route = self.route_for(capability)?;
        let primary = attempt(&route.primary);
        let secondary = route.secondary.as_ref().map(&attempt);
        let coordinator = self.coordinator(capability);
        self.cache
            .get_or_compute(
                &kind.cache_key(ticker),
                self.cache_cfg.ttl_for(capability),
                move || async move { coordinator.run(primary, secondary).await },
            )
            .await
    }
}
