use std::sync::Arc;

use tickerdeck_core::{
    CircuitBreakerRegistry, Credentials, ProviderId, RetryPolicy, TickerdeckConfig,
    TickerdeckConnector, TickerdeckError,
};

use crate::http::ResilientHttp;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::{AlphaVantageConnector, FinnhubConnector, FmpConnector, GdeltConnector, StooqConnector};

/// Builds vendor connectors that share one transport, breaker registry and retry policy.
#[derive(Clone)]
pub struct ConnectorFactory {
    transport: Arc<dyn HttpTransport>,
    breakers: Arc<CircuitBreakerRegistry>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ConnectorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorFactory")
            .field("retry", &self.retry)
            .field("breakers", &self.breakers)
            .finish_non_exhaustive()
    }
}

impl ConnectorFactory {
    /// Factory over explicit plumbing.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        breakers: Arc<CircuitBreakerRegistry>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            breakers,
            retry,
        }
    }

    /// Production factory: reqwest transport and a fresh registry from `config`.
    ///
    /// # Errors
    /// Returns `Connector` if the HTTP client cannot be built.
    pub fn from_config(config: &TickerdeckConfig) -> Result<Self, TickerdeckError> {
        let transport: Arc<dyn HttpTransport> =
            Arc::new(ReqwestTransport::new(config.request_timeout)?);
        Ok(Self::new(
            transport,
            Arc::new(CircuitBreakerRegistry::new(config.breaker)),
            RetryPolicy::from_config(&config.retry),
        ))
    }

    /// Registry the built connectors report breaker state into.
    #[must_use]
    pub const fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    fn http(&self, provider: ProviderId) -> ResilientHttp {
        ResilientHttp::new(
            provider,
            Arc::clone(&self.transport),
            Arc::clone(&self.breakers),
            self.retry,
        )
    }

    /// Build one built-in connector.
    ///
    /// # Errors
    /// - `Configuration` when the vendor needs a key and `credentials` lacks it.
    /// - `InvalidArg` when `provider` is not a built-in vendor.
    pub fn build(
        &self,
        provider: ProviderId,
        credentials: &Credentials,
    ) -> Result<Arc<dyn TickerdeckConnector>, TickerdeckError> {
        let key = credentials.key_for(provider)?.unwrap_or_default();
        let http = self.http(provider);
        let connector: Arc<dyn TickerdeckConnector> = match provider {
            FinnhubConnector::KEY => Arc::new(FinnhubConnector::new(key, http)),
            StooqConnector::KEY => Arc::new(StooqConnector::new(http)),
            FmpConnector::KEY => Arc::new(FmpConnector::new(key, http)),
            AlphaVantageConnector::KEY => Arc::new(AlphaVantageConnector::new(key, http)),
            GdeltConnector::KEY => Arc::new(GdeltConnector::new(http)),
            other => {
                return Err(TickerdeckError::InvalidArg(format!(
                    "unknown provider: {other}"
                )));
            }
        };
        Ok(connector)
    }

    /// Build every vendor in `providers` that can be built.
    ///
    /// Vendors with a missing key are skipped with a warning; their
    /// `Configuration` errors are returned alongside the connectors.
    pub fn build_all(
        &self,
        providers: &[ProviderId],
        credentials: &Credentials,
    ) -> (Vec<Arc<dyn TickerdeckConnector>>, Vec<TickerdeckError>) {
        let mut built = Vec::new();
        let mut skipped = Vec::new();
        for &provider in providers {
            if built
                .iter()
                .any(|c: &Arc<dyn TickerdeckConnector>| c.key() == provider)
            {
                continue;
            }
            match self.build(provider, credentials) {
                Ok(c) => built.push(c),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        target: "tickerdeck::providers",
                        provider = provider.as_str(),
                        error = %e,
                        "skipping provider"
                    );
                    skipped.push(e);
                }
            }
        }
        (built, skipped)
    }

    /// Build the vendors named by `config.routing`.
    pub fn for_routing(
        &self,
        config: &TickerdeckConfig,
        credentials: &Credentials,
    ) -> (Vec<Arc<dyn TickerdeckConnector>>, Vec<TickerdeckError>) {
        let wanted: Vec<ProviderId> = tickerdeck_core::Capability::ALL
            .into_iter()
            .flat_map(|cap| {
                let pair = config.routing.pair(cap);
                std::iter::once(pair.primary).chain(pair.secondary)
            })
            .collect();
        self.build_all(&wanted, credentials)
    }
}
