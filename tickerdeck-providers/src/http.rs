use std::sync::Arc;

use tickerdeck_core::{Capability, CircuitBreakerRegistry, ProviderId, RetryPolicy, TickerdeckError};
use url::Url;

use crate::classify::classify_status;
use crate::transport::HttpTransport;

/// Shared plumbing every vendor connector issues its requests through.
///
/// A call is `breaker(retry_if(get + status classification))`: only
/// `Transport` failures are retried, and the whole retried sequence counts as
/// one breaker outcome for the (provider, capability) pair.
#[derive(Clone)]
pub struct ResilientHttp {
    provider: ProviderId,
    transport: Arc<dyn HttpTransport>,
    breakers: Arc<CircuitBreakerRegistry>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for ResilientHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientHttp")
            .field("provider", &self.provider)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ResilientHttp {
    /// Plumbing for `provider`.
    #[must_use]
    pub fn new(
        provider: ProviderId,
        transport: Arc<dyn HttpTransport>,
        breakers: Arc<CircuitBreakerRegistry>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            transport,
            breakers,
            retry,
        }
    }

    /// Provider requests are attributed to.
    #[must_use]
    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Breaker registry shared with other connectors.
    #[must_use]
    pub const fn breakers(&self) -> &Arc<CircuitBreakerRegistry> {
        &self.breakers
    }

    /// GET `url` and return the body of a 2xx response.
    ///
    /// # Errors
    /// `CircuitOpen` while the breaker is open, otherwise the classified
    /// failure of the last attempt.
    pub async fn get_text(&self, capability: Capability, url: &Url) -> Result<String, TickerdeckError> {
        let name = self.provider.as_str();
        let breaker = self.breakers.breaker(self.provider, capability);
        breaker
            .execute(|| {
                self.retry.retry_if(
                    || async {
                        let resp = self.transport.get(name, url).await?;
                        classify_status(name, resp)
                    },
                    TickerdeckError::is_retryable,
                )
            })
            .await
    }
}

/// Join `path` onto `base` and append query parameters.
///
/// # Errors
/// Returns `Configuration` when the result is not a valid URL.
pub fn endpoint(base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, TickerdeckError> {
    let raw = if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    };
    Url::parse_with_params(&raw, params)
        .map_err(|e| TickerdeckError::configuration("endpoint", format!("bad URL {raw}: {e}")))
}
