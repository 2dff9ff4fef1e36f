use std::future::Future;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tickerdeck_types::{Capability, FetchOutcome, ProviderId, Sourced, TickerdeckError};

/// One provider call, not started until the coordinator decides to run it.
pub struct Attempt<'a, T> {
    provider: ProviderId,
    call: Box<dyn FnOnce() -> BoxFuture<'a, Result<T, TickerdeckError>> + Send + 'a>,
}

impl<'a, T> Attempt<'a, T> {
    /// Wrap a provider call.
    pub fn new<F, Fut>(provider: ProviderId, call: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T, TickerdeckError>> + Send + 'a,
    {
        Self {
            provider,
            call: Box::new(move || call().boxed()),
        }
    }

    /// Provider that would serve this attempt.
    #[must_use]
    pub const fn provider(&self) -> ProviderId {
        self.provider
    }
}

/// Single-level primary/secondary provider selection.
///
/// The primary always runs first and alone. The secondary is constructed and
/// awaited only when the primary's error passes
/// [`TickerdeckError::triggers_fallback`]; its outcome, success or error,
/// becomes the result. Nothing chains past the secondary.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCoordinator {
    provider_timeout: Option<Duration>,
    capability: Option<Capability>,
}

impl FallbackCoordinator {
    /// Coordinator without a per-attempt deadline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            provider_timeout: None,
            capability: None,
        }
    }

    /// Bound each attempt; an expired deadline becomes `ProviderTimeout`.
    #[must_use]
    pub const fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = Some(timeout);
        self
    }

    /// Label used in timeout errors and logs.
    #[must_use]
    pub const fn for_capability(mut self, capability: Capability) -> Self {
        self.capability = Some(capability);
        self
    }

    fn capability_label(&self) -> &'static str {
        self.capability.map_or("unknown", Capability::as_str)
    }

    async fn attempt<T>(&self, attempt: Attempt<'_, T>) -> Result<T, TickerdeckError> {
        let fut = (attempt.call)();
        match self.provider_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut).await.unwrap_or_else(|_| {
                Err(TickerdeckError::provider_timeout(
                    attempt.provider.as_str(),
                    self.capability_label(),
                ))
            }),
            None => fut.await,
        }
    }

    /// Try `primary`, then `secondary` if the primary's failure is eligible.
    ///
    /// # Errors
    /// Returns the primary's error when it is not fallback-eligible or there is
    /// no secondary; otherwise the secondary's error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tickerdeck::fallback",
            skip_all,
            fields(
                capability = self.capability_label(),
                primary = primary.provider.as_str(),
                secondary = secondary.as_ref().map(|s| s.provider.as_str()),
            ),
        )
    )]
    pub async fn run<T>(
        &self,
        primary: Attempt<'_, T>,
        secondary: Option<Attempt<'_, T>>,
    ) -> FetchOutcome<T> {
        let primary_id = primary.provider;
        let err = match self.attempt(primary).await {
            Ok(value) => return Ok(Sourced::new(value, primary_id)),
            Err(e) => e,
        };
        let Some(secondary) = secondary else {
            return Err(err);
        };
        if !err.triggers_fallback() {
            return Err(err);
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            target: "tickerdeck::fallback",
            primary = primary_id.as_str(),
            secondary = secondary.provider.as_str(),
            error = %err,
            kind = %err.kind(),
            "primary provider failed; trying secondary"
        );
        let secondary_id = secondary.provider;
        self.attempt(secondary)
            .await
            .map(|value| Sourced::new(value, secondary_id))
    }
}

/// Run `primary` then, on an eligible failure, `secondary`, with no deadline.
///
/// # Errors
/// See [`FallbackCoordinator::run`].
pub async fn with_fallback<T>(
    primary: Attempt<'_, T>,
    secondary: Attempt<'_, T>,
) -> FetchOutcome<T> {
    FallbackCoordinator::new().run(primary, Some(secondary)).await
}
