use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tickerdeck_types::{BreakerConfig, Capability, ProviderId, TickerdeckError};
use tokio::time::Instant;

#[derive(Debug, Default)]
struct CircuitState {
    failures: u32,
    last_failure: Option<Instant>,
}

/// Guard that stops calling a failing upstream for a cooldown window.
///
/// Behavior:
/// - Open while `failures >= threshold` and no more than `reset_time` has
///   passed since the last failure; open calls fail with `CircuitOpen` and the
///   operation is never invoked.
/// - Once the window has elapsed the failure count drops to zero and the call
///   goes through, so a single later failure does not reopen it.
/// - Success resets the count; failure increments it and stamps the time.
///   A call cancelled mid-flight (an expired provider deadline) is a failure.
///
/// One breaker is shared by every ticker for its (provider, capability) pair.
/// The lock is never held across the awaited operation.
#[derive(Debug)]
pub struct CircuitBreaker {
    provider: ProviderId,
    capability: Capability,
    threshold: u32,
    reset_time: Duration,
    state: Mutex<CircuitState>,
}

impl CircuitBreaker {
    /// Breaker with explicit thresholds. A threshold of zero behaves as one.
    #[must_use]
    pub fn new(
        provider: ProviderId,
        capability: Capability,
        failure_threshold: u32,
        reset_time: Duration,
    ) -> Self {
        Self {
            provider,
            capability,
            threshold: failure_threshold.max(1),
            reset_time,
            state: Mutex::new(CircuitState::default()),
        }
    }

    /// Breaker using shared configuration.
    #[must_use]
    pub fn from_config(provider: ProviderId, capability: Capability, cfg: &BreakerConfig) -> Self {
        Self::new(provider, capability, cfg.failure_threshold, cfg.reset_time())
    }

    fn lock(&self) -> MutexGuard<'_, CircuitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide whether a call may proceed, auto-resetting an expired open window.
    fn admit(&self) -> bool {
        let mut st = self.lock();
        if st.failures < self.threshold {
            return true;
        }
        match st.last_failure {
            Some(at) if at.elapsed() <= self.reset_time => false,
            _ => {
                st.failures = 0;
                true
            }
        }
    }

    fn on_success(&self) {
        self.lock().failures = 0;
    }

    fn on_failure(&self) {
        let mut st = self.lock();
        st.failures = st.failures.saturating_add(1);
        st.last_failure = Some(Instant::now());
        #[cfg(feature = "tracing")]
        if st.failures == self.threshold {
            tracing::warn!(
                target: "tickerdeck::breaker",
                provider = self.provider.as_str(),
                capability = self.capability.as_str(),
                failures = st.failures,
                "circuit opened"
            );
        }
    }

    /// Run `op` through the breaker.
    ///
    /// # Errors
    /// Returns `CircuitOpen` without invoking `op` while the breaker is open;
    /// otherwise returns `op`'s own error unchanged.
    pub async fn execute<T, F, Fut>(&self, op: F) -> Result<T, TickerdeckError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, TickerdeckError>>,
    {
        if !self.admit() {
            return Err(TickerdeckError::circuit_open(
                self.provider.as_str(),
                self.capability.as_str(),
            ));
        }
        let mut in_flight = InFlight {
            breaker: self,
            settled: false,
        };
        let out = op().await;
        in_flight.settled = true;
        match out {
            Ok(v) => {
                self.on_success();
                Ok(v)
            }
            Err(e) => {
                self.on_failure();
                Err(e)
            }
        }
    }

    /// Whether a call made now would be rejected.
    #[must_use]
    pub fn is_open(&self) -> bool {
        let st = self.lock();
        st.failures >= self.threshold
            && st
                .last_failure
                .is_some_and(|at| at.elapsed() <= self.reset_time)
    }

    /// Current consecutive failure count.
    #[must_use]
    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    /// Provider this breaker guards.
    #[must_use]
    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Capability this breaker guards.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        self.capability
    }

    /// Point-in-time view for diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> BreakerSnapshot {
        BreakerSnapshot {
            provider: self.provider,
            capability: self.capability,
            failures: self.failures(),
            open: self.is_open(),
        }
    }
}

/// Counts a call dropped before it settled, e.g. by an outer deadline, as a failure.
struct InFlight<'a> {
    breaker: &'a CircuitBreaker,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.breaker.on_failure();
        }
    }
}

/// Diagnostic view of one breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakerSnapshot {
    /// Guarded provider.
    pub provider: ProviderId,
    /// Guarded capability.
    pub capability: Capability,
    /// Consecutive failures.
    pub failures: u32,
    /// Whether calls are currently rejected.
    pub open: bool,
}

/// Process-wide set of breakers keyed by (provider, capability).
///
/// Adapters receive an `Arc<CircuitBreakerRegistry>` and look up their
/// breaker per call, so tests can construct fresh registries instead of
/// sharing hidden global state.
#[derive(Debug, Default)]
pub struct CircuitBreakerRegistry {
    cfg: BreakerConfig,
    breakers: Mutex<HashMap<(ProviderId, Capability), Arc<CircuitBreaker>>>,
}

impl CircuitBreakerRegistry {
    /// Empty registry creating breakers from `cfg`.
    #[must_use]
    pub fn new(cfg: BreakerConfig) -> Self {
        Self {
            cfg,
            breakers: Mutex::new(HashMap::new()),
        }
    }

    /// Breaker for a (provider, capability) pair, created on first use.
    #[must_use]
    pub fn breaker(&self, provider: ProviderId, capability: Capability) -> Arc<CircuitBreaker> {
        let mut map = self.breakers.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry((provider, capability)).or_insert_with(|| {
            Arc::new(CircuitBreaker::from_config(provider, capability, &self.cfg))
        }))
    }

    /// Configuration new breakers are created with.
    #[must_use]
    pub const fn config(&self) -> &BreakerConfig {
        &self.cfg
    }

    /// Diagnostic view of every breaker created so far, sorted by provider then capability.
    #[must_use]
    pub fn snapshot(&self) -> Vec<BreakerSnapshot> {
        let breakers: Vec<Arc<CircuitBreaker>> = self
            .breakers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let mut out: Vec<BreakerSnapshot> = breakers.iter().map(|b| b.snapshot()).collect();
        out.sort_by_key(|s| (s.provider, s.capability.as_str()));
        out
    }
}
