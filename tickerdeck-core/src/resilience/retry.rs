use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tickerdeck_types::RetryConfig;

/// Bounded sequential retries with exponential backoff.
///
/// After failed attempt `k` (1-based, `k < max_attempts`) the policy sleeps
/// `base_delay * 2^(k-1)` before the next attempt. The sleep is a tokio timer,
/// so other tasks keep running. The last error is returned unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    jitter_percent: u8,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Policy with no jitter. `max_attempts` of zero behaves as one.
    #[must_use]
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            jitter_percent: 0,
        }
    }

    /// Build from configuration.
    #[must_use]
    pub const fn from_config(cfg: &RetryConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
            jitter_percent: cfg.jitter_percent,
        }
    }

    /// Add up to `percent`% of random extra delay to each wait.
    #[must_use]
    pub const fn with_jitter(mut self, percent: u8) -> Self {
        self.jitter_percent = if percent > 100 { 100 } else { percent };
        self
    }

    /// Effective number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }

    /// Wait after failed attempt `attempt` (1-based), before jitter.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter_percent == 0 || delay.is_zero() {
            return delay;
        }
        let base_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        let range = (base_ms.saturating_mul(u64::from(self.jitter_percent)) / 100).max(1);
        let extra = rand::rng().random_range(0..range);
        delay.saturating_add(Duration::from_millis(extra))
    }

    /// Run `op` until it succeeds or attempts are exhausted.
    ///
    /// # Errors
    /// Returns the error of the final attempt, unchanged.
    pub async fn retry<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.retry_if(op, |_| true).await
    }

    /// Like [`RetryPolicy::retry`], but stops early when `should_retry` rejects an error.
    ///
    /// # Errors
    /// Returns the first rejected error, or the error of the final attempt, unchanged.
    pub async fn retry_if<T, E, F, Fut, P>(&self, mut op: F, should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let attempts = self.max_attempts();
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) if attempt < attempts && should_retry(&e) => {
                    let wait = self.jittered(self.delay_after(attempt));
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        target: "tickerdeck::retry",
                        attempt,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        "attempt failed; backing off"
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_from_base() {
        let p = RetryPolicy::new(5, Duration::from_millis(1000));
        assert_eq!(p.delay_after(1), Duration::from_millis(1000));
        assert_eq!(p.delay_after(2), Duration::from_millis(2000));
        assert_eq!(p.delay_after(3), Duration::from_millis(4000));
    }

    #[test]
    fn delay_saturates_instead_of_overflowing() {
        let p = RetryPolicy::new(100, Duration::from_secs(1));
        assert_eq!(p.delay_after(64), Duration::from_secs(1).saturating_mul(u32::MAX));
    }

    #[test]
    fn jitter_stays_within_percent() {
        let p = RetryPolicy::new(3, Duration::from_millis(1000)).with_jitter(20);
        for _ in 0..100 {
            let d = p.jittered(Duration::from_millis(1000));
            assert!(d >= Duration::from_millis(1000) && d < Duration::from_millis(1200));
        }
    }
}
