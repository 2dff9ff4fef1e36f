//! Failure handling around provider calls: retries, circuit breakers, and fallback.

mod breaker;
mod fallback;
mod retry;

pub use breaker::{BreakerSnapshot, CircuitBreaker, CircuitBreakerRegistry};
pub use fallback::{Attempt, FallbackCoordinator, with_fallback};
pub use retry::RetryPolicy;
