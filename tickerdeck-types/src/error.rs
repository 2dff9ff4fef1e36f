use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tickerdeck workspace.
///
/// Every provider failure is translated into one of these variants so that the
/// fallback coordinator and callers can branch on the variant instead of on
/// vendor-specific message text.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TickerdeckError {
    /// Malformed ticker or request parameters.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The upstream explicitly reported that the ticker or dataset does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "price data for AAPL".
        what: String,
    },

    /// The upstream signalled quota or rate exhaustion (HTTP 429 or a vendor marker).
    #[error("{provider} rate limited: {msg}")]
    RateLimited {
        /// Provider that rejected the call.
        provider: String,
        /// Vendor message, if any.
        msg: String,
    },

    /// Credentials were rejected (HTTP 401/403 or a vendor marker).
    #[error("{provider} forbidden: {msg}")]
    Forbidden {
        /// Provider that rejected the call.
        provider: String,
        /// Vendor message, if any.
        msg: String,
    },

    /// A provider could not be constructed or called because of local configuration.
    #[error("{provider} misconfigured: {msg}")]
    Configuration {
        /// Provider whose configuration is incomplete.
        provider: String,
        /// What is missing, e.g. "FMP_API_KEY is not set".
        msg: String,
    },

    /// Connection reset, transport timeout, or a generic 5xx.
    #[error("{provider} transport failure: {msg}")]
    Transport {
        /// Provider the request was addressed to.
        provider: String,
        /// Transport-level detail.
        msg: String,
    },

    /// An individual provider attempt exceeded the configured deadline.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "price", "news").
        capability: String,
    },

    /// The circuit breaker for this provider and capability refused the call.
    #[error("circuit open: {capability} via {provider}")]
    CircuitOpen {
        /// Provider whose breaker is open.
        provider: String,
        /// Capability guarded by the breaker.
        capability: String,
    },

    /// Issues with the returned data (unexpected shape, unparsable fields).
    #[error("data issue: {0}")]
    Data(String),

    /// An individual connector returned an error that fits no other kind.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The requested capability is not served by any registered connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// The capability that was requested.
        capability: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

/// Coarse classification of [`TickerdeckError`] for callers that map errors to
/// user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Client-side mistake; never retried, never rerouted.
    InvalidInput,
    /// The symbol or dataset is unknown to the vendor.
    NotFound,
    /// Quota or rate exhaustion.
    RateLimited,
    /// Missing or rejected credentials.
    Forbidden,
    /// Connection-level or server-side failure.
    Transient,
    /// Rejected locally by an open circuit breaker.
    CircuitOpen,
    /// The vendor answered with something we could not interpret.
    Data,
    /// The vendor failed in a way that fits no other kind.
    Upstream,
    /// No connector serves the capability.
    Unsupported,
    /// Anything else.
    Other,
}

impl ErrorKind {
    /// Stable snake-case identifier for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::Forbidden => "forbidden",
            Self::Transient => "transient",
            Self::CircuitOpen => "circuit_open",
            Self::Data => "data",
            Self::Upstream => "upstream",
            Self::Unsupported => "unsupported",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TickerdeckError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `RateLimited` error.
    pub fn rate_limited(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Forbidden` error.
    pub fn forbidden(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Forbidden {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Configuration` error.
    pub fn configuration(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Configuration {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Transport` error.
    pub fn transport(provider: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            provider: provider.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `CircuitOpen` error.
    pub fn circuit_open(provider: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::CircuitOpen {
            provider: provider.into(),
            capability: capability.into(),
        }
    }

    /// Collapse this error into its taxonomy kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArg(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Forbidden { .. } | Self::Configuration { .. } => ErrorKind::Forbidden,
            Self::Transport { .. } | Self::ProviderTimeout { .. } => ErrorKind::Transient,
            Self::CircuitOpen { .. } => ErrorKind::CircuitOpen,
            Self::Data(_) => ErrorKind::Data,
            Self::Connector { .. } => ErrorKind::Upstream,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Whether retrying the same provider may change the outcome.
    ///
    /// Only transport-level failures qualify. Rate limits are not retried
    /// against the same provider, and semantic answers (not found, invalid
    /// input) would come back identical.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Whether a secondary provider should be tried after this failure.
    ///
    /// Malformed input and opaque errors propagate as-is; everything that
    /// points at the primary vendor (credentials, quota, outage, an open
    /// breaker, a missing symbol, an unexpected payload) is rerouted.
    #[must_use]
    pub const fn triggers_fallback(&self) -> bool {
        !matches!(self, Self::InvalidArg(_) | Self::Other(_))
    }
}
