//! Mapping of HTTP statuses and vendor message text onto `TickerdeckError`.

use tickerdeck_core::TickerdeckError;

use crate::transport::HttpResponse;

const RATE_LIMIT_MARKERS: [&str; 5] = [
    "limit reached",
    "rate limit",
    "api call frequency",
    "too many requests",
    "exceeded the daily hits limit",
];

const FORBIDDEN_MARKERS: [&str; 3] = ["invalid api key", "forbidden", "access"];

/// What an unrecognised vendor message should become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Treat as quota exhaustion.
    RateLimited,
    /// Treat as a credential problem.
    Forbidden,
    /// Treat as a missing ticker or dataset.
    NotFound,
    /// Treat as an unexpected upstream response.
    Connector,
}

/// Pass 2xx responses through; map every other status to an error.
///
/// # Errors
/// - 401/403 → `Forbidden`
/// - 429 → `RateLimited`
/// - 404 → `NotFound`
/// - 5xx → `Transport`
/// - anything else non-2xx → `Connector`
pub fn classify_status(provider: &str, resp: HttpResponse) -> Result<String, TickerdeckError> {
    let status = resp.status;
    match status {
        200..=299 => Ok(resp.body),
        401 | 403 => Err(TickerdeckError::forbidden(provider, format!("HTTP {status}"))),
        429 => Err(TickerdeckError::rate_limited(
            provider,
            format!("HTTP {status}"),
        )),
        404 => Err(TickerdeckError::not_found(format!(
            "{provider} resource (HTTP 404)"
        ))),
        500..=599 => Err(TickerdeckError::transport(provider, format!("HTTP {status}"))),
        _ => Err(TickerdeckError::connector(provider, format!("HTTP {status}"))),
    }
}

/// Classify a vendor error message by its text.
///
/// Rate-limit markers win over credential markers; text matching neither
/// becomes `fallback`.
#[must_use]
pub fn classify_message(provider: &str, msg: &str, fallback: Fallback) -> TickerdeckError {
    let lower = msg.to_ascii_lowercase();
    if RATE_LIMIT_MARKERS.iter().any(|m| lower.contains(m)) {
        return TickerdeckError::rate_limited(provider, msg);
    }
    if FORBIDDEN_MARKERS.iter().any(|m| lower.contains(m)) {
        return TickerdeckError::forbidden(provider, msg);
    }
    match fallback {
        Fallback::RateLimited => TickerdeckError::rate_limited(provider, msg),
        Fallback::Forbidden => TickerdeckError::forbidden(provider, msg),
        Fallback::NotFound => TickerdeckError::not_found(format!("{provider}: {msg}")),
        Fallback::Connector => TickerdeckError::connector(provider, msg),
    }
}

/// Parse a JSON body, reporting shape problems as `Data`.
///
/// # Errors
/// Returns `Data` when the body is not valid JSON for `T`.
pub fn parse_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    body: &str,
) -> Result<T, TickerdeckError> {
    serde_json::from_str(body)
        .map_err(|e| TickerdeckError::Data(format!("{provider}: unexpected response shape: {e}")))
}
