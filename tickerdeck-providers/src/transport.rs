use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tickerdeck_core::TickerdeckError;
use url::Url;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Convenience constructor for a 200 response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Response with an explicit status.
    #[must_use]
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Outbound GET abstraction (so we can inject canned responses in tests).
///
/// Implementations return any status as `Ok`; only failures to obtain a
/// response at all (connection refused, reset, timeout) are errors, and those
/// must be `Transport`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET for `url`. `provider` labels transport errors.
    async fn get(&self, provider: &str, url: &Url) -> Result<HttpResponse, TickerdeckError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Client with a per-request timeout.
    ///
    /// # Errors
    /// Returns `Connector` if the TLS backend cannot be initialised.
    pub fn new(request_timeout: Duration) -> Result<Self, TickerdeckError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("tickerdeck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TickerdeckError::connector("http", e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, provider: &str, url: &Url) -> Result<HttpResponse, TickerdeckError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TickerdeckError::transport(provider, describe(e)))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TickerdeckError::transport(provider, describe(e)))?;
        Ok(HttpResponse { status, body })
    }
}

fn describe(e: reqwest::Error) -> String {
    // Drop the URL: it carries the API key.
    let e = e.without_url();
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        e.to_string()
    }
}

impl dyn HttpTransport {
    /// Test helper that builds a transport from a closure over the requested URL.
    pub fn from_fn<F>(f: F) -> Arc<dyn HttpTransport>
    where
        F: Send + Sync + 'static + Fn(&Url) -> Result<HttpResponse, TickerdeckError>,
    {
        struct FnTransport<F>(F);

        #[async_trait]
        impl<F> HttpTransport for FnTransport<F>
        where
            F: Send + Sync + 'static + Fn(&Url) -> Result<HttpResponse, TickerdeckError>,
        {
            async fn get(
                &self,
                _provider: &str,
                url: &Url,
            ) -> Result<HttpResponse, TickerdeckError> {
                (self.0)(url)
            }
        }

        Arc::new(FnTransport(f))
    }
}
